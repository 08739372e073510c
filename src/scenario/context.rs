//! Per-scenario state.

use crate::assertions::{self, AssertionError};
use crate::http::{ApiResponse, DispatchError, Dispatcher, Transport};
use crate::request::{PreparedRequest, QueryParams};

/// Everything one scenario accumulates: endpoint, parameters, the last
/// prepared request and the last response.
///
/// A fresh context is created for every scenario and dropped afterwards.
#[derive(Debug, Default)]
pub struct ScenarioContext {
    endpoint: String,
    params: QueryParams,
    prepared: Option<PreparedRequest>,
    response: Option<ApiResponse>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
    }

    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.set(key, value);
    }

    pub fn prepare(&mut self) -> &PreparedRequest {
        self.prepared
            .insert(PreparedRequest::prepare(&self.endpoint, &self.params))
    }

    /// Send the current endpoint and parameters, replacing the stored
    /// response on success. Validity is not consulted.
    pub async fn send<T: Transport>(
        &mut self,
        dispatcher: &Dispatcher<T>,
    ) -> Result<&ApiResponse, DispatchError> {
        let response = dispatcher.send(&self.endpoint, &self.params).await?;
        Ok(self.response.insert(response))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn prepared(&self) -> Option<&PreparedRequest> {
        self.prepared.as_ref()
    }

    pub fn response(&self) -> Result<&ApiResponse, AssertionError> {
        self.response.as_ref().ok_or(AssertionError::NoResponse)
    }

    pub fn expect_valid(&self) -> Result<(), AssertionError> {
        match &self.prepared {
            None => Err(AssertionError::NotPrepared),
            Some(p) if p.is_valid() => Ok(()),
            Some(_) => Err(AssertionError::ExpectedValid),
        }
    }

    pub fn expect_invalid(&self) -> Result<(), AssertionError> {
        match &self.prepared {
            None => Err(AssertionError::NotPrepared),
            Some(p) if p.is_valid() => Err(AssertionError::ExpectedInvalid),
            Some(_) => Ok(()),
        }
    }

    pub fn expect_parameter(&self, key: &str) -> Result<(), AssertionError> {
        if self.params.contains(key) {
            Ok(())
        } else {
            Err(AssertionError::MissingParameter(key.to_string()))
        }
    }

    pub fn expect_status(&self, expected: u16) -> Result<(), AssertionError> {
        assertions::status_is(self.response()?, expected)
    }
}
