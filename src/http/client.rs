//! Request dispatcher.
//!
//! # Responsibilities
//! - Refuse to send without an endpoint
//! - Serialize parameters and issue the GET through a [`Transport`]
//! - Apply the single rate-limit retry
//!
//! # Design Decisions
//! - The validity flag from the validator is never consulted here
//! - The retry sleeps on the tokio timer; nothing else suspends

use crate::config::HarnessConfig;
use crate::http::{ApiResponse, DispatchError, HttpTransport, Transport};
use crate::observability::metrics;
use crate::request::{build_url, QueryParams};
use crate::resilience::{RetryPolicy, RetryState, RETRY_AFTER};

/// Sends GET requests and owns the retry policy.
#[derive(Debug, Clone)]
pub struct Dispatcher<T = HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl Dispatcher<HttpTransport> {
    /// Build a reqwest-backed dispatcher from configuration.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, DispatchError> {
        let transport = HttpTransport::new(&config.http)?;
        Ok(Self::new(transport, RetryPolicy::from(&config.retry)))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `params` to `endpoint`, retrying once on a rate-limited answer.
    pub async fn send(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<ApiResponse, DispatchError> {
        if endpoint.trim().is_empty() {
            return Err(DispatchError::EndpointNotSet);
        }

        let url = build_url(endpoint, params);
        let mut state = RetryState::Sent;
        let mut response = self.attempt(&url, 1).await?;

        loop {
            state = state.advance(response.status(), response.header(RETRY_AFTER), &self.policy);
            match state {
                RetryState::RetryPending(delay) => {
                    tracing::info!(
                        url = %url,
                        delay_secs = delay.as_secs(),
                        "Rate limited, retrying once after Retry-After"
                    );
                    metrics::record_rate_limit_retry();
                    tokio::time::sleep(delay).await;
                    response = self.attempt(&url, 2).await?;
                }
                RetryState::Done | RetryState::Sent => break,
            }
        }

        Ok(response)
    }

    async fn attempt(&self, url: &str, attempt: u32) -> Result<ApiResponse, DispatchError> {
        match self.transport.get(url).await {
            Ok(response) => {
                tracing::debug!(url = %url, attempt, status = response.status(), "Response received");
                metrics::record_request(response.status());
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(url = %url, attempt, error = %e, "Request failed");
                Err(e)
            }
        }
    }
}
