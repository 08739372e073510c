//! Single-shot GET transport.

use std::future::Future;

use crate::config::HttpConfig;
use crate::http::{ApiResponse, DispatchError};

/// Issues one GET and returns whatever the server answered.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<ApiResponse, DispatchError>> + Send;
}

/// reqwest-backed transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(DispatchError::Client)?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<ApiResponse, DispatchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    DispatchError::InvalidUrl {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                } else {
                    DispatchError::Transport(e)
                }
            })?;

        ApiResponse::from_reqwest(response).await
    }
}
