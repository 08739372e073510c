//! In-process transport backed by the fixture simulator.
//!
//! Answers exactly what the HTTP fixture server would, without sockets.

use url::Url;

use crate::fixtures::FixtureState;
use crate::http::{ApiResponse, DispatchError, Transport};

#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    state: FixtureState,
}

impl FixtureTransport {
    pub fn new(state: FixtureState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &FixtureState {
        &self.state
    }
}

impl Transport for FixtureTransport {
    async fn get(&self, url: &str) -> Result<ApiResponse, DispatchError> {
        let parsed = Url::parse(url).map_err(|e| DispatchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        let fixture = self.state.respond(&pairs);
        Ok(ApiResponse::new(fixture.status, fixture.headers, fixture.body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureResponse;

    #[tokio::test]
    async fn test_decodes_array_keys() {
        let transport = FixtureTransport::default();
        let response = transport
            .get("http://fixture/?name%5B%5D=edzelle&name%5B%5D=foo")
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body().as_array().map(Vec::len), Some(2));
        assert_eq!(response.content_type(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_scripted_retry_after_header() {
        let transport = FixtureTransport::default();
        transport.state().push_scripted(FixtureResponse::rate_limited(2));

        let response = transport.get("http://fixture/?name=edzelle").await.unwrap();
        assert_eq!(response.status(), 429);
        assert_eq!(response.header("Retry-After"), Some("2"));
    }

    #[tokio::test]
    async fn test_rejects_unparseable_url() {
        let err = FixtureTransport::default().get("not a url").await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidUrl { .. }));
    }
}
