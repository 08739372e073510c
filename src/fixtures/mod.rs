//! Fixture simulator for the age-estimation API.
//!
//! # Data Flow
//! ```text
//! GET /?name=edzelle
//!     → server.rs (axum) or transport.rs (in-process)
//!     → FixtureState (scripted queue first, in order)
//!     → matcher.rs match_fixture (pure, decoded query pairs)
//!     → FixtureResponse or 404 "Not mocked"
//! ```
//!
//! # Design Decisions
//! - Matching is a pure function so it can be tested without a server
//! - Scripted responses (e.g. 429 + retry-after) are served once each,
//!   before the matcher is consulted
//! - Every response is JSON with an explicit content type

pub mod matcher;
pub mod server;
pub mod transport;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

pub use matcher::match_fixture;
pub use server::{FixtureHandle, FixtureServer};
pub use transport::FixtureTransport;

/// A canned response.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl FixtureResponse {
    /// JSON response with `content-type: application/json`.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// Response for queries no fixture recognizes.
    pub fn not_found() -> Self {
        Self::json(404, serde_json::json!({ "message": "Not mocked" }))
    }

    /// Rate-limit response asking the client to wait `retry_after_secs`.
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::json(429, serde_json::json!({ "error": "Request limit reached" }))
            .with_header("retry-after", retry_after_secs.to_string())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Shared simulator state: scripted queue plus request accounting.
#[derive(Debug, Clone, Default)]
pub struct FixtureState {
    scripted: Arc<Mutex<VecDeque<FixtureResponse>>>,
    hits: Arc<AtomicUsize>,
}

impl FixtureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to be served before any matching.
    pub fn push_scripted(&self, response: FixtureResponse) {
        self.scripted
            .lock()
            .expect("fixture script mutex poisoned")
            .push_back(response);
    }

    /// Number of requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Answer one request given its decoded query pairs.
    pub fn respond(&self, pairs: &[(String, String)]) -> FixtureResponse {
        self.hits.fetch_add(1, Ordering::SeqCst);

        let scripted = self
            .scripted
            .lock()
            .expect("fixture script mutex poisoned")
            .pop_front();
        if let Some(response) = scripted {
            tracing::debug!(status = response.status, "Serving scripted fixture");
            return response;
        }

        match match_fixture(pairs) {
            Some(response) => response,
            None => {
                tracing::debug!(query = ?pairs, "No fixture matched");
                FixtureResponse::not_found()
            }
        }
    }
}
