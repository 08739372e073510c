//! HTTP dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint + QueryParams
//!     → request::build_url (serialize query string)
//!     → client.rs Dispatcher (endpoint check, retry state machine)
//!     → transport.rs (single GET with timeout)
//!     → response.rs ApiResponse (status, headers, parsed body)
//! ```
//!
//! # Design Decisions
//! - Every HTTP status is a normal result; only transport failures are errors
//! - The transport is a trait so the fixture simulator can stand in for the
//!   network without the dispatcher knowing

pub mod client;
pub mod response;
pub mod transport;

use thiserror::Error;

pub use client::Dispatcher;
pub use response::ApiResponse;
pub use transport::{HttpTransport, Transport};

/// Failures that abort a send.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Endpoint is not set")]
    EndpointNotSet,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
