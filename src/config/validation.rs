//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check that addresses and override URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::HarnessConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("http.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("http.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("fixtures.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("endpoint override '{url}' is not an absolute http(s) URL")]
    InvalidOverrideUrl { url: String },

    #[error("observability.log_level '{0}' is not a valid filter")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.http.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.http.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }

    if config.fixtures.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.fixtures.bind_address.clone(),
        ));
    }

    for (from, to) in config.endpoints.iter() {
        for url in [from, to] {
            if !is_http_url(url) {
                errors.push(ValidationError::InvalidOverrideUrl {
                    url: url.to_string(),
                });
            }
        }
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
