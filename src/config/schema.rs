//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public base URL of the age-estimation API.
pub const AGIFY_BASE_URL: &str = "https://api.agify.io";

/// Root configuration for the contract harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Outbound HTTP settings.
    pub http: HttpConfig,

    /// Rate-limit retry settings.
    pub retry: RetryConfig,

    /// Local fixture server settings.
    pub fixtures: FixturesConfig,

    /// Base URL rewrites applied when a scenario sets its endpoint.
    pub endpoints: EndpointOverrides,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: concat!("agify-contract/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Honor 429 + Retry-After with a single reissue.
    pub enabled: bool,

    /// Largest Retry-After (seconds) that will be waited out; 0 = no limit.
    pub max_retry_after_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retry_after_secs: 0,
        }
    }
}

/// Fixture server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Bind address; port 0 picks a free port.
    pub bind_address: String,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Record request and scenario counters.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

/// Map from a public base URL to the URL that should be hit instead.
///
/// `https://api.agify.io` → `http://127.0.0.1:8089` makes the endpoint
/// `https://api.agify.io/?x=1` resolve to `http://127.0.0.1:8089/?x=1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EndpointOverrides(BTreeMap<String, String>);

impl EndpointOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(from, to)| (from.as_str(), to.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewrite `endpoint` if it starts with a configured base URL.
    ///
    /// The prefix must end at a URL boundary (`/`, `?`, `#` or end of
    /// string). The longest matching base wins.
    pub fn resolve(&self, endpoint: &str) -> String {
        self.0
            .iter()
            .filter_map(|(from, to)| {
                let base = from.trim_end_matches('/');
                let rest = endpoint.strip_prefix(base)?;
                let at_boundary = rest.is_empty() || rest.starts_with(['/', '?', '#']);
                at_boundary.then_some((base.len(), to.trim_end_matches('/'), rest))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, to, rest)| format!("{}{}", to, rest))
            .unwrap_or_else(|| endpoint.to_string())
    }
}
