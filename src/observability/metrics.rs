//! Metrics collection.
//!
//! # Metrics
//! - `agify_requests_total` (counter): responses received, by status
//! - `agify_rate_limit_retries_total` (counter): 429 reissues
//! - `agify_scenarios_total` (counter): finished scenarios, by outcome
//!
//! Nothing is exported unless the embedding process installs a recorder.

use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Globally switch metric recording on or off.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether recording is currently switched on.
fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Count one received response under its status code.
pub fn record_request(status: u16) {
    if enabled() {
        ::metrics::counter!("agify_requests_total", "status" => status.to_string()).increment(1);
    }
}

/// Count one reissue after a 429.
pub fn record_rate_limit_retry() {
    if enabled() {
        ::metrics::counter!("agify_rate_limit_retries_total").increment(1);
    }
}

/// Count one finished scenario as passed or failed.
pub fn record_scenario(passed: bool) {
    if enabled() {
        let outcome = if passed { "passed" } else { "failed" };
        ::metrics::counter!("agify_scenarios_total", "outcome" => outcome).increment(1);
    }
}
