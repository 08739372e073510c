//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Response from transport:
//!     → retries.rs (429 + retry-after? → RetryPending(delay))
//!     → dispatcher sleeps, reissues once
//!     → retries.rs (any response after a retry → Done)
//! ```
//!
//! # Design Decisions
//! - Only HTTP 429 is retried, and only once
//! - The server-provided delay is honored as-is, no jitter or backoff
//! - Transport errors are never retried

pub mod retries;

pub use retries::{parse_retry_after, RetryPolicy, RetryState, RETRY_AFTER};
