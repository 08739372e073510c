//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, fixture server, scenario runner produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request, retry and scenario counters)
//! ```
//!
//! # Design Decisions
//! - Structured logging with fields, never formatted-in values
//! - Scenario ID flows through every event of a scenario via its span
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
