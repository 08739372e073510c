//! Scenario execution subsystem.
//!
//! # Data Flow
//! ```text
//! .feature file
//!     → feature.rs (Feature / Background / Scenario / step lines)
//!     → runner.rs (fresh ScenarioContext per scenario)
//!     → steps.rs (bind text to Step, execute against context)
//!     → context.rs (endpoint, params, prepared request, response)
//!     → FeatureReport
//! ```
//!
//! # Design Decisions
//! - No state crosses scenario boundaries
//! - A failed step fails its scenario; other scenarios still run

pub mod context;
pub mod feature;
pub mod runner;
pub mod steps;

pub use context::ScenarioContext;
pub use feature::{Feature, FeatureParseError, Keyword, Scenario, StepLine};
pub use runner::{FeatureReport, FeatureRunner, ScenarioReport, StepOutcome, StepReport};
pub use steps::{Step, StepEnv, StepError};
