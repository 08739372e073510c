//! Contract test harness for the agify.io age-estimation API.
//!
//! Scenarios written as Gherkin steps build query parameters, validate
//! them against the name rule, send a GET (retrying once on 429), and
//! assert on the JSON that comes back. A local fixture simulator answers
//! in place of the real API during tests.

pub mod assertions;
pub mod config;
pub mod fixtures;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod request;
pub mod resilience;
pub mod scenario;

pub use config::HarnessConfig;
pub use http::{ApiResponse, DispatchError, Dispatcher};
pub use scenario::{Feature, FeatureRunner, ScenarioContext};
