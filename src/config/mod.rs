//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → dispatcher, fixture server, step engine
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - Endpoint overrides are applied when a step sets the endpoint, never
//!   inside the dispatcher

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    EndpointOverrides, FixturesConfig, HarnessConfig, HttpConfig, ObservabilityConfig, RetryConfig,
    AGIFY_BASE_URL,
};
pub use validation::{validate_config, ValidationError};
