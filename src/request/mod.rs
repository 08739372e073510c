//! Request construction subsystem.
//!
//! # Data Flow
//! ```text
//! "set query parameter" steps
//!     → params.rs (accumulate single / array values)
//!     → validator.rs (name rule, single vs batch path)
//!     → PreparedRequest (endpoint + snapshot + validity flag)
//!
//! "send the request" step
//!     → params.rs (serialize to query string)
//!     → http::Dispatcher
//! ```
//!
//! # Design Decisions
//! - Accumulation never validates; validity is computed on demand
//! - The dispatcher never consults the validity flag

pub mod params;
pub mod validator;

pub use params::{build_url, ParamValue, QueryParams};
pub use validator::{is_valid_name, validate, PreparedRequest, ValidationPath};
