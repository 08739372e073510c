//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() / handle dropped → fixture server stops accepting → task exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → standalone fixture server shuts down
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
