//! Bookstore Observability
//!
//! - [`logging`]: subscriber setup with a console layer and daily rolling
//!   JSON and error log files
//! - [`middleware`]: per-request logging with a generated request id
//!
//! # Examples
//!
//! ```no_run
//! use bookstore_observability::{LogSettings, init_tracing};
//!
//! init_tracing(&LogSettings::from_env());
//! ```

pub mod logging;
pub mod middleware;

pub use logging::{LogSettings, init_tracing};
pub use middleware::{REQUEST_ID_HEADER, logging_middleware};
