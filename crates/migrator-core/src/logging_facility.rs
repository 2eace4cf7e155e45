//! Structured logging facility for the migrator
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions, scoped to a closure
//!
//! # Usage
//!
//! ```rust
//! use migrator_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! The runner itself never logs directly. It reports [`crate::events::RunEvent`]s
//! to an injected sink, and [`crate::events::TracingSink`] turns those into
//! the canonical events emitted by the macros below.
//!
//! # Logging Macros
//!
//! - `log_op_start!(op, ...)` - Log operation start
//! - `log_op_end!(op, duration_ms = ...)` - Log operation end
//! - `log_op_error!(op, err, duration_ms = ...)` - Log operation error

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{capture, CapturedEvent, TestCapture};
