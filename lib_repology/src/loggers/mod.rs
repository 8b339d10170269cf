//! # Logging Modules
//!
//! Subscriber setup for binaries built on this crate. The library itself only
//! emits `tracing` events and never installs a subscriber.
//!
//! ## Contained Modules:
//!
//! - **`subscriber`**: `init_tracing` and its `LogOptions`.

/// Installs the process-wide `tracing` subscriber (console and optional file output).
pub mod subscriber;

pub use subscriber::{init_tracing, LogOptions, LoggerError};
