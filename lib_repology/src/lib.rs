//! # lib_repology
//!
//! A resilient asynchronous client for the Repology API
//! (`https://repology.org/api/v1/`), which tracks software projects and the
//! packages that distributions and platforms ship for them.
//!
//! ## Layout:
//!
//! - **`models`**: typed `Package` and `Problem` records.
//! - **`retrieve`**: the request execution engine (rate-limit gate, retry
//!   and backoff policy, HTTP transport, request executor).
//! - **`repology`**: endpoint builders, tolerant decoding, repository
//!   filtering and the high-level `RepologyClient`.
//! - **`configs`**: layered client configuration (defaults, file, env).
//!   Discovery of the default config file needs the `configs` feature.
//! - **`loggers`**: `tracing` subscriber setup for binaries (feature `loggers`).
//!
//! The `full` feature enables every optional module.
//!
//! ```no_run
//! use lib_repology::RepologyClient;
//!
//! # async fn example() -> Result<(), lib_repology::RepologyError> {
//! let client = RepologyClient::new()?;
//! let packages = client.get_project("firefox").await?;
//! println!("{} packages", packages.len());
//! client.close();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod configs;
pub mod error;
#[cfg(feature = "loggers")]
pub mod loggers;
pub mod models;
pub mod repology;
pub mod retrieve;

// --- Public API Re-exports ---
pub use configs::{ClientConfig, ConfigError, ConfigOverrides};
pub use error::{ErrorKind, RepologyError};
pub use models::{Package, PackageStatus, Problem, ProjectPackages};
pub use repology::{ProjectQuery, RepologyClient, MAX_PROJECTS};
pub use retrieve::transport::{RawResponse, ReqwestTransport, Transport, TransportError};
