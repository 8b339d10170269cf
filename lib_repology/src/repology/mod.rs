//! # Repology API Client
//!
//! The service-specific half of the crate: what to ask for and how to read
//! the answer. Transport concerns (pacing, retries) live in `retrieve`.
//!
//! ## Contained Modules:
//!
//! - **`endpoints`**: percent-encoded endpoint paths for each API call.
//! - **`query`**: `ProjectQuery`, the window and filters of a project listing.
//! - **`decode`**: tolerant conversion of JSON arrays/objects into records.
//! - **`filter`**: client-side repository filtering of decoded results.
//! - **`client`**: `RepologyClient`, the high-level operations.

/// High-level operations over the request executor.
pub mod client;
/// JSON → record decoding that skips invalid elements.
pub mod decode;
/// Endpoint path builders.
pub mod endpoints;
/// Repository-scoped filtering helpers.
pub mod filter;
/// Project listing parameters.
pub mod query;

pub use client::RepologyClient;
pub use filter::{filter_packages_by_repo, filter_projects_by_repo};
pub use query::{ProjectQuery, MAX_PROJECTS};
