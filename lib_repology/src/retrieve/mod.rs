//! # Data Retrieval Module
//!
//! The request execution engine behind every Repology call. It owns the
//! concerns that do not depend on what is being fetched: pacing requests,
//! deciding when a failure is worth another attempt, and turning a response
//! body into JSON.
//!
//! ## Contained Modules:
//!
//! - **`gate`**: `RequestGate`, a per-client minimum spacing between request
//!   starts.
//! - **`retry`**: `RetryPolicy` and the status classification that drives the
//!   retry loop.
//! - **`transport`**: the `Transport` seam and its `reqwest` implementation.
//! - **`executor`**: `RequestExecutor`, which builds URLs and runs
//!   gate → HTTP → classify → backoff until a final verdict.
//!
//! Callers above this layer see only decoded `serde_json::Value`s or a
//! classified `RepologyError`.

/// Composes URLs and drives the gate/transport/retry loop.
pub mod executor;
/// Process-local spacing between outbound requests.
pub mod gate;
/// Outcome classification and backoff computation.
pub mod retry;
/// HTTP transport abstraction.
pub mod transport;

pub use executor::{QueryParams, RequestExecutor};
pub use gate::RequestGate;
pub use retry::{RetryKind, RetryPolicy, Verdict};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
