//! # Configuration Modules
//!
//! Client configuration with layered sources: built-in defaults, an optional
//! JSON file, then `REPOLOGY_*` environment variables. Binaries may layer
//! their own command-line overrides on top through [`ConfigOverrides`].
//!
//! ## Contained Modules:
//!
//! - **`client_config`**: `ClientConfig`, `ConfigOverrides` and their file and
//!   environment readers.
//! - **`config_sys`** (feature `configs`): default config file location and
//!   `ClientConfig::load`.

/// Client settings and their readers.
pub mod client_config;
/// Config file discovery.
#[cfg(feature = "configs")]
pub mod config_sys;

pub use client_config::{ClientConfig, ConfigError, ConfigOverrides};
#[cfg(feature = "configs")]
pub use config_sys::default_config_path;
