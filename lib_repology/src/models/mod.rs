//! # Record Models
//!
//! Typed representations of the records the Repology API returns.
//!
//! ## Contained Modules:
//!
//! - **`package`**: one repository's entry for a project (`Package`) and its
//!   freshness classification (`PackageStatus`).
//! - **`problem`**: a data-quality issue reported against a package (`Problem`).
//!
//! Records are validated strictly on construction: required string fields must
//! be present and non-empty, and the package status must belong to the closed
//! set the service documents. Collections are decoded element by element by
//! `repology::decode`, so one bad record never spoils its neighbours.

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};

/// One repository's entry for a project.
pub mod package;
/// Problems reported against packages.
pub mod problem;

pub use package::{Package, PackageStatus};
pub use problem::Problem;

/// Project name → packages, in the order the service listed them.
pub type ProjectPackages = IndexMap<String, Vec<Package>>;

/// Deserializes a string that must not be empty.
pub(crate) fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(de::Error::invalid_value(
            de::Unexpected::Str(""),
            &"a non-empty string",
        ));
    }
    Ok(value)
}
