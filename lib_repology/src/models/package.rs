use serde::{Deserialize, Serialize};
use std::fmt;

use super::non_empty;

/// Freshness of a package relative to the newest known version of its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    /// The package carries the newest stable version.
    Newest,
    /// The package carries the newest development version.
    Devel,
    /// The package is the only one of its project.
    Unique,
    /// A newer version exists elsewhere.
    Outdated,
    /// An older branch kept alongside a newer one in the same repository.
    Legacy,
    /// A rolling-release package without a fixed version.
    Rolling,
    /// The version does not follow the project's scheme.
    Noscheme,
    /// The version is known to be wrong.
    Incorrect,
    /// The version comes from an untrusted source.
    Untrusted,
    /// The version is ignored by the comparison rules.
    Ignored,
}

impl PackageStatus {
    /// The wire spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Newest => "newest",
            PackageStatus::Devel => "devel",
            PackageStatus::Unique => "unique",
            PackageStatus::Outdated => "outdated",
            PackageStatus::Legacy => "legacy",
            PackageStatus::Rolling => "rolling",
            PackageStatus::Noscheme => "noscheme",
            PackageStatus::Incorrect => "incorrect",
            PackageStatus::Untrusted => "untrusted",
            PackageStatus::Ignored => "ignored",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package in a repository.
///
/// `repo`, `visiblename` and `version` must be non-empty and `status` must be
/// one of the [`PackageStatus`] values; anything else is rejected while
/// decoding. Absent optional fields stay `None` and are omitted again on
/// serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Repository name, e.g. `freebsd`.
    #[serde(deserialize_with = "non_empty")]
    pub repo: String,
    /// Subrepository name, e.g. `main`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subrepo: Option<String>,
    /// Source package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcname: Option<String>,
    /// Binary package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binname: Option<String>,
    /// All binary package names built from the source package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binnames: Option<Vec<String>>,
    /// Package name as shown by Repology.
    #[serde(deserialize_with = "non_empty")]
    pub visiblename: String,
    /// Sanitized package version.
    #[serde(deserialize_with = "non_empty")]
    pub version: String,
    /// Version as the repository spells it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origversion: Option<String>,
    /// Freshness classification.
    pub status: PackageStatus,
    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Repository categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Declared licenses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<String>>,
    /// Maintainer addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<Vec<String>>,
}
