//! Client-side repository filtering.
//!
//! The `inrepo` listing filter selects projects present in a repository but
//! still returns every package of those projects; these helpers narrow the
//! packages themselves.

use crate::models::{Package, ProjectPackages};

/// Keeps the packages whose `repo` equals `repository`, in order.
pub fn filter_packages_by_repo(packages: Vec<Package>, repository: &str) -> Vec<Package> {
    packages
        .into_iter()
        .filter(|pkg| pkg.repo == repository)
        .collect()
}

/// Applies [`filter_packages_by_repo`] per project and drops projects left
/// without packages. Remaining projects keep their order.
pub fn filter_projects_by_repo(projects: ProjectPackages, repository: &str) -> ProjectPackages {
    projects
        .into_iter()
        .filter_map(|(name, packages)| {
            let kept = filter_packages_by_repo(packages, repository);
            (!kept.is_empty()).then_some((name, kept))
        })
        .collect()
}
