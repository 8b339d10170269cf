//! Project listing parameters: the name window, the server-side filters and
//! the client-side result limit.

use crate::retrieve::QueryParams;

/// The service never returns more than this many projects per listing.
pub const MAX_PROJECTS: usize = 200;

/// Window and filters for a project listing.
///
/// String filters are sent verbatim as query parameters; boolean flags are
/// sent as `1` only when set. `extra` carries any parameter the service
/// accepts that has no dedicated field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// First project name of the window (inclusive).
    pub start: Option<String>,
    /// Last project name of the window (inclusive).
    pub end: Option<String>,
    /// Maximum number of projects to return; capped at [`MAX_PROJECTS`].
    pub limit: Option<usize>,
    /// Substring of the project name.
    pub search: Option<String>,
    /// Maintainer email.
    pub maintainer: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Only projects present in this repository.
    pub inrepo: Option<String>,
    /// Only projects absent from this repository.
    pub notinrepo: Option<String>,
    /// Repository count, e.g. `1`, `5-`, `-5`, `2-7`.
    pub repos: Option<String>,
    /// Repository family count, same syntax as `repos`.
    pub families: Option<String>,
    /// Only projects that are newest somewhere.
    pub newest: bool,
    /// Only projects that are outdated somewhere.
    pub outdated: bool,
    /// Only projects with reported problems.
    pub problematic: bool,
    /// Additional free-form parameters.
    pub extra: Vec<(String, String)>,
}

impl ProjectQuery {
    /// The effective result limit.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(MAX_PROJECTS).min(MAX_PROJECTS)
    }

    /// Query parameters in a stable order; unset filters are `None`.
    pub fn params(&self) -> QueryParams {
        let flag = |set: bool| set.then(|| "1".to_string());

        let mut params: QueryParams = vec![
            ("search".to_string(), self.search.clone()),
            ("maintainer".to_string(), self.maintainer.clone()),
            ("category".to_string(), self.category.clone()),
            ("inrepo".to_string(), self.inrepo.clone()),
            ("notinrepo".to_string(), self.notinrepo.clone()),
            ("repos".to_string(), self.repos.clone()),
            ("families".to_string(), self.families.clone()),
            ("newest".to_string(), flag(self.newest)),
            ("outdated".to_string(), flag(self.outdated)),
            ("problematic".to_string(), flag(self.problematic)),
        ];
        params.extend(
            self.extra
                .iter()
                .map(|(key, value)| (key.clone(), Some(value.clone()))),
        );
        params
    }
}
