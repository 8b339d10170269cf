//! # Repology Client
//!
//! High-level operations over the request executor. Each operation composes
//! its endpoint, fetches JSON through the gate/retry engine, decodes it
//! tolerantly and attaches operation context to failures (`NotFound` and
//! `RateLimited` pass through unchanged).

use tracing::{debug, info};

use super::decode::{decode_packages, decode_problems, decode_project_packages};
use super::endpoints;
use super::query::{ProjectQuery, MAX_PROJECTS};
use crate::configs::ClientConfig;
use crate::error::RepologyError;
use crate::models::{Package, Problem, ProjectPackages};
use crate::retrieve::{QueryParams, RequestExecutor, ReqwestTransport, RetryPolicy, Transport};

/// # Repology API Client
///
/// Owns one HTTP connection pool and one rate-limit gate. Share a single
/// instance (e.g. behind an `Arc`) between tasks so they all respect the same
/// request spacing; concurrent calls queue on the gate in arrival order.
///
/// The connection pool is released by [`RepologyClient::close`] or when the
/// client is dropped.
#[derive(Debug)]
pub struct RepologyClient<T = ReqwestTransport> {
    executor: RequestExecutor<T>,
}

impl RepologyClient<ReqwestTransport> {
    /// Creates a client with the default configuration.
    pub fn new() -> Result<Self, RepologyError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client backed by `reqwest` with the given configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, RepologyError> {
        let config = config
            .validated()
            .map_err(|e| RepologyError::Setup(e.to_string()))?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> RepologyClient<T> {
    /// Creates a client over an arbitrary transport.
    ///
    /// # Errors
    /// `RepologyError::Setup` if `config.base_url` is not an absolute http(s) URL.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, RepologyError> {
        let base_url = config
            .parsed_base_url()
            .map_err(|e| RepologyError::Setup(e.to_string()))?;
        let policy = RetryPolicy {
            max_retries: config.max_retries,
            rate_limit_delay: config.rate_limit_delay,
            server_backoff: config.server_backoff,
        };

        info!(
            base_url = %base_url,
            max_retries = policy.max_retries,
            rate_limit_delay_ms = policy.rate_limit_delay.as_millis() as u64,
            "repology client ready"
        );

        Ok(Self {
            executor: RequestExecutor::new(transport, base_url, policy),
        })
    }

    /// The retry policy derived from the configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        self.executor.policy()
    }

    /// Packages of one project, across all repositories.
    ///
    /// # Errors
    /// `RepologyError::NotFound` if the service does not know the project.
    pub async fn get_project(&self, name: &str) -> Result<Vec<Package>, RepologyError> {
        let fetch = async {
            let endpoint = endpoints::project(name)?;
            let payload = self.executor.get_json(&endpoint, &QueryParams::new()).await?;
            decode_packages(payload)
        };
        fetch.await.map_err(|e| e.context(format!("get project {name}")))
    }

    /// Projects in the query's window that match its filters, in service order,
    /// truncated to the query limit (at most [`MAX_PROJECTS`]).
    pub async fn list_projects(
        &self,
        query: &ProjectQuery,
    ) -> Result<ProjectPackages, RepologyError> {
        self.fetch_projects(query)
            .await
            .map_err(|e| e.context(listing_operation(query)))
    }

    /// Projects whose name contains `term`; a listing with the `search` filter.
    ///
    /// # Arguments
    /// * `term` - Substring to look for.
    /// * `limit` - Maximum number of projects, capped at [`MAX_PROJECTS`].
    /// * `filters` - Further listing filters; its `search` and `limit` are replaced.
    pub async fn search_projects(
        &self,
        term: &str,
        limit: usize,
        filters: ProjectQuery,
    ) -> Result<ProjectPackages, RepologyError> {
        let query = ProjectQuery {
            search: Some(term.to_string()),
            limit: Some(limit.min(MAX_PROJECTS)),
            ..filters
        };
        self.fetch_projects(&query)
            .await
            .map_err(|e| e.context(format!("search projects for '{term}'")))
    }

    /// Problems reported for a repository, optionally starting at project `start`.
    pub async fn get_repository_problems(
        &self,
        repository: &str,
        start: Option<&str>,
    ) -> Result<Vec<Problem>, RepologyError> {
        let fetch = async {
            let endpoint = endpoints::repository_problems(repository)?;
            let payload = self.executor.get_json(&endpoint, &start_param(start)).await?;
            decode_problems(payload)
        };
        fetch
            .await
            .map_err(|e| e.context(format!("get repository problems for {repository}")))
    }

    /// Problems reported for packages of a maintainer, optionally limited to
    /// one repository and starting at project `start`.
    pub async fn get_maintainer_problems(
        &self,
        maintainer: &str,
        repository: Option<&str>,
        start: Option<&str>,
    ) -> Result<Vec<Problem>, RepologyError> {
        let fetch = async {
            let endpoint = endpoints::maintainer_problems(maintainer, repository)?;
            let payload = self.executor.get_json(&endpoint, &start_param(start)).await?;
            decode_problems(payload)
        };
        fetch
            .await
            .map_err(|e| e.context(format!("get maintainer problems for {maintainer}")))
    }

    /// Listing without operation context; callers attach their own.
    async fn fetch_projects(&self, query: &ProjectQuery) -> Result<ProjectPackages, RepologyError> {
        let endpoint = endpoints::projects(query.start.as_deref(), query.end.as_deref())?;
        let payload = self.executor.get_json(&endpoint, &query.params()).await?;

        let mut projects = decode_project_packages(payload)?;
        projects.truncate(query.effective_limit());
        debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    /// Releases the connection pool.
    pub fn close(self) {
        debug!("repology client closed");
    }
}

/// `list projects`, plus the window bounds when the query has them.
fn listing_operation(query: &ProjectQuery) -> String {
    let mut operation = "list projects".to_string();
    if let Some(start) = query.start.as_deref().filter(|s| !s.is_empty()) {
        operation.push_str(&format!(" from '{start}'"));
    }
    if let Some(end) = query.end.as_deref().filter(|s| !s.is_empty()) {
        operation.push_str(&format!(" to '{end}'"));
    }
    operation
}

/// Pagination cursor; an empty cursor is no cursor.
fn start_param(start: Option<&str>) -> QueryParams {
    vec![(
        "start".to_string(),
        start.filter(|s| !s.is_empty()).map(str::to_string),
    )]
}
