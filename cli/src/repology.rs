use clap::{Parser, Subcommand};
use lib_repology::loggers::{LogOptions, init_tracing};
use lib_repology::repology::{filter_packages_by_repo, filter_projects_by_repo};
use lib_repology::{
    ClientConfig, ConfigOverrides, ProjectQuery, RepologyClient, RepologyError, Transport,
};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Search limit accepted by the `search` command.
const MAX_SEARCH_RESULTS: usize = 100;

/// Query the Repology package tracker from the command line.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Queries the Repology API (https://repology.org) for projects, their packages across repositories, and reported problems. Results are printed to stdout as pretty JSON; logs go to stderr."
)]
struct Args {
    /// Path to a JSON config file. Defaults to <config dir>/repology/config.json when present.
    #[arg(long, env = "REPOLOGY_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long, env = "REPOLOGY_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Also write logs to a timestamped file in this directory.
    #[arg(long, env = "REPOLOGY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Timeout for each HTTP attempt, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Minimum spacing between requests, in milliseconds.
    #[arg(long)]
    rate_limit_delay_ms: Option<u64>,

    /// Retries after the first attempt.
    #[arg(long)]
    max_retries: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Packages of one project, optionally only those in one repository.
    Project {
        /// Exact project name, e.g. "firefox".
        name: String,
        /// Only show packages from this repository.
        #[arg(long)]
        repository: Option<String>,
    },

    /// Projects whose name contains a search term.
    Search {
        /// Search term matched against project names.
        query: String,
        /// Maximum number of projects (at most 100).
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Maintainer email filter.
        #[arg(long)]
        maintainer: Option<String>,
        /// Category filter.
        #[arg(long)]
        category: Option<String>,
        /// Only projects present in this repository; packages are narrowed to it.
        #[arg(long)]
        inrepo: Option<String>,
        /// Only projects absent from this repository.
        #[arg(long)]
        notinrepo: Option<String>,
    },

    /// Projects in alphabetical order, with optional filters.
    List {
        /// Project name to start from.
        #[arg(long)]
        start_from: Option<String>,
        /// Maximum number of projects (at most 200).
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Maintainer email filter.
        #[arg(long)]
        maintainer: Option<String>,
        /// Category filter.
        #[arg(long)]
        category: Option<String>,
        /// Only projects present in this repository; packages are narrowed to it.
        #[arg(long)]
        inrepo: Option<String>,
        /// Only projects absent from this repository.
        #[arg(long)]
        notinrepo: Option<String>,
        /// Number of repositories, e.g. "1", "5-", "-5", "2-7".
        #[arg(long)]
        repos: Option<String>,
        /// Number of repository families, same syntax as --repos.
        #[arg(long)]
        families: Option<String>,
        /// Only projects that are newest somewhere.
        #[arg(long)]
        newest: bool,
        /// Only projects that are outdated somewhere.
        #[arg(long)]
        outdated: bool,
        /// Only projects with problems.
        #[arg(long)]
        problematic: bool,
    },

    /// Problems reported for a repository.
    RepoProblems {
        /// Repository name, e.g. "freebsd".
        repository: String,
        /// Project name to start from.
        #[arg(long)]
        start_from: Option<String>,
    },

    /// Problems reported for a maintainer's packages.
    MaintainerProblems {
        /// Maintainer email.
        maintainer: String,
        /// Only problems in this repository.
        #[arg(long)]
        repository: Option<String>,
        /// Project name to start from.
        #[arg(long)]
        start_from: Option<String>,
    },
}

impl Args {
    /// Flag values that override the file and environment configuration.
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            timeout_secs: self.timeout_secs,
            rate_limit_delay_ms: self.rate_limit_delay_ms,
            max_retries: self.max_retries,
            ..ConfigOverrides::default()
        }
    }
}

/// What a command prints.
#[derive(Debug, PartialEq)]
enum Reply {
    /// The records, already in JSON form.
    Records(Value),
    /// Nothing matched; not a failure.
    Message(String),
    /// The request failed.
    Error(String),
}

impl Reply {
    fn to_json(&self) -> Value {
        match self {
            Reply::Records(value) => value.clone(),
            Reply::Message(message) => json!({ "message": message }),
            Reply::Error(message) => json!({ "error": message }),
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

fn records(value: serde_json::Result<Value>) -> Reply {
    match value {
        Ok(value) => Reply::Records(value),
        Err(e) => Reply::Error(format!("failed to serialize response: {}", e)),
    }
}

/// Turns a failure into a reply; `subject` names what a 404 refers to.
fn failure(err: RepologyError, subject: Option<String>) -> Reply {
    error!(error = %err, "Repology API error");
    match subject {
        Some(subject) if err.is_not_found() => Reply::Error(format!("{} not found", subject)),
        _ => Reply::Error(err.to_string()),
    }
}

async fn execute<T: Transport>(client: &RepologyClient<T>, command: Command) -> Reply {
    match command {
        Command::Project { name, repository } => {
            let packages = match client.get_project(&name).await {
                Ok(packages) => packages,
                Err(e) => return failure(e, Some(format!("Project '{}'", name))),
            };
            if packages.is_empty() {
                return Reply::Message(format!("No packages found for project '{}'", name));
            }

            match repository {
                Some(repo) => {
                    let packages = filter_packages_by_repo(packages, &repo);
                    if packages.is_empty() {
                        return Reply::Message(format!(
                            "No packages found for project '{}' in repository '{}'",
                            name, repo
                        ));
                    }
                    records(serde_json::to_value(&packages))
                }
                None => records(serde_json::to_value(&packages)),
            }
        }

        Command::Search { query, limit, maintainer, category, inrepo, notinrepo } => {
            let filters = ProjectQuery {
                maintainer,
                category,
                inrepo: inrepo.clone(),
                notinrepo,
                ..ProjectQuery::default()
            };
            let limit = limit.min(MAX_SEARCH_RESULTS);

            let mut projects = match client.search_projects(&query, limit, filters).await {
                Ok(projects) => projects,
                Err(e) => return failure(e, None),
            };
            if let Some(repo) = inrepo {
                projects = filter_projects_by_repo(projects, &repo);
            }

            if projects.is_empty() {
                return Reply::Message(format!("No projects found matching '{}'", query));
            }
            records(serde_json::to_value(&projects))
        }

        Command::List {
            start_from,
            limit,
            maintainer,
            category,
            inrepo,
            notinrepo,
            repos,
            families,
            newest,
            outdated,
            problematic,
        } => {
            let query = ProjectQuery {
                start: start_from,
                limit: Some(limit),
                maintainer,
                category,
                inrepo: inrepo.clone(),
                notinrepo,
                repos,
                families,
                newest,
                outdated,
                problematic,
                ..ProjectQuery::default()
            };

            let mut projects = match client.list_projects(&query).await {
                Ok(projects) => projects,
                Err(e) => return failure(e, None),
            };
            if let Some(repo) = inrepo {
                projects = filter_projects_by_repo(projects, &repo);
            }

            if projects.is_empty() {
                return Reply::Message("No projects found matching the criteria".to_string());
            }
            records(serde_json::to_value(&projects))
        }

        Command::RepoProblems { repository, start_from } => {
            match client
                .get_repository_problems(&repository, start_from.as_deref())
                .await
            {
                Ok(problems) if problems.is_empty() => Reply::Message(format!(
                    "No problems found for repository '{}'",
                    repository
                )),
                Ok(problems) => records(serde_json::to_value(&problems)),
                Err(e) => failure(e, Some(format!("Repository '{}'", repository))),
            }
        }

        Command::MaintainerProblems { maintainer, repository, start_from } => {
            match client
                .get_maintainer_problems(&maintainer, repository.as_deref(), start_from.as_deref())
                .await
            {
                Ok(problems) if problems.is_empty() => {
                    let mut message = format!("No problems found for maintainer '{}'", maintainer);
                    if let Some(repo) = &repository {
                        message.push_str(&format!(" in repository '{}'", repo));
                    }
                    Reply::Message(message)
                }
                Ok(problems) => records(serde_json::to_value(&problems)),
                Err(e) => failure(e, Some(format!("Maintainer '{}'", maintainer))),
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = init_tracing(&LogOptions {
        app_name: "repology".to_string(),
        level: args.log_level.clone(),
        json: args.json_logs,
        log_dir: args.log_dir.clone(),
    })?;

    let config = ClientConfig::load(args.config.as_deref())?
        .apply(args.overrides())
        .validated()?;
    info!(%config, "Loaded configuration");

    let client = RepologyClient::with_config(config)?;
    let reply = execute(&client, args.command).await;
    client.close();

    println!("{}", serde_json::to_string_pretty(&reply.to_json())?);

    if reply.is_error() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
