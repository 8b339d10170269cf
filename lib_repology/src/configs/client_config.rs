use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fmt};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://repology.org/api/v1/";
/// Identifies this client to the service.
pub const DEFAULT_USER_AGENT: &str = concat!("lib_repology/", env!("CARGO_PKG_VERSION"));

/// Errors raised while reading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON of the expected shape.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The file that was parsed.
        path: PathBuf,
        /// The JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// An environment variable holds a value of the wrong type.
    #[error("environment variable {var} has an invalid value: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// The raw value.
        value: String,
    },

    /// A setting is out of range or malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one `RepologyClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute API root; a trailing `/` is added when missing.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Timeout for each individual HTTP attempt.
    pub timeout: Duration,
    /// Minimum spacing between request starts, and base delay for HTTP 429.
    pub rate_limit_delay: Duration,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay for 5xx responses and network failures.
    pub server_backoff: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            // just over one second, so the service never counts two requests in one second
            rate_limit_delay: Duration::from_millis(1100),
            max_retries: 3,
            server_backoff: Duration::from_secs(2),
        }
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClientConfig
    Base URL: {},
    User agent: {},
    Timeout: {:?},
    Rate limit delay: {:?},
    Max retries: {},
    Server backoff: {:?}
",
            self.base_url,
            self.user_agent,
            self.timeout,
            self.rate_limit_delay,
            self.max_retries,
            self.server_backoff
        )
    }
}

impl ClientConfig {
    /// Returns a copy with every `Some` field of `overrides` applied.
    pub fn apply(self, overrides: ConfigOverrides) -> Self {
        Self {
            base_url: overrides.base_url.unwrap_or(self.base_url),
            user_agent: overrides.user_agent.unwrap_or(self.user_agent),
            timeout: overrides.timeout_secs.map(Duration::from_secs).unwrap_or(self.timeout),
            rate_limit_delay: overrides
                .rate_limit_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.rate_limit_delay),
            max_retries: overrides.max_retries.unwrap_or(self.max_retries),
            server_backoff: overrides
                .server_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(self.server_backoff),
        }
    }

    /// Checks the settings and normalises the base URL.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user agent must not be empty".into()));
        }
        self.base_url = self.parsed_base_url()?.to_string();
        Ok(self)
    }

    /// The base URL as an absolute http(s) URL ending in `/`.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::Invalid(format!("base URL {:?}: {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Invalid(format!(
                "base URL must use http or https, not {other}"
            ))),
        }
    }
}

/// Partial configuration; `Some` fields override whatever they are applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    /// API root.
    pub base_url: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Gate interval and 429 backoff base in milliseconds.
    pub rate_limit_delay_ms: Option<u64>,
    /// Retries after the initial attempt.
    pub max_retries: Option<u32>,
    /// 5xx and network backoff base in milliseconds.
    pub server_backoff_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Merges two overrides, where `other` wins for `Some` values.
    pub fn merge(self, other: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            base_url: other.base_url.or(self.base_url),
            user_agent: other.user_agent.or(self.user_agent),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            rate_limit_delay_ms: other.rate_limit_delay_ms.or(self.rate_limit_delay_ms),
            max_retries: other.max_retries.or(self.max_retries),
            server_backoff_ms: other.server_backoff_ms.or(self.server_backoff_ms),
        }
    }

    /// Reads a JSON file with camelCase keys, e.g. `{"rateLimitDelayMs": 2000}`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(overrides)
    }

    /// Reads the `REPOLOGY_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Reads the `REPOLOGY_*` variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_url: lookup("REPOLOGY_BASE_URL"),
            user_agent: lookup("REPOLOGY_USER_AGENT"),
            timeout_secs: parse_var(&lookup, "REPOLOGY_TIMEOUT_SECS")?,
            rate_limit_delay_ms: parse_var(&lookup, "REPOLOGY_RATE_LIMIT_DELAY_MS")?,
            max_retries: parse_var(&lookup, "REPOLOGY_MAX_RETRIES")?,
            server_backoff_ms: parse_var(&lookup, "REPOLOGY_SERVER_BACKOFF_MS")?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
