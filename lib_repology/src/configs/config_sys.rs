//! Config file discovery in the user's configuration directory.

use std::path::{Path, PathBuf};
use tracing::info;

use super::client_config::{ClientConfig, ConfigError, ConfigOverrides};

const CONFIG_DIR_NAME: &str = "repology";
const CONFIG_FILE_NAME: &str = "config.json";

/// `<config dir>/repology/config.json`, e.g. `~/.config/repology/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl ClientConfig {
    /// Loads defaults, then the config file, then the environment.
    ///
    /// `path` names an explicit file, which must exist. Without it the file at
    /// [`default_config_path`] is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut overrides = ConfigOverrides::default();

        match path {
            Some(explicit) => overrides = overrides.merge(ConfigOverrides::from_file(explicit)?),
            None => match default_config_path() {
                Some(found) if found.is_file() => {
                    overrides = overrides.merge(ConfigOverrides::from_file(&found)?)
                }
                _ => info!("No config file found. Using defaults and environment variables."),
            },
        }

        overrides = overrides.merge(ConfigOverrides::from_env()?);
        ClientConfig::default().apply(overrides).validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(ClientConfig::load(Some(missing.as_path())), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn default_path_ends_in_repology_config() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("repology/config.json"));
        }
    }
}
