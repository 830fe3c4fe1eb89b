use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "GAME_CATALOG_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

/// User configuration, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    /// Where the selected game is persisted. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Where log files are written. Defaults to `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout_secs: 15,
            data_dir: None,
            log_dir: None,
            log_filter: "game_catalog=info".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "game-catalog", "game-catalog")
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|d| d.config_dir().join("config.toml"))
    }

    /// Load from an explicit path, or from the default path if none is given.
    ///
    /// A missing explicit file is an error; a missing default file yields the
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply environment and command-line overrides, later wins.
    pub fn with_overrides(mut self, env_key: Option<String>, cli_key: Option<String>, cli_base_url: Option<String>) -> Self {
        if let Some(key) = env_key.filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(key) = cli_key {
            self.api_key = Some(key);
        }
        if let Some(url) = cli_base_url {
            self.base_url = url;
        }
        self
    }

    pub fn resolved_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .ok_or(ConfigError::NoHomeDirectory),
        }
    }

    pub fn resolved_log_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.resolved_data_dir()?.join("logs")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("api_key = \"abc\"\nrequest_timeout_secs = 5\n").unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_filter, "game_catalog=info");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::from_toml("request_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://localhost:9000/api/\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/api/");
    }

    #[test]
    fn test_overrides_cli_beats_env() {
        let config = Config::default().with_overrides(
            Some("from-env".to_string()),
            Some("from-cli".to_string()),
            Some("http://mirror/api".to_string()),
        );
        assert_eq!(config.api_key.as_deref(), Some("from-cli"));
        assert_eq!(config.base_url, "http://mirror/api");

        let config = Config::default().with_overrides(Some("from-env".to_string()), None, None);
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_log_dir_follows_data_dir() {
        let config = Config { data_dir: Some(PathBuf::from("/tmp/gc")), ..Config::default() };
        assert_eq!(config.resolved_log_dir().unwrap(), PathBuf::from("/tmp/gc/logs"));
    }

    #[test]
    fn test_toml_round_trip_renders() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(rendered.contains("base_url"));
        assert_eq!(Config::from_toml(&rendered).unwrap(), Config::default());
    }
}
