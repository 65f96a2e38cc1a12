//! Configuration loading for sentimentd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; the file must exist)
//! 2. `~/.sentiment-service/config.toml` (user)
//! 3. `/etc/sentiment-service/config.toml` (system)
//!
//! Unlike a gateway with API keys, the service runs fine with no file at all:
//! when nothing is found, built-in defaults serve the DistilBERT SST-2 model
//! on `127.0.0.1:8000`.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::model::Device;
use crate::providers::{
    DEFAULT_MAX_LENGTH, LocalModelOptions, LocalSentimentModel, default_cache_dir,
};
use crate::{Result, SentimentError};

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ClassifierConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

impl ServerConfig {
    /// Parse the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.address.parse().map_err(|e| {
            SentimentError::Configuration(format!("Invalid address '{}': {e}", self.address))
        })
    }
}

/// Which model to serve and how to run it.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// HuggingFace repo ID; the DistilBERT SST-2 model when unset.
    #[serde(default)]
    pub repo_id: Option<String>,
    /// Branch, tag or commit of `repo_id`.
    #[serde(default)]
    pub revision: Option<String>,
    /// Local model directory. Takes precedence over `repo_id`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Device to use: "cpu", "cuda" or "cuda:<id>" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Directory for model downloads.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Inputs are truncated to this many tokens (default: 512).
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            repo_id: None,
            revision: None,
            path: None,
            device: default_device(),
            cache_dir: None,
            max_length: default_max_length(),
        }
    }
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl ClassifierConfig {
    /// The model this configuration selects.
    pub fn local_model(&self) -> LocalSentimentModel {
        if let Some(ref dir) = self.path {
            return LocalSentimentModel::Custom { dir: dir.clone() };
        }
        match self.repo_id {
            Some(ref repo_id) => LocalSentimentModel::Hub {
                repo_id: repo_id.clone(),
                revision: self.revision.clone(),
            },
            None => LocalSentimentModel::DistilbertSst2,
        }
    }

    /// Loading options: device, cache directory and truncation length.
    pub fn options(&self) -> Result<LocalModelOptions> {
        Ok(LocalModelOptions {
            device: Device::parse(&self.device)?,
            cache_dir: self.cache_dir.clone().unwrap_or_else(default_cache_dir),
            max_length: self.max_length,
        })
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.sentiment-service/config.toml`
    /// 3. `/etc/sentiment-service/config.toml`
    ///
    /// Returns defaults when no file exists and no path was given.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with_search_paths(explicit_path, &Self::search_paths())
    }

    fn load_with_search_paths(explicit_path: Option<&Path>, search: &[PathBuf]) -> Result<Self> {
        match Self::resolve_config_path(explicit_path, search)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SentimentError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SentimentError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// User then system config locations.
    fn search_paths() -> Vec<PathBuf> {
        let user = dirs::home_dir().map(|home| home.join(".sentiment-service").join("config.toml"));
        user.into_iter()
            .chain([PathBuf::from("/etc/sentiment-service/config.toml")])
            .collect()
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>, search: &[PathBuf]) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SentimentError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(search.iter().find(|path| path.exists()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::DEFAULT_REPO_ID;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.model.device, "cpu");
        assert_eq!(config.model.max_length, 512);
        assert_eq!(config.model.local_model(), LocalSentimentModel::DistilbertSst2);
        assert_eq!(
            config.model.local_model().repo_id(),
            Some(DEFAULT_REPO_ID)
        );
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8000"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        // Defaults preserved
        assert_eq!(config.model.max_length, 512);
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:8000".parse().unwrap()
        );
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"

            [model]
            repo_id = "cardiffnlp/twitter-roberta-base-sentiment-latest"
            revision = "v1.0"
            device = "cpu"
            cache_dir = "/var/cache/sentiment"
            max_length = 256
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.model.local_model(),
            LocalSentimentModel::Hub {
                repo_id: "cardiffnlp/twitter-roberta-base-sentiment-latest".into(),
                revision: Some("v1.0".into()),
            }
        );
        let options = config.model.options().unwrap();
        assert_eq!(options.device, Device::Cpu);
        assert_eq!(options.cache_dir, PathBuf::from("/var/cache/sentiment"));
        assert_eq!(options.max_length, 256);
    }

    #[test]
    fn local_path_takes_precedence() {
        let toml = r#"
            [model]
            repo_id = "org/ignored"
            path = "/opt/models/sst2"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.model.local_model(),
            LocalSentimentModel::Custom {
                dir: PathBuf::from("/opt/models/sst2")
            }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = ClassifierConfig {
            device: "tpu".into(),
            ..Default::default()
        };
        assert!(config.options().is_err());

        let server = ServerConfig {
            address: "not-an-address".into(),
        };
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\naddress = \"127.0.0.1:8100\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8100");
    }

    #[test]
    fn no_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let search = [
            dir.path().join("user.toml"),
            dir.path().join("system.toml"),
        ];

        let config = Config::load_with_search_paths(None, &search).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.model.local_model(), LocalSentimentModel::DistilbertSst2);
        assert_eq!(config.model.max_length, DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn first_existing_search_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        fs::write(&system, "[server]\naddress = \"127.0.0.1:8300\"\n").unwrap();

        let config = Config::load_with_search_paths(None, &[user.clone(), system.clone()]).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8300");

        fs::write(&user, "[server]\naddress = \"127.0.0.1:8200\"\n").unwrap();
        let config = Config::load_with_search_paths(None, &[user, system]).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8200");
    }

    #[test]
    fn explicit_path_skips_search() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let user = dir.path().join("user.toml");
        fs::write(&explicit, "[server]\naddress = \"127.0.0.1:8400\"\n").unwrap();
        fs::write(&user, "[server]\naddress = \"127.0.0.1:8200\"\n").unwrap();

        let config = Config::load_with_search_paths(Some(&explicit), &[user]).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8400");
    }

    #[test]
    fn malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\naddress = ").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, SentimentError::Configuration(_)));
    }
}
