//! Server configuration read from a TOML file.

use novel_model::User;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "NOVEL_RECORDER_CONFIG";
pub const ADDR_ENV: &str = "NOVEL_RECORDER_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "novel_recorder.toml";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub addr: String,
    /// JSON snapshot of the store; kept in memory only when unset.
    pub snapshot_path: Option<PathBuf>,
    /// Users known to the identity provider, registered at start.
    pub users: Vec<User>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.into(),
            snapshot_path: None,
            users: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load the file named by `NOVEL_RECORDER_CONFIG` and apply environment
    /// overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load(Path::new(&path))?;
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            config.addr = addr;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
            addr = "127.0.0.1:8080"
            snapshot_path = "data/store.json"

            [[users]]
            id = "67e55044-10b1-426f-9247-bb680e5fe0c8"
            username = "ann"
            email = "ann@example.com"

            [[users]]
            id = "9b2f4c1e-2d7a-4c1b-8f3e-5a6b7c8d9e0f"
            username = "root"
            email = "root@example.com"
            is_staff = true
        "#;
        let config = ServerConfig::parse(Path::new("test.toml"), text).unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.snapshot_path, Some(PathBuf::from("data/store.json")));
        assert_eq!(config.users.len(), 2);
        assert!(!config.users[0].is_staff);
        assert!(config.users[1].is_staff);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ServerConfig::parse(Path::new("test.toml"), "").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "addr = ").unwrap();
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
