//! Application configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, creating it with defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Directory holding `config.toml`, the session file, and logs.
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::config_dir().context("Failed to get config directory")?;
        Ok(home.join("taskdeck"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server_url)
            .with_context(|| format!("Invalid server URL: {}", self.server_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("Server URL must be http or https, got: {}", url.scheme());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_url, "http://localhost:3000");
    }

    #[test]
    fn rejects_unparseable_url() {
        let config = Config {
            server_url: "not a url".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_scheme() {
        let config = Config {
            server_url: "ws://localhost:3000".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn first_load_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server_url, Config::default().server_url);
        assert!(path.exists());
    }

    #[test]
    fn load_reads_saved_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            server_url: "http://tasks.example.com".to_string(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server_url, "http://tasks.example.com");
    }
}
