use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Address of the chat backend, e.g. `http://localhost:8000`
    pub base_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_base_url(url: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.base_url = Some(url.to_string());
        config.save()
    }

    /// Pick the backend address: explicit override (CLI flag or env var)
    /// first, then the config file, then the default.
    pub fn resolve_base_url(&self, explicit: Option<&str>) -> String {
        let non_blank = |url: &&str| !url.trim().is_empty();
        explicit
            .filter(non_blank)
            .or(self.base_url.as_deref().filter(non_blank))
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("career-chat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            base_url: Some("http://backend:8000".to_string()),
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_base_url_precedence() {
        let config = Config {
            base_url: Some("http://from-config".to_string()),
        };

        assert_eq!(config.resolve_base_url(Some("http://explicit")), "http://explicit");
        assert_eq!(config.resolve_base_url(None), "http://from-config");
        assert_eq!(Config::new().resolve_base_url(None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_blank_override_falls_back_to_config() {
        let config = Config {
            base_url: Some("http://from-config".to_string()),
        };

        assert_eq!(config.resolve_base_url(Some("")), "http://from-config");
        assert_eq!(config.resolve_base_url(Some("  ")), "http://from-config");
        assert_eq!(Config::new().resolve_base_url(Some("")), DEFAULT_BASE_URL);

        let blank = Config {
            base_url: Some(" ".to_string()),
        };
        assert_eq!(blank.resolve_base_url(None), DEFAULT_BASE_URL);
    }
}
