//! Application configuration

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kb_data::LoaderConfig;
use kb_ui::Theme;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Optional configuration file in the working directory
pub const CONFIG_FILE: &str = "kpi_board.config.json";

/// Environment variable overriding `storage_path`
pub const STORAGE_ENV: &str = "KPI_BOARD_STORAGE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding the KPI definitions
    pub storage_path: PathBuf,

    /// Initial window size
    pub window_size: [f32; 2],

    /// File parsing options
    pub loader: LoaderConfig,

    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("kpi_board.json"),
            window_size: [1200.0, 800.0],
            loader: LoaderConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl AppConfig {
    /// Configuration for this process: file, then environment
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE), std::env::var_os(STORAGE_ENV))
    }

    /// Read `path` if it exists, falling back to defaults when it is
    /// missing or malformed, then apply the storage override
    pub fn load_from(path: &Path, storage_override: Option<OsString>) -> Self {
        let mut config = match Self::read(path) {
            Ok(Some(config)) => {
                info!("Loaded configuration from {:?}", path);
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring configuration file: {:#}", e);
                Self::default()
            }
        };

        if let Some(storage) = storage_override.filter(|s| !s.is_empty()) {
            config.storage_path = PathBuf::from(storage);
        }
        config
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("none.json"), None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_path, PathBuf::from("kpi_board.json"));
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"storage_path":"boards/q3.json","loader":{"csv_delimiter":";"}}"#).unwrap();

        let config = AppConfig::load_from(&path, None);
        assert_eq!(config.storage_path, PathBuf::from("boards/q3.json"));
        assert_eq!(config.loader.csv_delimiter, ';');
        assert_eq!(config.window_size, [1200.0, 800.0]);
        assert!(config.theme.dark_mode);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load_from(&path, None), AppConfig::default());
    }

    #[test]
    fn test_environment_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"storage_path":"from_file.json"}"#).unwrap();

        let config = AppConfig::load_from(&path, Some(OsString::from("/tmp/override.json")));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/override.json"));

        let config = AppConfig::load_from(&path, Some(OsString::new()));
        assert_eq!(config.storage_path, PathBuf::from("from_file.json"));
    }
}
