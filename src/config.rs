//! Persistent settings
//!
//! Stored as JSON under the user's config directory. Missing files yield
//! defaults; command-line flags override whatever is loaded here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FIELD_COUNT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Items requested per page when scanning collections
    pub field_count: usize,
    /// Quote a top-level scalar reply in terminal output
    pub quote_scalars: bool,
    /// Prefix placed before the first rendered line
    pub prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_count: DEFAULT_FIELD_COUNT,
            quote_scalars: true,
            prefix: String::new(),
        }
    }
}

pub struct SettingsManager {
    config_path: PathBuf,
}

impl SettingsManager {
    pub fn new() -> Result<Self> {
        let config_path = Self::config_dir()?.join("settings.json");
        Ok(Self { config_path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read settings file: {}", self.config_path.display())
        })?;
        let settings: Settings =
            serde_json::from_str(&contents).context("Failed to parse settings file")?;
        Ok(settings.normalized())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.config_path, json).context("Failed to write settings file")?;
        Ok(())
    }

    pub fn reset(&self) -> Result<Settings> {
        let settings = Settings::default();
        self.save(&settings)?;
        Ok(settings)
    }

    fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = dirs::config_dir() {
            Ok(dir.join("keyview"))
        } else if let Some(home) = dirs::home_dir() {
            Ok(home.join(".config").join("keyview"))
        } else {
            anyhow::bail!("Could not determine a configuration directory")
        }
    }
}

impl Settings {
    // A zero page size would stall every scan.
    fn normalized(mut self) -> Self {
        self.field_count = self.field_count.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::with_path(dir.path().join("settings.json"));

        let settings = manager.load().unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.field_count, 100);
        assert!(!manager.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::with_path(dir.path().join("nested").join("settings.json"));
        let settings = Settings {
            field_count: 25,
            quote_scalars: false,
            prefix: "> ".to_string(),
        };

        manager.save(&settings).unwrap();

        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"field_count": 0}"#).unwrap();

        let settings = SettingsManager::with_path(path).load().unwrap();

        assert_eq!(settings.field_count, 1);
        assert!(settings.quote_scalars);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let error = SettingsManager::with_path(path).load().unwrap_err();
        assert!(error.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn test_reset_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::with_path(dir.path().join("settings.json"));
        manager
            .save(&Settings {
                field_count: 7,
                ..Settings::default()
            })
            .unwrap();

        assert_eq!(manager.reset().unwrap(), Settings::default());
        assert_eq!(manager.load().unwrap(), Settings::default());
    }
}
