use crate::error::{ClipError, Result};
use crate::model::MAX_TABS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PADS: i64 = 3;

/// Per-user clipboard preferences, stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClipboardConfig {
    /// Number of numbered pads next to the default one (0..=20)
    #[serde(default = "default_pads")]
    pub pads: i64,

    /// Keep the clipboard across sessions instead of per session
    #[serde(default)]
    pub persistent: bool,

    /// Schema names the list-backed registry treats as known
    #[serde(default = "default_schemas")]
    pub schemas: Vec<String>,
}

fn default_pads() -> i64 {
    DEFAULT_PADS
}

fn default_schemas() -> Vec<String> {
    vec!["pages".to_string(), "tt_content".to_string()]
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            pads: DEFAULT_PADS,
            persistent: false,
            schemas: default_schemas(),
        }
    }
}

impl ClipboardConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ClipError::Io)?;
        let config: ClipboardConfig =
            serde_json::from_str(&content).map_err(ClipError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ClipError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ClipError::Serialization)?;
        fs::write(config_path, content).map_err(ClipError::Io)?;
        Ok(())
    }

    /// Pad count clamped to the supported range
    pub fn pad_count(&self) -> u8 {
        self.pads.clamp(0, MAX_TABS as i64) as u8
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "pads" => Ok(self.pads.to_string()),
            "persistent" => Ok(self.persistent.to_string()),
            "schemas" => Ok(self.schemas.join(",")),
            other => Err(ClipError::Config(format!("Unknown config key: {}", other))),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "pads" => {
                self.pads = value
                    .trim()
                    .parse()
                    .map_err(|_| ClipError::Config(format!("Invalid pad count: {}", value)))?;
            }
            "persistent" => {
                self.persistent = value
                    .trim()
                    .parse()
                    .map_err(|_| ClipError::Config(format!("Expected true or false: {}", value)))?;
            }
            "schemas" => {
                self.schemas = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            other => return Err(ClipError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ClipboardConfig::default();
        assert_eq!(config.pads, 3);
        assert!(!config.persistent);
        assert_eq!(config.schemas, vec!["pages", "tt_content"]);
    }

    #[test]
    fn test_pad_count_is_clamped() {
        let mut config = ClipboardConfig::default();
        config.pads = 40;
        assert_eq!(config.pad_count(), 20);
        config.pads = -1;
        assert_eq!(config.pad_count(), 0);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClipboardConfig::load(temp_dir.path().join("absent")).unwrap();
        assert_eq!(config, ClipboardConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = ClipboardConfig::default();
        config.set("pads", "5").unwrap();
        config.set("persistent", "true").unwrap();
        config.set("schemas", "pages, sys_file ,").unwrap();
        config.save(temp_dir.path()).unwrap();

        let loaded = ClipboardConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.pads, 5);
        assert!(loaded.persistent);
        assert_eq!(loaded.schemas, vec!["pages", "sys_file"]);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), r#"{ "persistent": true }"#).unwrap();

        let loaded = ClipboardConfig::load(temp_dir.path()).unwrap();
        assert!(loaded.persistent);
        assert_eq!(loaded.pads, 3);
    }

    #[test]
    fn test_unknown_key_and_bad_values() {
        let mut config = ClipboardConfig::default();
        assert!(config.get("colour").is_err());
        assert!(config.set("pads", "many").is_err());
        assert!(config.set("persistent", "yes").is_err());
        assert_eq!(config.get("schemas").unwrap(), "pages,tt_content");
    }
}
