use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid table settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub table: TableSettings,
}

/// Tunables for table interaction: resize limits and hit-testing slop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Narrowest width (in pixels) a column can be resized to
    pub min_column_width: u32,
    /// Width assumed for columns without a persisted width
    pub default_column_width: u32,
    /// Distance from a cell border (in pixels) that still counts as the resize handle
    pub handle_width: f32,
    /// Refuse to move row 0 / column 0 while it is a header line
    pub exclude_header_from_moves: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            min_column_width: 25,
            default_column_width: 100,
            handle_width: 5.0,
            exclude_header_from_moves: true,
        }
    }
}

impl TableSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_column_width == 0 {
            return Err(ConfigError::InvalidSettings(
                "min_column_width must be at least 1".to_string(),
            ));
        }
        if self.default_column_width < self.min_column_width {
            return Err(ConfigError::InvalidSettings(format!(
                "default_column_width ({}) is below min_column_width ({})",
                self.default_column_width, self.min_column_width
            )));
        }
        if !(self.handle_width.is_finite() && self.handle_width >= 0.0) {
            return Err(ConfigError::InvalidSettings(
                "handle_width must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config = Self::from_toml(&content).map_err(|err| match err {
            FromTomlError::Parse(source) => ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            },
            FromTomlError::Invalid(err) => err,
        })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the user's config, falling back to defaults when none exists
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/quire");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn from_toml(content: &str) -> Result<Self, FromTomlError> {
        let config: Config = toml::from_str(content).map_err(FromTomlError::Parse)?;
        config.table.validate().map_err(FromTomlError::Invalid)?;
        Ok(config)
    }
}

enum FromTomlError {
    Parse(toml::de::Error),
    Invalid(ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/quire/config.toml"));
    }

    #[test]
    fn test_default_settings() {
        let settings = TableSettings::default();

        assert_eq!(settings.min_column_width, 25);
        assert_eq!(settings.default_column_width, 100);
        assert!(settings.exclude_header_from_moves);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            table: TableSettings {
                min_column_width: 40,
                ..TableSettings::default()
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_partial_table_section_uses_defaults() {
        let config = Config::from_toml("[table]\nhandle_width = 8.0\n").ok().unwrap();

        assert_eq!(config.table.handle_width, 8.0);
        assert_eq!(config.table.min_column_width, 25);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").ok().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            table: TableSettings {
                min_column_width: 30,
                default_column_width: 120,
                handle_width: 4.0,
                exclude_header_from_moves: false,
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_malformed_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[table\nmin_column_width = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_rejects_default_width_below_minimum() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "[table]\nmin_column_width = 50\ndefault_column_width = 20\n",
        )
        .unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSettings(_)));
    }
}
