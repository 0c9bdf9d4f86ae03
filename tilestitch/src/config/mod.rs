//! Configuration file handling for tilestitch.ini.
//!
//! Loads and saves run configuration with sensible defaults. Settings
//! structs live in [`settings`], constants in [`defaults`], parsing in
//! `parser`, and serialization in `writer`.
//!
//! Configuration is a value: callers load a `ConfigFile`, adjust their own
//! working copy (CLI overrides, the alignment tool's candidate overlap) and
//! pass the fields into library calls explicitly. Nothing reads
//! configuration from global state, and only an explicit
//! [`ConfigFile::save_to`] persists changes.

mod defaults;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use settings::{CompositeSettings, ConfigFile, LoggingSettings, PyramidSettings, TileSettings};

use std::path::Path;
use thiserror::Error;

/// Default config filename, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tilestitch.ini";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file '{path}': {message}")]
    Write { path: String, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from a specific path.
    ///
    /// A missing file is not an error; it yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = ini::Ini::load_from_file(path)?;
        parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Rejects settings no run could work with.
    ///
    /// Runs at load time, before any I/O uses the values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiles.crop_size == 0 {
            return Err(ConfigError::InvalidValue {
                section: "tiles".to_string(),
                key: "crop_size".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.tiles.overlap as i64 >= self.tiles.crop_size as i64 {
            return Err(ConfigError::InvalidValue {
                section: "tiles".to_string(),
                key: "overlap".to_string(),
                value: self.tiles.overlap.to_string(),
                reason: format!("must be smaller than crop_size ({})", self.tiles.crop_size),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = ConfigFile::load_from(Path::new("/nonexistent/tilestitch.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = ConfigFile::default();
        config.tiles.overlap = 11;
        config.pyramid.format = "png".to_string();
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_validate_rejects_overlap_not_below_crop() {
        let mut config = ConfigFile::default();
        config.tiles.crop_size = 100;
        config.tiles.overlap = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigFile::default().validate().is_ok());
    }
}
