//! Configuration file handling for ~/.sharedstreets/config.ini.
//!
//! A missing file means defaults. Parsing and validation are in
//! [`super::parser`], the commented output format in [`super::writer`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;
use super::source::SourceConfig;
use crate::source::UrlTemplate;

/// Errors loading, validating or saving `config.ini`.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not valid INI
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// A key holds a value the client cannot use
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Reads `~/.sharedstreets/config.ini`, or defaults when absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Reads `path`, or defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Writes the commented INI form, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Writes a default file at the standard path unless one exists, and
    /// returns that path.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Builds the runtime [`SourceConfig`].
    ///
    /// Fails only if the fields were edited after loading into something the
    /// parser would have rejected.
    pub fn to_source_config(&self) -> Result<SourceConfig, ConfigFileError> {
        let template = UrlTemplate::parse(&self.source.url_template).map_err(|e| {
            ConfigFileError::InvalidValue {
                section: "source".to_string(),
                key: "url_template".to_string(),
                value: self.source.url_template.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(SourceConfig::new()
            .with_url_template(template)
            .with_reference_zoom(self.source.reference_zoom)
            .with_fetch_timeout(Duration::from_secs(self.source.fetch_timeout))
            .with_request_timeout(Duration::from_secs(self.source.request_timeout))
            .with_max_concurrent_tiles(self.source.max_concurrent_tiles)
            .with_max_covering_tiles(self.source.max_covering_tiles))
    }
}

/// `~/.sharedstreets`, or `./.sharedstreets` without a home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sharedstreets")
}

/// `config.ini` inside [`config_directory`].
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
