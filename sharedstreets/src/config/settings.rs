//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Tile source settings
    pub source: SourceSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// URL template with `{z}`, `{x}`, `{y}` and `{layer}` placeholders
    pub url_template: String,
    /// Zoom level upstream layers are published at
    pub reference_zoom: u8,
    /// Per-fetch timeout in seconds
    pub fetch_timeout: u64,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Tiles assembled concurrently by a bounding-box union
    pub max_concurrent_tiles: usize,
    /// Largest covering set a bounding-box union accepts
    pub max_covering_tiles: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
