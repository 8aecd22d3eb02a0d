//! Configuration for SharedStreets clients.
//!
//! [`SourceConfig`] is the runtime configuration consumed by the service.
//! [`ConfigFile`] is the user's `~/.sharedstreets/config.ini`, which produces
//! a `SourceConfig` via [`ConfigFile::to_source_config`].

mod defaults;
mod file;
mod parser;
mod settings;
mod source;
mod writer;

pub use defaults::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_LOG_FILE_NAME, DEFAULT_MAX_CONCURRENT_TILES,
    DEFAULT_MAX_COVERING_TILES, DEFAULT_REFERENCE_ZOOM, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_CONCURRENT_TILES,
    MIN_CONCURRENT_TILES,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, SourceSettings};
pub use source::SourceConfig;
