//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::{ConfigFile, LoggingSettings, SourceSettings};
use crate::source::DEFAULT_URL_TEMPLATE;

// =============================================================================
// Source defaults
// =============================================================================

/// Zoom level at which SharedStreets publishes its layers.
pub const DEFAULT_REFERENCE_ZOOM: u8 = 12;

/// Default per-fetch deadline in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default per-request deadline in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default number of tiles a union assembles at once.
pub const DEFAULT_MAX_CONCURRENT_TILES: usize = 8;

/// Default cap on the tiles one union may cover.
///
/// A 64x64 block at zoom 12, about 0.35 degrees of longitude per side at
/// the equator.
pub const DEFAULT_MAX_COVERING_TILES: u64 = 4096;

/// Concurrent tile bounds. Each tile issues four requests.
pub const MIN_CONCURRENT_TILES: usize = 1;
pub const MAX_CONCURRENT_TILES: usize = 64;

/// Clamps tile concurrency to the valid range and logs a warning if clamped.
pub(super) fn clamp_max_concurrent_tiles(value: usize) -> usize {
    if value < MIN_CONCURRENT_TILES {
        tracing::warn!(
            requested = value,
            min = MIN_CONCURRENT_TILES,
            max = MAX_CONCURRENT_TILES,
            "max_concurrent_tiles below minimum, clamping to {}",
            MIN_CONCURRENT_TILES
        );
        MIN_CONCURRENT_TILES
    } else if value > MAX_CONCURRENT_TILES {
        tracing::warn!(
            requested = value,
            min = MIN_CONCURRENT_TILES,
            max = MAX_CONCURRENT_TILES,
            "max_concurrent_tiles above maximum, clamping to {}",
            MAX_CONCURRENT_TILES
        );
        MAX_CONCURRENT_TILES
    } else {
        value
    }
}

// =============================================================================
// Logging defaults
// =============================================================================

pub const DEFAULT_LOG_FILE_NAME: &str = "sharedstreets.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            source: SourceSettings {
                url_template: DEFAULT_URL_TEMPLATE.to_string(),
                reference_zoom: DEFAULT_REFERENCE_ZOOM,
                fetch_timeout: DEFAULT_FETCH_TIMEOUT_SECS,
                request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
                max_concurrent_tiles: DEFAULT_MAX_CONCURRENT_TILES,
                max_covering_tiles: DEFAULT_MAX_COVERING_TILES,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
