//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::clamp_max_concurrent_tiles;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;
use crate::source::UrlTemplate;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("url_template") {
            let v = v.trim();
            if !v.is_empty() {
                UrlTemplate::parse(v).map_err(|e| ConfigFileError::InvalidValue {
                    section: "source".to_string(),
                    key: "url_template".to_string(),
                    value: v.to_string(),
                    reason: e.to_string(),
                })?;
                config.source.url_template = v.to_string();
            }
        }
        if let Some(v) = section.get("reference_zoom") {
            config.source.reference_zoom = v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|z| *z <= MAX_ZOOM)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "source".to_string(),
                    key: "reference_zoom".to_string(),
                    value: v.to_string(),
                    reason: format!("must be an integer between 0 and {}", MAX_ZOOM),
                })?;
        }
        if let Some(v) = section.get("fetch_timeout") {
            config.source.fetch_timeout = parse_seconds("fetch_timeout", v)?;
        }
        if let Some(v) = section.get("request_timeout") {
            config.source.request_timeout = parse_seconds("request_timeout", v)?;
        }
        if let Some(v) = section.get("max_concurrent_tiles") {
            let parsed: usize = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "source".to_string(),
                key: "max_concurrent_tiles".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer".to_string(),
            })?;
            config.source.max_concurrent_tiles = clamp_max_concurrent_tiles(parsed);
        }
        if let Some(v) = section.get("max_covering_tiles") {
            config.source.max_covering_tiles = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|tiles| *tiles > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "source".to_string(),
                    key: "max_covering_tiles".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_seconds(key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ConfigFileError::InvalidValue {
            section: "source".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer (seconds)".to_string(),
        })
}

/// Expand `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
