//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[source]
; Layer URL template. Placeholders: {{z}}, {{x}}, {{y}}, {{layer}}
; (layer is one of geometry, intersection, reference, metadata)
url_template = {}
; Zoom level the layers are published at (default: 12)
reference_zoom = {}
; Timeout for a single layer download in seconds (default: 30)
fetch_timeout = {}
; Timeout for a whole tile or bounding-box request in seconds (default: 120)
request_timeout = {}
; Tiles fetched at once for a bounding-box request, 1-64 (default: 8)
max_concurrent_tiles = {}
; Largest number of tiles one bounding-box request may cover (default: 4096)
max_covering_tiles = {}

[logging]
; Log file path (default: ~/.sharedstreets/sharedstreets.log)
file = {}
"#,
        config.source.url_template,
        config.source.reference_zoom,
        config.source.fetch_timeout,
        config.source.request_timeout,
        config.source.max_concurrent_tiles,
        config.source.max_covering_tiles,
        path_to_string(&config.logging.file),
    )
}

/// Render a path, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
