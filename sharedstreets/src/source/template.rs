//! Tile URL templates.

use std::fmt;

use super::SourceError;
use crate::coord::TileCoord;
use crate::model::Layer;

/// Public SharedStreets tile endpoint.
pub const DEFAULT_URL_TEMPLATE: &str = "http://tiles.sharedstreets.io/{z}-{x}-{y}.{layer}.pbf";

const PLACEHOLDERS: [&str; 4] = ["{z}", "{x}", "{y}", "{layer}"];

/// A validated URL template with `{z}`, `{x}`, `{y}` and `{layer}`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Validates that every placeholder is present.
    pub fn parse(template: &str) -> Result<Self, SourceError> {
        let missing: Vec<&str> = PLACEHOLDERS
            .iter()
            .copied()
            .filter(|p| !template.contains(p))
            .collect();

        if !missing.is_empty() {
            return Err(SourceError::InvalidTemplate(format!(
                "'{}' is missing {}",
                template,
                missing.join(", ")
            )));
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    /// Builds the URL of one layer of one tile.
    pub fn expand(&self, coord: TileCoord, layer: Layer) -> String {
        self.template
            .replace("{z}", &coord.zoom.to_string())
            .replace("{x}", &coord.x().to_string())
            .replace("{y}", &coord.y().to_string())
            .replace("{layer}", layer.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
