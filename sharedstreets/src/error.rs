//! Errors surfaced by graph requests.
//!
//! Missing or unreachable layers and malformed records never show up here:
//! they degrade to empty data inside the layer reader. What remains are the
//! failures that make a result untrustworthy.

use std::time::Duration;

use thiserror::Error;

use crate::coord::CoordError;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Clipped geometries name intersections that no covering tile has
    #[error(
        "{count} intersection(s) missing from every covering tile: {list}",
        count = .ids.len(),
        list = .ids.join(", ")
    )]
    UnresolvedIntersections { ids: Vec<String> },

    /// The query box covers more tiles than the configured cap
    #[error("bounding box covers {tiles} tiles, more than the limit of {limit}")]
    TooManyTiles { tiles: u64, limit: u64 },

    /// Request did not finish within its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Request was cancelled by the caller
    #[error("request cancelled")]
    Cancelled,

    /// The query bounding box is unusable
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(#[source] CoordError),

    /// The requested tile address is unusable
    #[error("invalid tile: {0}")]
    InvalidTile(#[source] CoordError),

    /// Internal error (e.g., an assembly task panicked)
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_names_every_id() {
        let err = GraphError::UnresolvedIntersections {
            ids: vec!["aaaa".to_string(), "bbbb".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "2 intersection(s) missing from every covering tile: aaaa, bbbb"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = GraphError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "request timed out after 1.5s");
    }

    #[test]
    fn test_too_many_tiles_display() {
        let err = GraphError::TooManyTiles {
            tiles: 16_777_216,
            limit: 4096,
        };
        assert_eq!(
            err.to_string(),
            "bounding box covers 16777216 tiles, more than the limit of 4096"
        );
    }

    #[test]
    fn test_invalid_bbox_keeps_source() {
        let err = GraphError::InvalidBoundingBox(CoordError::InvalidLongitude(200.0));
        assert!(std::error::Error::source(&err).is_some());
    }
}
