//! Tile sources.
//!
//! A [`TileSource`] returns the raw bytes of one layer of one tile. The core
//! never interprets HTTP or file semantics beyond the three outcomes a fetch
//! can have: bytes, not found, or a transport failure.

mod http;
mod template;

pub use http::HttpTileSource;
pub use template::{UrlTemplate, DEFAULT_URL_TEMPLATE};

use std::future::Future;

use bytes::Bytes;
use thiserror::Error;

use crate::coord::TileCoord;
use crate::model::Layer;

/// Errors a tile fetch can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The layer does not exist upstream (no data for this area)
    #[error("tile not found: {url}")]
    NotFound { url: String },

    /// Upstream answered with a non-success status other than 404
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The URL template is unusable
    #[error("invalid URL template: {0}")]
    InvalidTemplate(String),
}

impl SourceError {
    /// Whether this error means "the data does not exist" rather than
    /// "the data could not be reached".
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

/// Async source of raw layer bytes.
pub trait TileSource: Send + Sync {
    /// Fetches one layer of one tile.
    ///
    /// # Arguments
    ///
    /// * `coord` - Tile at the reference zoom
    /// * `layer` - Which of the four layers to fetch
    fn fetch(
        &self,
        coord: TileCoord,
        layer: Layer,
    ) -> impl Future<Output = Result<Bytes, SourceError>> + Send;
}
