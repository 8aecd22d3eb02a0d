//! HTTP tile source backed by reqwest.

use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use tracing::{debug, trace, warn};

use super::{SourceError, TileSource, UrlTemplate};
use crate::config::SourceConfig;
use crate::coord::TileCoord;
use crate::model::Layer;

const USER_AGENT: &str = concat!("sharedstreets/", env!("CARGO_PKG_VERSION"));

/// Fetches layer files from a templated HTTP endpoint.
///
/// The inner `reqwest::Client` is a shared connection pool; cloning the
/// source is cheap and clones share the pool.
#[derive(Clone)]
pub struct HttpTileSource {
    client: reqwest::Client,
    template: UrlTemplate,
}

impl HttpTileSource {
    /// Creates a source with its own connection pool.
    ///
    /// # Arguments
    ///
    /// * `template` - URL template for layer files
    /// * `fetch_timeout` - Deadline for a single layer fetch, body included
    pub fn new(template: UrlTemplate, fetch_timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| SourceError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, template })
    }

    /// Creates a source from runtime configuration.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        Self::new(config.url_template().clone(), config.fetch_timeout())
    }

    /// Uses an existing client, e.g. one shared with other components.
    pub fn with_client(client: reqwest::Client, template: UrlTemplate) -> Self {
        Self { client, template }
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }
}

impl TileSource for HttpTileSource {
    async fn fetch(&self, coord: TileCoord, layer: Layer) -> Result<Bytes, SourceError> {
        let url = self.template.expand(coord, layer);
        trace!(url = %url, "Tile fetch starting");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url = %url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "Tile request failed"
                );
                return Err(SourceError::Transport(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "Tile layer not found");
            return Err(SourceError::NotFound { url });
        }
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "HTTP error status");
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = %url, bytes = bytes.len(), "Tile body read");
                Ok(bytes)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read tile body");
                Err(SourceError::Transport(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}
