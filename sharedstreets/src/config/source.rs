//! Runtime configuration for tile retrieval.

use std::time::Duration;

use super::defaults::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_TILES, DEFAULT_MAX_COVERING_TILES, DEFAULT_REFERENCE_ZOOM,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::source::UrlTemplate;

/// Configuration for fetching and correlating tiles.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sharedstreets::config::SourceConfig;
///
/// let config = SourceConfig::default();
/// assert_eq!(config.reference_zoom(), 12);
/// assert_eq!(config.max_concurrent_tiles(), 8);
///
/// let config = SourceConfig::new()
///     .with_fetch_timeout(Duration::from_secs(5))
///     .with_max_concurrent_tiles(2);
/// assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Zoom level at which upstream layers are published
    reference_zoom: u8,
    url_template: UrlTemplate,
    /// Deadline for one layer fetch
    fetch_timeout: Duration,
    /// Deadline for one whole assemble or union request
    request_timeout: Duration,
    /// Tiles assembled at once by a union
    max_concurrent_tiles: usize,
    /// Largest covering set a union accepts
    max_covering_tiles: u64,
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference zoom. Default: 12.
    ///
    /// Only change this for a mirror that republishes data at another zoom.
    pub fn with_reference_zoom(mut self, zoom: u8) -> Self {
        self.reference_zoom = zoom;
        self
    }

    pub fn with_url_template(mut self, template: UrlTemplate) -> Self {
        self.url_template = template;
        self
    }

    /// Set the per-fetch deadline. Default: 30 seconds.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the per-request deadline. Default: 120 seconds.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set how many tiles a union assembles concurrently. Default: 8.
    ///
    /// Values below 1 are raised to 1.
    pub fn with_max_concurrent_tiles(mut self, tiles: usize) -> Self {
        self.max_concurrent_tiles = tiles.max(1);
        self
    }

    /// Set the largest number of tiles a union may cover. Default: 4096.
    ///
    /// Values below 1 are raised to 1.
    pub fn with_max_covering_tiles(mut self, tiles: u64) -> Self {
        self.max_covering_tiles = tiles.max(1);
        self
    }

    pub fn reference_zoom(&self) -> u8 {
        self.reference_zoom
    }

    pub fn url_template(&self) -> &UrlTemplate {
        &self.url_template
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_concurrent_tiles(&self) -> usize {
        self.max_concurrent_tiles
    }

    pub fn max_covering_tiles(&self) -> u64 {
        self.max_covering_tiles
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            reference_zoom: DEFAULT_REFERENCE_ZOOM,
            url_template: UrlTemplate::default(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_concurrent_tiles: DEFAULT_MAX_CONCURRENT_TILES,
            max_covering_tiles: DEFAULT_MAX_COVERING_TILES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DEFAULT_URL_TEMPLATE;

    #[test]
    fn test_default_config() {
        let config = SourceConfig::default();
        assert_eq!(config.reference_zoom(), DEFAULT_REFERENCE_ZOOM);
        assert_eq!(config.url_template().as_str(), DEFAULT_URL_TEMPLATE);
        assert_eq!(
            config.fetch_timeout(),
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
        );
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(config.max_concurrent_tiles(), DEFAULT_MAX_CONCURRENT_TILES);
        assert_eq!(config.max_covering_tiles(), DEFAULT_MAX_COVERING_TILES);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(SourceConfig::new(), SourceConfig::default());
    }

    #[test]
    fn test_with_request_timeout() {
        let config = SourceConfig::new().with_request_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
        assert_eq!(config.reference_zoom(), DEFAULT_REFERENCE_ZOOM); // Unchanged
    }

    #[test]
    fn test_zero_concurrency_is_raised() {
        let config = SourceConfig::new().with_max_concurrent_tiles(0);
        assert_eq!(config.max_concurrent_tiles(), 1);
        assert_eq!(SourceConfig::new().with_max_covering_tiles(0).max_covering_tiles(), 1);
    }

    #[test]
    fn test_builder_chain() {
        let template = UrlTemplate::parse("http://mirror/{z}/{x}/{y}/{layer}").unwrap();
        let config = SourceConfig::new()
            .with_reference_zoom(14)
            .with_url_template(template.clone())
            .with_max_concurrent_tiles(3);

        assert_eq!(config.reference_zoom(), 14);
        assert_eq!(config.url_template(), &template);
        assert_eq!(config.max_concurrent_tiles(), 3);
    }
}
