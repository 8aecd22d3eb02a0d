//! Street graph service facade implementation.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::assembler::TileAssembler;
use crate::codec::{ProtobufCodec, TileCodec};
use crate::config::SourceConfig;
use crate::coord::{BoundingBox, TileCoord};
use crate::error::GraphError;
use crate::layer::{DecodeStats, DecodeStatsSnapshot};
use crate::limiter::ConcurrencyLimiter;
use crate::model::Tile;
use crate::source::{HttpTileSource, SourceError, TileSource};
use crate::union::MultiTileUnion;

/// High-level facade for street graph retrieval.
///
/// Wires a [`TileSource`] and [`TileCodec`] into a [`TileAssembler`] and a
/// [`MultiTileUnion`], and puts every request under the configured deadline
/// and a cancellation token.
///
/// # Example
///
/// ```ignore
/// use sharedstreets::config::SourceConfig;
/// use sharedstreets::service::StreetGraphService;
///
/// let service = StreetGraphService::from_config(SourceConfig::default())?;
/// let tile = service.assemble_tile(16, 10509, 25324).await?;
/// let area = service.union_bbox(-122.30, 37.80, -122.29, 37.81).await?;
/// ```
pub struct StreetGraphService<S, C = ProtobufCodec> {
    union: MultiTileUnion<S, C>,
    config: SourceConfig,
    stats: Arc<DecodeStats>,
    cancellation: CancellationToken,
}

impl StreetGraphService<HttpTileSource, ProtobufCodec> {
    /// Creates a service that fetches from the configured HTTP endpoint.
    pub fn from_config(config: SourceConfig) -> Result<Self, SourceError> {
        let source = HttpTileSource::from_config(&config)?;
        Ok(Self::new(source, ProtobufCodec, config))
    }
}

impl<S, C> StreetGraphService<S, C>
where
    S: TileSource + 'static,
    C: TileCodec + 'static,
{
    pub fn new(source: S, codec: C, config: SourceConfig) -> Self {
        let stats = Arc::new(DecodeStats::new());
        let assembler = TileAssembler::new(
            Arc::new(source),
            Arc::new(codec),
            config.reference_zoom(),
        )
        .with_stats(Arc::clone(&stats));
        let limiter = Arc::new(ConcurrencyLimiter::new(
            config.max_concurrent_tiles(),
            "tiles",
        ));

        info!(
            reference_zoom = config.reference_zoom(),
            url_template = %config.url_template(),
            max_concurrent_tiles = config.max_concurrent_tiles(),
            max_covering_tiles = config.max_covering_tiles(),
            request_timeout = ?config.request_timeout(),
            "Street graph service created"
        );

        Self {
            union: MultiTileUnion::new(assembler, limiter)
                .with_max_covering_tiles(config.max_covering_tiles()),
            config,
            stats,
            cancellation: CancellationToken::new(),
        }
    }

    /// Ties the service to an outer token; cancelling it cancels every
    /// request of this service.
    pub fn with_cancellation(mut self, parent: &CancellationToken) -> Self {
        self.cancellation = parent.child_token();
        self
    }

    /// Assembles the reference-zoom tile containing `zoom/x/y`.
    ///
    /// # Errors
    ///
    /// Only on an invalid tile address, timeout or cancellation. Missing
    /// layers produce an empty tile.
    pub async fn assemble_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Tile, GraphError> {
        let requested = TileCoord::from_zxy(zoom, x, y);
        requested.validate().map_err(GraphError::InvalidTile)?;

        let container = requested.container_at(self.config.reference_zoom());
        debug!(requested = %requested, container = %container, "Assembling tile");

        let assembler = self.union.assembler();
        self.run(async { Ok(assembler.assemble_coord(container).await) })
            .await
    }

    /// Returns the merged graph inside a bounding box.
    pub async fn union_bbox(
        &self,
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    ) -> Result<Tile, GraphError> {
        let bbox = BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
            .map_err(GraphError::InvalidBoundingBox)?;
        self.union(&bbox).await
    }

    /// Same as [`union_bbox`](Self::union_bbox) for an already built box.
    pub async fn union(&self, bbox: &BoundingBox) -> Result<Tile, GraphError> {
        debug!(
            min_lon = bbox.min_lon(),
            min_lat = bbox.min_lat(),
            max_lon = bbox.max_lon(),
            max_lat = bbox.max_lat(),
            "Union requested"
        );
        self.run(self.union.union(bbox)).await
    }

    /// Cancels all in-flight and future requests.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Decode and fetch counters accumulated over the service's lifetime.
    pub fn stats(&self) -> DecodeStatsSnapshot {
        self.stats.snapshot()
    }

    /// Highest number of tiles assembled at once so far.
    pub fn peak_concurrent_tiles(&self) -> usize {
        self.union.limiter().peak_in_flight()
    }

    /// Runs a request under the deadline and the cancellation token.
    ///
    /// Whichever fires first drops the request future, which aborts any
    /// outstanding fetches.
    async fn run<T>(
        &self,
        request: impl Future<Output = Result<T, GraphError>>,
    ) -> Result<T, GraphError> {
        let deadline = self.config.request_timeout();
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                debug!("Request cancelled");
                Err(GraphError::Cancelled)
            }
            result = tokio::time::timeout(deadline, request) => {
                result.unwrap_or_else(|_| {
                    debug!(timeout = ?deadline, "Request timed out");
                    Err(GraphError::Timeout(deadline))
                })
            }
        }
    }
}
