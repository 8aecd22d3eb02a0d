//! Tile assembly: correlate the four layers of one reference-zoom tile.
//!
//! The geometry layer decides what belongs to the tile. Geometries whose
//! bounds overlap the tile are kept; intersections, references and metadata
//! survive only if a kept geometry points at them.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec::TileCodec;
use crate::coord::{LatLon, TileCoord};
use crate::layer::{read_layer, DecodeStats};
use crate::model::{Geometry, Intersection, Layer, Metadata, Record, Reference, Tile};
use crate::source::TileSource;
use crate::spatial::is_inside;

/// Fetches and correlates single tiles.
///
/// Cloning is cheap; clones share the source, codec and counters.
pub struct TileAssembler<S, C> {
    source: Arc<S>,
    codec: Arc<C>,
    reference_zoom: u8,
    stats: Arc<DecodeStats>,
}

impl<S, C> Clone for TileAssembler<S, C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            codec: Arc::clone(&self.codec),
            reference_zoom: self.reference_zoom,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<S: TileSource, C: TileCodec> TileAssembler<S, C> {
    pub fn new(source: Arc<S>, codec: Arc<C>, reference_zoom: u8) -> Self {
        Self {
            source,
            codec,
            reference_zoom,
            stats: Arc::new(DecodeStats::new()),
        }
    }

    /// Shares an existing set of decode counters.
    pub fn with_stats(mut self, stats: Arc<DecodeStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn reference_zoom(&self) -> u8 {
        self.reference_zoom
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Assembles the reference-zoom tile containing `zoom/x/y`.
    ///
    /// Never fails; absent or unreadable layers contribute nothing, and an
    /// address outside the tile grid yields an empty tile without fetching.
    pub async fn assemble(&self, zoom: u8, x: u32, y: u32) -> Tile {
        let requested = TileCoord::from_zxy(zoom, x, y);
        if let Err(e) = requested.validate() {
            warn!(tile = %requested, error = %e, "Skipping tile outside the grid");
            return Tile::default();
        }
        self.assemble_coord(requested.container_at(self.reference_zoom))
            .await
    }

    /// Assembles a tile that is already at the reference zoom.
    pub async fn assemble_coord(&self, coord: TileCoord) -> Tile {
        let (southwest, northeast) = coord.corners();
        let source = self.source.as_ref();
        let codec = self.codec.as_ref();
        let stats = self.stats.as_ref();

        let (geometries, intersections, references, metadata) = tokio::join!(
            read_layer(source, codec, coord, Layer::Geometry, stats),
            read_layer(source, codec, coord, Layer::Intersection, stats),
            read_layer(source, codec, coord, Layer::Reference, stats),
            read_layer(source, codec, coord, Layer::Metadata, stats),
        );

        let tile = correlate(
            southwest,
            northeast,
            geometries,
            intersections,
            references,
            metadata,
        );

        debug!(
            tile = %coord,
            geometries = tile.geometries().len(),
            intersections = tile.intersections().len(),
            references = tile.references().len(),
            metadata = tile.metadata().len(),
            "Tile assembled"
        );
        tile
    }
}

/// Correlates decoded layer records into a tile bounded by the given corners.
///
/// Records of the wrong kind for their layer are ignored. When an id repeats
/// within a layer the first record wins.
pub(crate) fn correlate(
    southwest: LatLon,
    northeast: LatLon,
    geometries: impl IntoIterator<Item = Record>,
    intersections: impl IntoIterator<Item = Record>,
    references: impl IntoIterator<Item = Record>,
    metadata: impl IntoIterator<Item = Record>,
) -> Tile {
    let mut kept_geometries: BTreeMap<String, Geometry> = BTreeMap::new();
    for record in geometries {
        if let Record::Geometry(g) = record {
            if is_inside(southwest, northeast, &g) {
                kept_geometries.entry(g.id.clone()).or_insert(g);
            }
        }
    }

    let referenced: BTreeSet<&str> = kept_geometries
        .values()
        .flat_map(|g| g.intersection_ids())
        .collect();

    let mut kept_intersections: BTreeMap<String, Intersection> = BTreeMap::new();
    for record in intersections {
        if let Record::Intersection(i) = record {
            if referenced.contains(i.id.as_str()) {
                kept_intersections.entry(i.id.clone()).or_insert(i);
            }
        }
    }

    let mut kept_references: BTreeMap<String, Reference> = BTreeMap::new();
    for record in references {
        if let Record::Reference(r) = record {
            if kept_geometries.contains_key(&r.geometry_id) {
                kept_references.entry(r.id.clone()).or_insert(r);
            }
        }
    }

    let mut kept_metadata: BTreeMap<String, Metadata> = BTreeMap::new();
    for record in metadata {
        if let Record::Metadata(m) = record {
            if kept_geometries.contains_key(&m.geometry_id) {
                kept_metadata.entry(m.geometry_id.clone()).or_insert(m);
            }
        }
    }

    Tile::from_parts(
        kept_geometries,
        kept_intersections,
        kept_references,
        kept_metadata,
    )
}
