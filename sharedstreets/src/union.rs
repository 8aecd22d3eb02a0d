//! Multi-tile union: stitch the tiles covering a bounding box into one
//! graph fragment.
//!
//! Geometries crossing a tile edge are published in every tile they touch,
//! so they are merged by id. The merged set is clipped to the query box and
//! every intersection it references must then be found in some covering
//! tile; otherwise the request fails rather than return a dangling id.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::assembler::TileAssembler;
use crate::codec::TileCodec;
use crate::config::DEFAULT_MAX_COVERING_TILES;
use crate::coord::{covering_tile_count, covering_tiles, BoundingBox, TileCoord};
use crate::error::GraphError;
use crate::limiter::ConcurrencyLimiter;
use crate::model::{Geometry, Intersection, Metadata, Reference, Tile};
use crate::source::TileSource;

/// Assembles and merges all reference-zoom tiles covering a bounding box.
pub struct MultiTileUnion<S, C> {
    assembler: TileAssembler<S, C>,
    limiter: Arc<ConcurrencyLimiter>,
    max_covering_tiles: u64,
}

impl<S, C> MultiTileUnion<S, C>
where
    S: TileSource + 'static,
    C: TileCodec + 'static,
{
    pub fn new(assembler: TileAssembler<S, C>, limiter: Arc<ConcurrencyLimiter>) -> Self {
        Self {
            assembler,
            limiter,
            max_covering_tiles: DEFAULT_MAX_COVERING_TILES,
        }
    }

    /// Rejects boxes covering more than `tiles` tiles; 0 is treated as 1.
    pub fn with_max_covering_tiles(mut self, tiles: u64) -> Self {
        self.max_covering_tiles = tiles.max(1);
        self
    }

    pub fn assembler(&self) -> &TileAssembler<S, C> {
        &self.assembler
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Returns the merged, clipped graph inside `bbox`.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnresolvedIntersections`] if a kept geometry names an
    /// intersection that no covering tile contains, and
    /// [`GraphError::TooManyTiles`] before any fetch if the box covers more
    /// tiles than allowed.
    pub async fn union(&self, bbox: &BoundingBox) -> Result<Tile, GraphError> {
        let zoom = self.assembler.reference_zoom();
        let count = covering_tile_count(bbox, zoom).map_err(GraphError::InvalidBoundingBox)?;
        if count > self.max_covering_tiles {
            warn!(
                tiles = count,
                limit = self.max_covering_tiles,
                "Bounding box covers too many tiles"
            );
            return Err(GraphError::TooManyTiles {
                tiles: count,
                limit: self.max_covering_tiles,
            });
        }

        let coords = covering_tiles(bbox, zoom).map_err(GraphError::InvalidBoundingBox)?;
        debug!(tiles = coords.len(), "Covering tiles computed");

        let tiles = self.assemble_all(&coords).await?;
        merge(bbox, &tiles)
    }

    /// Assembles every tile concurrently and returns them in `coords` order.
    ///
    /// Tasks are spawned as earlier ones finish, so the set never holds more
    /// than the limiter's capacity.
    async fn assemble_all(&self, coords: &[TileCoord]) -> Result<Vec<Tile>, GraphError> {
        let window = self.limiter.max_concurrent();
        let mut pending = coords.iter().copied().enumerate();
        let mut tasks = JoinSet::new();
        let mut slots: Vec<Option<Tile>> = (0..coords.len()).map(|_| None).collect();

        loop {
            while tasks.len() < window {
                let Some((index, coord)) = pending.next() else {
                    break;
                };
                let assembler = self.assembler.clone();
                let limiter = Arc::clone(&self.limiter);
                tasks.spawn(async move {
                    let _permit = limiter.acquire(coord).await.map_err(|_| {
                        GraphError::Internal(format!("{} limiter closed", limiter.label()))
                    })?;
                    Ok::<_, GraphError>((index, assembler.assemble_coord(coord).await))
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            let (index, tile) = joined
                .map_err(|e| GraphError::Internal(format!("tile assembly task failed: {}", e)))??;
            slots[index] = Some(tile);
        }

        debug!(
            tiles = coords.len(),
            peak_concurrent = self.limiter.peak_in_flight(),
            queued = self.limiter.queued(),
            "Covering tiles assembled"
        );
        Ok(slots.into_iter().flatten().collect())
    }
}

/// Merges assembled tiles, given in covering order, and clips to `bbox`.
///
/// For every id the first tile that has it wins.
pub(crate) fn merge(bbox: &BoundingBox, tiles: &[Tile]) -> Result<Tile, GraphError> {
    let mut geometries: BTreeMap<String, Geometry> = BTreeMap::new();
    let mut duplicates = 0usize;
    for tile in tiles {
        for (id, geometry) in tile.geometries() {
            if geometries.contains_key(id) {
                duplicates += 1;
            } else {
                geometries.insert(id.clone(), geometry.clone());
            }
        }
    }
    let merged = geometries.len();
    geometries.retain(|_, g| bbox.intersects_geometry(g));

    let referenced: BTreeSet<&str> = geometries
        .values()
        .flat_map(|g| g.intersection_ids())
        .collect();

    let mut intersections: BTreeMap<String, Intersection> = BTreeMap::new();
    let mut missing = Vec::new();
    for id in referenced {
        match tiles.iter().find_map(|t| t.intersections().get(id)) {
            Some(intersection) => {
                intersections.insert(id.to_string(), intersection.clone());
            }
            None => missing.push(id.to_string()),
        }
    }
    if !missing.is_empty() {
        warn!(missing = ?missing, "Union has unresolved intersections");
        return Err(GraphError::UnresolvedIntersections { ids: missing });
    }

    let mut references: BTreeMap<String, Reference> = BTreeMap::new();
    let mut metadata: BTreeMap<String, Metadata> = BTreeMap::new();
    for tile in tiles {
        for (id, reference) in tile.references() {
            if geometries.contains_key(&reference.geometry_id) {
                references
                    .entry(id.clone())
                    .or_insert_with(|| reference.clone());
            }
        }
        for (geometry_id, entry) in tile.metadata() {
            if geometries.contains_key(geometry_id) {
                metadata
                    .entry(geometry_id.clone())
                    .or_insert_with(|| entry.clone());
            }
        }
    }

    debug!(
        tiles = tiles.len(),
        merged,
        duplicates,
        clipped = geometries.len(),
        intersections = intersections.len(),
        "Union merged"
    );

    Ok(Tile::from_parts(
        geometries,
        intersections,
        references,
        metadata,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ProtobufCodec;
    use crate::coord::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
    use crate::model::Layer;
    use crate::source::tests::{geometry, intersection, metadata, reference, MockTileSource};

    fn union_over(
        source: MockTileSource,
        max_tiles: usize,
    ) -> MultiTileUnion<MockTileSource, ProtobufCodec> {
        let assembler = TileAssembler::new(Arc::new(source), Arc::new(ProtobufCodec), 12);
        MultiTileUnion::new(assembler, Arc::new(ConcurrencyLimiter::new(max_tiles, "tiles")))
    }

    /// The four zoom-12 tiles meeting at (0, 0), in covering order.
    fn origin_tiles() -> [TileCoord; 4] {
        [
            TileCoord::from_zxy(12, 2047, 2047),
            TileCoord::from_zxy(12, 2048, 2047),
            TileCoord::from_zxy(12, 2047, 2048),
            TileCoord::from_zxy(12, 2048, 2048),
        ]
    }

    fn origin_bbox() -> BoundingBox {
        BoundingBox::new(-0.0005, -0.0005, 0.0005, 0.0005).unwrap()
    }

    #[tokio::test]
    async fn test_geometry_across_tile_edge_is_deduplicated() {
        let line = vec![(-0.0001, 0.0001), (0.0001, 0.0001)];
        let west = origin_tiles()[0];
        let east = origin_tiles()[1];

        let mut source = MockTileSource::new();
        for coord in [west, east] {
            source = source
                .with_records(coord, Layer::Geometry, &[geometry("edge", line.clone(), "w", "e")])
                .with_records(
                    coord,
                    Layer::Intersection,
                    &[intersection("w", 1, -0.0001, 0.0001), intersection("e", 2, 0.0001, 0.0001)],
                )
                .with_records(coord, Layer::Reference, &[reference("edge-fwd", "edge")]);
        }

        let tile = union_over(source, 4).union(&origin_bbox()).await.unwrap();
        assert_eq!(tile.geometries().len(), 1);
        assert_eq!(tile.intersections().len(), 2);
        assert_eq!(tile.references().len(), 1);
    }

    #[tokio::test]
    async fn test_intersection_resolved_from_neighbouring_tile() {
        // Each tile only publishes the endpoint that lies inside it
        let [west, east, _, _] = origin_tiles();
        let crossing = [geometry("g", vec![(-0.0002, 0.0001), (0.0002, 0.0001)], "w", "e")];
        let source = MockTileSource::new()
            .with_records(west, Layer::Geometry, &crossing)
            .with_records(east, Layer::Geometry, &crossing)
            .with_records(west, Layer::Intersection, &[intersection("w", 1, -0.0002, 0.0001)])
            .with_records(east, Layer::Intersection, &[intersection("e", 2, 0.0002, 0.0001)]);

        let tile = union_over(source, 2).union(&origin_bbox()).await.unwrap();
        assert_eq!(tile.intersections().len(), 2);
        assert_eq!(tile.intersections()["e"].node_id, 2);
    }

    #[tokio::test]
    async fn test_missing_intersection_is_an_error() {
        let [west, _, _, _] = origin_tiles();
        let source = MockTileSource::new()
            .with_records(
                west,
                Layer::Geometry,
                &[geometry("g", vec![(-0.0002, 0.0001), (-0.0001, 0.0002)], "w", "ghost")],
            )
            .with_records(west, Layer::Intersection, &[intersection("w", 1, -0.0002, 0.0001)]);

        let err = union_over(source, 4).union(&origin_bbox()).await.unwrap_err();
        match err {
            GraphError::UnresolvedIntersections { ids } => assert_eq!(ids, vec!["ghost"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_clip_drops_geometries_outside_query() {
        let [west, _, _, _] = origin_tiles();
        // Tile 12/2047/2047 spans roughly lon -0.088..0, lat 0..0.088
        let source = MockTileSource::new()
            .with_records(
                west,
                Layer::Geometry,
                &[
                    geometry("near", vec![(-0.0002, 0.0001), (-0.0001, 0.0002)], "a", "b"),
                    geometry("far", vec![(-0.05, 0.05), (-0.04, 0.06)], "c", "d"),
                ],
            )
            .with_records(
                west,
                Layer::Intersection,
                &[intersection("a", 1, -0.0002, 0.0001), intersection("b", 2, -0.0001, 0.0002)],
            )
            .with_records(west, Layer::Metadata, &[metadata("near", "A"), metadata("far", "B")]);

        let tile = union_over(source, 4).union(&origin_bbox()).await.unwrap();
        assert_eq!(tile.geometries().keys().collect::<Vec<_>>(), vec!["near"]);
        assert_eq!(tile.metadata().keys().collect::<Vec<_>>(), vec!["near"]);
        // far's endpoints are never required
        assert_eq!(tile.intersections().len(), 2);
    }

    #[tokio::test]
    async fn test_union_respects_concurrency_limit() {
        let union = union_over(MockTileSource::new(), 1);
        let tile = union.union(&origin_bbox()).await.unwrap();

        assert!(tile.is_empty());
        assert_eq!(union.limiter().peak_in_flight(), 1);
        assert_eq!(union.assembler().stats().snapshot().missing_layers, 16);
    }

    #[tokio::test]
    async fn test_too_many_tiles_rejected_before_fetching() {
        let union = union_over(MockTileSource::new(), 4).with_max_covering_tiles(3);
        let err = union.union(&origin_bbox()).await.unwrap_err();

        assert!(matches!(err, GraphError::TooManyTiles { tiles: 4, limit: 3 }));
        assert_eq!(union.assembler().stats().snapshot().missing_layers, 0);
    }

    #[tokio::test]
    async fn test_whole_world_at_deep_zoom_is_rejected() {
        let assembler =
            TileAssembler::new(Arc::new(MockTileSource::new()), Arc::new(ProtobufCodec), 16);
        let union = MultiTileUnion::new(assembler, Arc::new(ConcurrencyLimiter::new(8, "tiles")));
        let world = BoundingBox::new(MIN_LON, MIN_LAT, MAX_LON, MAX_LAT).unwrap();

        match union.union(&world).await.unwrap_err() {
            GraphError::TooManyTiles { tiles, limit } => {
                assert_eq!(tiles, 1 << 32);
                assert_eq!(limit, DEFAULT_MAX_COVERING_TILES);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_many_tiles_assembled_with_small_window() {
        // Several zoom-12 tiles around Oakland, two at a time
        let bbox = BoundingBox::new(-122.35, 37.75, -122.20, 37.90).unwrap();
        let union = union_over(MockTileSource::new(), 2);
        let tile = union.union(&bbox).await.unwrap();

        let covered = covering_tile_count(&bbox, 12).unwrap();
        assert!(covered > 2);
        assert!(tile.is_empty());
        assert!(union.limiter().peak_in_flight() <= 2);
        assert_eq!(union.limiter().queued(), 0);
        assert_eq!(
            union.assembler().stats().snapshot().missing_layers,
            covered * 4
        );
    }

    #[test]
    fn test_merge_first_tile_wins() {
        let bbox = BoundingBox::new(-1.0, -1.0, 1.0, 1.0).unwrap();
        let first = crate::assembler::correlate(
            bbox.southwest(),
            bbox.northeast(),
            vec![geometry("g", vec![(0.0, 0.0), (0.1, 0.1)], "a", "b")],
            vec![intersection("a", 10, 0.0, 0.0), intersection("b", 11, 0.1, 0.1)],
            vec![],
            vec![],
        );
        let second = crate::assembler::correlate(
            bbox.southwest(),
            bbox.northeast(),
            vec![geometry("g", vec![(0.0, 0.0), (0.1, 0.1)], "a", "b")],
            vec![intersection("a", 20, 0.0, 0.0), intersection("b", 21, 0.1, 0.1)],
            vec![],
            vec![],
        );

        let merged = merge(&bbox, &[first, second]).unwrap();
        assert_eq!(merged.intersections()["a"].node_id, 10);
        assert_eq!(merged.intersections()["b"].node_id, 11);
    }
}
