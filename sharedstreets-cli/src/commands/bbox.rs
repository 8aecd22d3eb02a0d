//! Bbox command - stitch every tile covering a bounding box.

use std::path::PathBuf;

use tracing::info;

use crate::error::CliError;
use crate::geojson::tile_to_geojson;
use crate::runner::{write_json, CliRunner, GlobalArgs};

/// Arguments for the bbox command.
pub struct BboxArgs {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub output: Option<PathBuf>,
}

/// Run the bbox command.
pub fn run(args: BboxArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("bbox");

    let service = runner.create_service()?;
    let start = std::time::Instant::now();
    let graph = runner.block_on(
        service.cancellation(),
        service.union_bbox(args.min_lon, args.min_lat, args.max_lon, args.max_lat),
    )?;

    let stats = service.stats();
    info!(
        geometries = graph.geometries().len(),
        intersections = graph.intersections().len(),
        peak_concurrent_tiles = service.peak_concurrent_tiles(),
        max_concurrent_tiles = runner.source_config().max_concurrent_tiles(),
        max_covering_tiles = runner.source_config().max_covering_tiles(),
        missing_layers = stats.missing_layers,
        transport_failures = stats.transport_failures,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Bounding box merged"
    );

    write_json(args.output.as_deref(), &tile_to_geojson(&graph))
}
