//! Tile command - assemble one reference-zoom tile.

use std::path::PathBuf;

use tracing::info;

use crate::error::CliError;
use crate::geojson::tile_to_geojson;
use crate::runner::{write_json, CliRunner, GlobalArgs};

/// Arguments for the tile command.
pub struct TileArgs {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
    pub output: Option<PathBuf>,
}

/// Run the tile command.
pub fn run(args: TileArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("tile");

    let service = runner.create_service()?;
    let tile = runner.block_on(
        service.cancellation(),
        service.assemble_tile(args.zoom, args.x, args.y),
    )?;

    let stats = service.stats();
    info!(
        geometries = tile.geometries().len(),
        intersections = tile.intersections().len(),
        references = tile.references().len(),
        metadata = tile.metadata().len(),
        skipped = stats.skipped,
        missing_layers = stats.missing_layers,
        transport_failures = stats.transport_failures,
        "Tile {}/{}/{} assembled",
        args.zoom,
        args.x,
        args.y
    );

    write_json(args.output.as_deref(), &tile_to_geojson(&tile))
}
