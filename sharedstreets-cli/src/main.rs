//! SharedStreets CLI - Command-line interface
//!
//! This binary provides a command-line interface to the SharedStreets
//! library: fetch tiles or bounding boxes as GeoJSON, inspect local layer
//! files and compute identifiers.

mod commands;
mod error;
mod geojson;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::bbox::BboxArgs;
use commands::config::ConfigCommands;
use commands::id::IdCommands;
use commands::read_file::ReadFileArgs;
use commands::tile::TileArgs;
use error::CliError;
use runner::GlobalArgs;
use sharedstreets::model::Layer;

#[derive(Parser)]
#[command(name = "sharedstreets")]
#[command(version = sharedstreets::VERSION)]
#[command(about = "Fetch and stitch SharedStreets street graph tiles", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the reference-zoom tile containing zoom/x/y and print GeoJSON
    Tile {
        /// Zoom level of the requested tile
        zoom: u8,
        /// Tile column
        x: u32,
        /// Tile row
        y: u32,
        /// Write GeoJSON to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Merge every tile covering a bounding box and print GeoJSON
    #[command(allow_negative_numbers = true)]
    Bbox {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        /// Write GeoJSON to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Dump the length-delimited records of a local layer file
    ReadFile {
        /// Layer file (.pbf)
        path: PathBuf,
        /// Record kind; guessed from the data when omitted
        #[arg(long)]
        kind: Option<Layer>,
    },

    /// Compute identifiers
    #[command(subcommand)]
    Id(IdCommands),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;
    match cli.command {
        Commands::Tile { zoom, x, y, output } => {
            commands::tile::run(TileArgs { zoom, x, y, output }, &global)
        }
        Commands::Bbox {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            output,
        } => commands::bbox::run(
            BboxArgs {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
                output,
            },
            &global,
        ),
        Commands::ReadFile { path, kind } => commands::read_file::run(ReadFileArgs { path, kind }),
        Commands::Id(command) => commands::id::run(command),
        Commands::Config(command) => commands::config::run(command, &global),
    }
}
