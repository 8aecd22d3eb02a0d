//! Id command - compute SharedStreets identifiers offline.

use clap::Subcommand;

use sharedstreets::ids::{geometry_id, intersection_id};

use crate::error::CliError;

/// Id subcommands.
#[derive(Debug, Subcommand)]
pub enum IdCommands {
    /// Identifier of a line, given as ordered `lon,lat` points
    Geometry {
        /// Points as lon,lat (e.g., -122.27,37.80)
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        points: Vec<String>,
    },

    /// Identifier of an intersection point
    #[command(allow_negative_numbers = true)]
    Intersection {
        /// Longitude in decimal degrees
        lon: f64,
        /// Latitude in decimal degrees
        lat: f64,
    },
}

/// Run an id subcommand.
pub fn run(command: IdCommands) -> Result<(), CliError> {
    let id = match command {
        IdCommands::Geometry { points } => {
            let points = points
                .iter()
                .map(|p| parse_point(p))
                .collect::<Result<Vec<_>, _>>()?;
            geometry_id(&points)
        }
        IdCommands::Intersection { lon, lat } => intersection_id((lon, lat)),
    };
    println!("{}", id);
    Ok(())
}

/// Parses `lon,lat`.
pub fn parse_point(value: &str) -> Result<(f64, f64), CliError> {
    let invalid = || {
        CliError::InvalidArgument(format!(
            "'{}' is not a lon,lat point (e.g., -122.27,37.80)",
            value
        ))
    };

    let (lon, lat) = value.split_once(',').ok_or_else(invalid)?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    Ok((lon, lat))
}
