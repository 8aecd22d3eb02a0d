//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates, plus the covering-tile computation
//! used to turn a bounding box into a set of reference-zoom partitions.

mod types;

#[cfg(test)]
mod tests;

pub use types::{
    BoundingBox, CoordError, LatLon, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// Points on the east edge or south edge of the world map are clamped into
/// the last column/row.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let last = (n as u32).saturating_sub(1);

    let col = ((lon + 180.0) / 360.0 * n) as u32;

    let lat_rad = lat * PI / 180.0;
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    Ok(TileCoord {
        zoom,
        row: row.min(last),
        col: col.min(last),
    })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.col as f64 / n * 360.0 - 180.0;

    let y = tile.row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// Returns the minimal set of tiles at `zoom` covering `bbox`.
///
/// The tiles of the bbox's upper-left and lower-right corners bound an
/// inclusive rectangle; tiles are yielded in row-major order starting at
/// the north-west tile. Check [`covering_tile_count`] first when the box
/// may be large: a whole-world box at zoom 16 covers 2^32 tiles.
pub fn covering_tiles(bbox: &BoundingBox, zoom: u8) -> Result<Vec<TileCoord>, CoordError> {
    let (ul, lr) = covering_corners(bbox, zoom)?;
    Ok((ul.row..=lr.row)
        .flat_map(|row| (ul.col..=lr.col).map(move |col| TileCoord { zoom, row, col }))
        .collect())
}

/// Number of tiles [`covering_tiles`] would return, without building them.
pub fn covering_tile_count(bbox: &BoundingBox, zoom: u8) -> Result<u64, CoordError> {
    let (ul, lr) = covering_corners(bbox, zoom)?;
    let rows = u64::from(lr.row - ul.row) + 1;
    let cols = u64::from(lr.col - ul.col) + 1;
    // At most 2^22 per side
    Ok(rows.saturating_mul(cols))
}

fn covering_corners(bbox: &BoundingBox, zoom: u8) -> Result<(TileCoord, TileCoord), CoordError> {
    let upper_left = bbox.upper_left();
    let lower_right = bbox.lower_right();
    let ul = to_tile_coords(upper_left.lat, upper_left.lon, zoom)?;
    let lr = to_tile_coords(lower_right.lat, lower_right.lon, zoom)?;
    Ok((ul, lr))
}
