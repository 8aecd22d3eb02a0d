//! Coordinate type definitions

use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels accepted from callers. Data itself is only published at the
/// configured reference zoom.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Tile coordinates in Web Mercator / Slippy Map system.
///
/// `col` is the slippy-map `x` and `row` is the slippy-map `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
}

impl TileCoord {
    /// Creates a tile coordinate from slippy-map `z/x/y` order.
    pub fn from_zxy(zoom: u8, x: u32, y: u32) -> Self {
        Self {
            zoom,
            row: y,
            col: x,
        }
    }

    /// Slippy-map `x` (column).
    #[inline]
    pub fn x(&self) -> u32 {
        self.col
    }

    /// Slippy-map `y` (row).
    #[inline]
    pub fn y(&self) -> u32 {
        self.row
    }

    /// Checks that the zoom is supported and the tile exists at that zoom.
    pub fn validate(&self) -> Result<(), CoordError> {
        if self.zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(self.zoom));
        }
        let n = 1u32 << self.zoom;
        if self.col >= n || self.row >= n {
            return Err(CoordError::TileOutOfRange {
                zoom: self.zoom,
                x: self.col,
                y: self.row,
            });
        }
        Ok(())
    }

    /// Returns the tile at `zoom` that contains this tile.
    ///
    /// Zooming out divides row and column; zooming in scales them up and
    /// keeps the north-west descendant, which is the container of the
    /// scaled coordinate.
    pub fn container_at(&self, zoom: u8) -> TileCoord {
        if zoom <= self.zoom {
            let shift = u32::from(self.zoom - zoom);
            TileCoord {
                zoom,
                row: self.row.checked_shr(shift).unwrap_or(0),
                col: self.col.checked_shr(shift).unwrap_or(0),
            }
        } else {
            let shift = u32::from(zoom - self.zoom);
            TileCoord {
                zoom,
                row: self.row.checked_shl(shift).unwrap_or(0),
                col: self.col.checked_shl(shift).unwrap_or(0),
            }
        }
    }

    /// Returns the south-west and north-east geographic corners of this tile.
    pub fn corners(&self) -> (LatLon, LatLon) {
        let (north, west) = super::tile_to_lat_lon(self);
        let (south, east) = super::tile_to_lat_lon(&TileCoord {
            zoom: self.zoom,
            row: self.row.saturating_add(1),
            col: self.col.saturating_add(1),
        });
        (LatLon::new(south, west), LatLon::new(north, east))
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// A geographic location in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic rectangle used both to select candidate tiles and to clip
/// the final result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl BoundingBox {
    /// Creates a validated bounding box.
    ///
    /// Latitudes must lie within the Web Mercator range, longitudes within
    /// ±180, and each minimum must not exceed its maximum.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, CoordError> {
        for lat in [min_lat, max_lat] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(CoordError::InvalidLatitude(lat));
            }
        }
        for lon in [min_lon, max_lon] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(CoordError::InvalidLongitude(lon));
            }
        }
        if min_lon > max_lon || min_lat > max_lat {
            return Err(CoordError::InvertedBoundingBox {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            });
        }

        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// South-west corner.
    pub fn southwest(&self) -> LatLon {
        LatLon::new(self.min_lat, self.min_lon)
    }

    /// North-east corner.
    pub fn northeast(&self) -> LatLon {
        LatLon::new(self.max_lat, self.max_lon)
    }

    /// North-west corner, the "upper-left" of the tile grid.
    pub fn upper_left(&self) -> LatLon {
        LatLon::new(self.max_lat, self.min_lon)
    }

    /// South-east corner, the "lower-right" of the tile grid.
    pub fn lower_right(&self) -> LatLon {
        LatLon::new(self.min_lat, self.max_lon)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    #[error("Invalid latitude: {0} (must be between {min} and {max})", min = MIN_LAT, max = MAX_LAT)]
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    #[error("Invalid longitude: {0} (must be between {min} and {max})", min = MIN_LON, max = MAX_LON)]
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    #[error("Invalid zoom level: {0} (must be between {min} and {max})", min = MIN_ZOOM, max = MAX_ZOOM)]
    InvalidZoom(u8),
    /// Tile column or row does not exist at its zoom
    #[error("Tile {zoom}/{x}/{y} is out of range")]
    TileOutOfRange { zoom: u8, x: u32, y: u32 },
    /// Bounding box minimum exceeds its maximum
    #[error("Inverted bounding box: ({min_lon}, {min_lat}) .. ({max_lon}, {max_lat})")]
    InvertedBoundingBox {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },
}
