//! Bounding-box containment for geometries.

use crate::coord::{BoundingBox, LatLon};
use crate::model::Geometry;

/// Returns whether `geometry` may lie inside the box spanned by `southwest`
/// and `northeast`.
///
/// This compares the geometry's own bounding box against the query box and
/// only rejects it when the two are disjoint in longitude or in latitude. A
/// diagonal line can pass this test without touching the box; callers that
/// need exact clipping must do it themselves. Touching edges count as
/// overlap.
pub fn is_inside(southwest: LatLon, northeast: LatLon, geometry: &Geometry) -> bool {
    let (min_lon, min_lat, max_lon, max_lat) = geometry.bounds();

    if max_lon < southwest.lon || northeast.lon < min_lon {
        return false;
    }
    if max_lat < southwest.lat || northeast.lat < min_lat {
        return false;
    }
    true
}

impl BoundingBox {
    /// Bounding-box overlap test, see [`is_inside`].
    pub fn intersects_geometry(&self, geometry: &Geometry) -> bool {
        is_inside(self.southwest(), self.northeast(), geometry)
    }
}
