//! Content-addressed identifiers for street geometry.
//!
//! Ids are the only join key between independently fetched layers and
//! between neighbouring tiles, so the input serialization is a wire
//! contract:
//!
//! - every coordinate is written with exactly 6 digits after the decimal point
//! - each point is written as `lon lat`, points are joined by a single space
//! - the message is prefixed with `Geometry ` or `Intersection `
//! - the ASCII message is hashed with MD5 and rendered as 32 lowercase hex digits
//!
//! Changing any of these silently breaks cross-tile deduplication. Bump
//! [`ID_FORMAT_VERSION`] if the format ever has to change.

use md5::{Digest, Md5};

/// Version of the id serialization format described in the module docs.
pub const ID_FORMAT_VERSION: u32 = 1;

const GEOMETRY_TAG: &str = "Geometry";
const INTERSECTION_TAG: &str = "Intersection";

/// Computes the id of a line from its ordered `(lon, lat)` points.
///
/// Point order matters: a reversed line gets a different id.
///
/// ```
/// use sharedstreets::ids::geometry_id;
///
/// let id = geometry_id(&[(110.0, 45.0), (115.0, 50.0), (120.0, 55.0)]);
/// assert_eq!(id, "ce9c0ec1472c0a8bab3190ab075e9b21");
/// ```
pub fn geometry_id(points: &[(f64, f64)]) -> String {
    let mut message = String::from(GEOMETRY_TAG);
    for (lon, lat) in points {
        message.push(' ');
        message.push_str(&format_point(*lon, *lat));
    }
    generate_hash(&message)
}

/// Computes the id of an intersection from its `(lon, lat)` point.
pub fn intersection_id(point: (f64, f64)) -> String {
    let message = format!("{} {}", INTERSECTION_TAG, format_point(point.0, point.1));
    generate_hash(&message)
}

/// Hashes an already serialized message.
pub fn generate_hash(message: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(message.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[inline]
fn format_point(lon: f64, lat: f64) -> String {
    format!("{:.6} {:.6}", lon, lat)
}
