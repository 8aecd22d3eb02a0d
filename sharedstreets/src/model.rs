//! Street graph entities.
//!
//! Every entity is identified by a content hash (see [`crate::ids`]) and is
//! immutable once decoded. A [`Tile`] bundles the four id-keyed layers of
//! one correlated graph fragment.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A `(lon, lat)` pair in degrees.
pub type LonLat = (f64, f64);

/// One of the four upstream layers a tile is published as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Geometry,
    Intersection,
    Reference,
    Metadata,
}

impl Layer {
    /// All layers, in the order they are correlated.
    pub const ALL: [Layer; 4] = [
        Layer::Geometry,
        Layer::Intersection,
        Layer::Reference,
        Layer::Metadata,
    ];

    /// Name used in upstream URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Geometry => "geometry",
            Layer::Intersection => "intersection",
            Layer::Reference => "reference",
            Layer::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "geometry" => Ok(Layer::Geometry),
            "intersection" => Ok(Layer::Intersection),
            "reference" => Ok(Layer::Reference),
            "metadata" => Ok(Layer::Metadata),
            other => Err(format!(
                "unknown layer '{}' (expected geometry, intersection, reference or metadata)",
                other
            )),
        }
    }
}

/// Functional road class carried by geometries and OSM way sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unclassified,
    Service,
    #[default]
    Other,
    /// A wire value this version does not know, kept as received
    Unrecognized(i32),
}

impl RoadClass {
    /// Maps the wire integer. Unknown values are kept in
    /// [`RoadClass::Unrecognized`] so [`to_wire`](Self::to_wire) returns them
    /// unchanged.
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => RoadClass::Motorway,
            1 => RoadClass::Trunk,
            2 => RoadClass::Primary,
            3 => RoadClass::Secondary,
            4 => RoadClass::Tertiary,
            5 => RoadClass::Residential,
            6 => RoadClass::Unclassified,
            7 => RoadClass::Service,
            8 => RoadClass::Other,
            other => RoadClass::Unrecognized(other),
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            RoadClass::Motorway => 0,
            RoadClass::Trunk => 1,
            RoadClass::Primary => 2,
            RoadClass::Secondary => 3,
            RoadClass::Tertiary => 4,
            RoadClass::Residential => 5,
            RoadClass::Unclassified => 6,
            RoadClass::Service => 7,
            RoadClass::Other => 8,
            RoadClass::Unrecognized(value) => value,
        }
    }
}

/// Form of way of a directional reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormOfWay {
    #[default]
    Undefined,
    Motorway,
    MultipleCarriageway,
    SingleCarriageway,
    Roundabout,
    TrafficSquare,
    SlipRoad,
    Other,
    /// A wire value this version does not know, kept as received
    Unrecognized(i32),
}

impl FormOfWay {
    /// Maps the wire integer. Unknown values are kept in
    /// [`FormOfWay::Unrecognized`].
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => FormOfWay::Undefined,
            1 => FormOfWay::Motorway,
            2 => FormOfWay::MultipleCarriageway,
            3 => FormOfWay::SingleCarriageway,
            4 => FormOfWay::Roundabout,
            5 => FormOfWay::TrafficSquare,
            6 => FormOfWay::SlipRoad,
            7 => FormOfWay::Other,
            other => FormOfWay::Unrecognized(other),
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            FormOfWay::Undefined => 0,
            FormOfWay::Motorway => 1,
            FormOfWay::MultipleCarriageway => 2,
            FormOfWay::SingleCarriageway => 3,
            FormOfWay::Roundabout => 4,
            FormOfWay::TrafficSquare => 5,
            FormOfWay::SlipRoad => 6,
            FormOfWay::Other => 7,
            FormOfWay::Unrecognized(value) => value,
        }
    }
}

/// A directed street segment between two intersections.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub id: String,
    /// Ordered points, at least two.
    pub points: Vec<LonLat>,
    pub from_intersection_id: String,
    pub to_intersection_id: String,
    pub forward_reference_id: String,
    pub back_reference_id: String,
    pub road_class: RoadClass,
}

impl Geometry {
    /// Coordinate-wise bounding box as `(min_lon, min_lat, max_lon, max_lat)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.points.iter().fold(
            (
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
            ),
            |(min_lon, min_lat, max_lon, max_lat), &(lon, lat)| {
                (
                    min_lon.min(lon),
                    min_lat.min(lat),
                    max_lon.max(lon),
                    max_lat.max(lat),
                )
            },
        )
    }

    /// Both endpoint intersection ids.
    pub fn intersection_ids(&self) -> [&str; 2] {
        [&self.from_intersection_id, &self.to_intersection_id]
    }
}

/// A street graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub id: String,
    /// Upstream OSM node id.
    pub node_id: u64,
    pub lon: f64,
    pub lat: f64,
    pub inbound_reference_ids: Vec<String>,
    pub outbound_reference_ids: Vec<String>,
}

/// One endpoint of a directional reference.
///
/// The trailing endpoint carries no distance to the next reference and no
/// outbound bearing.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReference {
    pub intersection_id: String,
    pub lon: f64,
    pub lat: f64,
    pub inbound_bearing: Option<u32>,
    pub outbound_bearing: Option<u32>,
    pub distance_to_next_ref: Option<u32>,
}

/// A directional traversal of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub id: String,
    pub geometry_id: String,
    pub form_of_way: FormOfWay,
    pub location_references: Vec<LocationReference>,
}

/// One OSM way (or part of a way) a geometry was derived from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaySection {
    pub way_id: u64,
    pub road_class: RoadClass,
    pub one_way: bool,
    pub roundabout: bool,
    pub link: bool,
    pub node_ids: Vec<u64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmMetadata {
    pub name: String,
    pub way_sections: Vec<WaySection>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GisSection {
    pub section_id: String,
    pub section_properties: String,
}

/// Attribution to a non-OSM source dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GisMetadata {
    pub source: String,
    pub sections: Vec<GisSection>,
}

/// Source attribution for one geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub geometry_id: String,
    pub osm: Option<OsmMetadata>,
    pub gis: Vec<GisMetadata>,
}

/// Record kinds a layer can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Geometry,
    Intersection,
    Reference,
    Metadata,
}

impl RecordKind {
    /// Order in which kinds are tried when sniffing an unknown buffer.
    pub const SNIFF_ORDER: [RecordKind; 4] = [
        RecordKind::Intersection,
        RecordKind::Geometry,
        RecordKind::Reference,
        RecordKind::Metadata,
    ];
}

impl From<Layer> for RecordKind {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Geometry => RecordKind::Geometry,
            Layer::Intersection => RecordKind::Intersection,
            Layer::Reference => RecordKind::Reference,
            Layer::Metadata => RecordKind::Metadata,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Geometry => "geometry",
            RecordKind::Intersection => "intersection",
            RecordKind::Reference => "reference",
            RecordKind::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// A decoded layer record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Geometry(Geometry),
    Intersection(Intersection),
    Reference(Reference),
    Metadata(Metadata),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Geometry(_) => RecordKind::Geometry,
            Record::Intersection(_) => RecordKind::Intersection,
            Record::Reference(_) => RecordKind::Reference,
            Record::Metadata(_) => RecordKind::Metadata,
        }
    }
}

/// A correlated graph fragment.
///
/// Every intersection is an endpoint of some geometry in the tile, and every
/// reference and metadata entry points at a geometry in the tile. Geometries
/// may name endpoint intersections that live in a neighbouring tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    pub(crate) geometries: BTreeMap<String, Geometry>,
    pub(crate) intersections: BTreeMap<String, Intersection>,
    pub(crate) references: BTreeMap<String, Reference>,
    pub(crate) metadata: BTreeMap<String, Metadata>,
}

impl Tile {
    pub(crate) fn from_parts(
        geometries: BTreeMap<String, Geometry>,
        intersections: BTreeMap<String, Intersection>,
        references: BTreeMap<String, Reference>,
        metadata: BTreeMap<String, Metadata>,
    ) -> Self {
        Self {
            geometries,
            intersections,
            references,
            metadata,
        }
    }

    pub fn geometries(&self) -> &BTreeMap<String, Geometry> {
        &self.geometries
    }

    pub fn intersections(&self) -> &BTreeMap<String, Intersection> {
        &self.intersections
    }

    pub fn references(&self) -> &BTreeMap<String, Reference> {
        &self.references
    }

    /// Metadata keyed by geometry id.
    pub fn metadata(&self) -> &BTreeMap<String, Metadata> {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
            && self.intersections.is_empty()
            && self.references.is_empty()
            && self.metadata.is_empty()
    }

    /// Intersection ids named by this tile's geometries.
    pub fn referenced_intersection_ids(&self) -> BTreeSet<&str> {
        self.geometries
            .values()
            .flat_map(|g| g.intersection_ids())
            .collect()
    }

    /// Referenced intersection ids that are not present in this tile.
    ///
    /// Non-empty for single tiles whose geometries protrude past the tile
    /// edge; always empty for a successful union.
    pub fn unresolved_intersection_ids(&self) -> Vec<String> {
        self.referenced_intersection_ids()
            .into_iter()
            .filter(|id| !self.intersections.contains_key(*id))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(id: &str, points: Vec<LonLat>, from: &str, to: &str) -> Geometry {
        Geometry {
            id: id.to_string(),
            points,
            from_intersection_id: from.to_string(),
            to_intersection_id: to.to_string(),
            forward_reference_id: String::new(),
            back_reference_id: String::new(),
            road_class: RoadClass::Residential,
        }
    }

    #[test]
    fn test_geometry_bounds() {
        let g = geometry("g", vec![(1.0, 5.0), (-2.0, 3.0), (0.5, 7.0)], "a", "b");
        assert_eq!(g.bounds(), (-2.0, 3.0, 1.0, 7.0));
    }

    #[test]
    fn test_layer_names_round_trip_through_from_str() {
        for layer in Layer::ALL {
            assert_eq!(layer.as_str().parse::<Layer>().unwrap(), layer);
        }
        assert!("speeds".parse::<Layer>().is_err());
    }

    #[test]
    fn test_unknown_wire_values_are_kept() {
        assert_eq!(RoadClass::from_wire(42), RoadClass::Unrecognized(42));
        assert_eq!(RoadClass::from_wire(42).to_wire(), 42);
        assert_eq!(FormOfWay::from_wire(-1), FormOfWay::Unrecognized(-1));
        assert_eq!(FormOfWay::from_wire(-1).to_wire(), -1);

        assert_eq!(RoadClass::from_wire(8), RoadClass::Other);
        assert_eq!(FormOfWay::from_wire(7), FormOfWay::Other);
        assert_eq!(RoadClass::from_wire(5), RoadClass::Residential);
        assert_eq!(FormOfWay::from_wire(4), FormOfWay::Roundabout);
    }

    #[test]
    fn test_unresolved_intersection_ids() {
        let mut geometries = BTreeMap::new();
        geometries.insert(
            "g".to_string(),
            geometry("g", vec![(0.0, 0.0), (1.0, 1.0)], "a", "b"),
        );
        let mut intersections = BTreeMap::new();
        intersections.insert(
            "a".to_string(),
            Intersection {
                id: "a".to_string(),
                node_id: 1,
                lon: 0.0,
                lat: 0.0,
                inbound_reference_ids: vec![],
                outbound_reference_ids: vec![],
            },
        );

        let tile = Tile::from_parts(geometries, intersections, BTreeMap::new(), BTreeMap::new());
        assert_eq!(tile.unresolved_intersection_ids(), vec!["b".to_string()]);
        assert!(!tile.is_empty());
        assert!(Tile::default().is_empty());
    }
}
