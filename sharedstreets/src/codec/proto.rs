//! Protobuf schema of the SharedStreets tile layers.
//!
//! Each layer file is a sequence of varint length-delimited messages of a
//! single type. Enum fields are carried as plain `int32` and mapped onto
//! [`crate::model::RoadClass`] / [`crate::model::FormOfWay`] by the codec.

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct GeometryMessage {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub from_intersection_id: String,
    #[prost(string, tag = "3")]
    pub to_intersection_id: String,
    #[prost(string, tag = "4")]
    pub forward_reference_id: String,
    #[prost(string, tag = "5")]
    pub back_reference_id: String,
    #[prost(int32, tag = "6")]
    pub road_class: i32,
    /// Flattened `[lon, lat, lon, lat, ...]`.
    #[prost(double, repeated, tag = "7")]
    pub lonlats: Vec<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct IntersectionMessage {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(uint64, tag = "2")]
    pub node_id: u64,
    #[prost(double, tag = "3")]
    pub lat: f64,
    #[prost(double, tag = "4")]
    pub lon: f64,
    #[prost(string, repeated, tag = "5")]
    pub inbound_reference_ids: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub outbound_reference_ids: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct LocationReferenceMessage {
    #[prost(string, tag = "1")]
    pub intersection_id: String,
    #[prost(double, tag = "2")]
    pub lat: f64,
    #[prost(double, tag = "3")]
    pub lon: f64,
    #[prost(uint32, optional, tag = "4")]
    pub inbound_bearing: Option<u32>,
    #[prost(uint32, optional, tag = "5")]
    pub outbound_bearing: Option<u32>,
    #[prost(uint32, optional, tag = "6")]
    pub distance_to_next_ref: Option<u32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ReferenceMessage {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub geometry_id: String,
    #[prost(int32, tag = "3")]
    pub form_of_way: i32,
    #[prost(message, repeated, tag = "4")]
    pub location_references: Vec<LocationReferenceMessage>,
}

#[derive(Clone, PartialEq, Message)]
pub struct WaySectionMessage {
    #[prost(uint64, tag = "1")]
    pub way_id: u64,
    #[prost(int32, tag = "2")]
    pub road_class: i32,
    #[prost(bool, tag = "3")]
    pub one_way: bool,
    #[prost(bool, tag = "4")]
    pub roundabout: bool,
    #[prost(bool, tag = "5")]
    pub link: bool,
    #[prost(uint64, repeated, tag = "6")]
    pub node_ids: Vec<u64>,
    #[prost(string, tag = "7")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct OsmMetadataMessage {
    #[prost(message, repeated, tag = "1")]
    pub way_sections: Vec<WaySectionMessage>,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct GisSectionMessage {
    #[prost(string, tag = "1")]
    pub section_id: String,
    #[prost(string, tag = "2")]
    pub section_properties: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct GisMetadataMessage {
    #[prost(string, tag = "1")]
    pub source: String,
    #[prost(message, repeated, tag = "2")]
    pub sections: Vec<GisSectionMessage>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MetadataMessage {
    #[prost(string, tag = "1")]
    pub geometry_id: String,
    #[prost(message, optional, tag = "2")]
    pub osm_metadata: Option<OsmMetadataMessage>,
    #[prost(message, repeated, tag = "3")]
    pub gis_metadata: Vec<GisMetadataMessage>,
}
