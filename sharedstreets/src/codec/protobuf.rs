//! Protobuf implementation of [`TileCodec`].

use prost::Message;

use super::proto::{
    GeometryMessage, GisMetadataMessage, GisSectionMessage, IntersectionMessage,
    LocationReferenceMessage, MetadataMessage, OsmMetadataMessage, ReferenceMessage,
    WaySectionMessage,
};
use super::{DecodeError, TileCodec};
use crate::model::{
    FormOfWay, Geometry, GisMetadata, GisSection, Intersection, LocationReference, Metadata,
    OsmMetadata, Record, RecordKind, Reference, RoadClass, WaySection,
};

/// Decodes the SharedStreets `.pbf` layer messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl ProtobufCodec {
    /// Encodes a record as one length-delimited frame.
    pub fn encode_frame(&self, record: &Record) -> Vec<u8> {
        match record {
            Record::Geometry(g) => geometry_message(g).encode_length_delimited_to_vec(),
            Record::Intersection(i) => intersection_message(i).encode_length_delimited_to_vec(),
            Record::Reference(r) => reference_message(r).encode_length_delimited_to_vec(),
            Record::Metadata(m) => metadata_message(m).encode_length_delimited_to_vec(),
        }
    }
}

impl TileCodec for ProtobufCodec {
    fn decode(&self, bytes: &[u8], kind: RecordKind) -> Result<Record, DecodeError> {
        let protobuf = |source| DecodeError::Protobuf { kind, source };
        match kind {
            RecordKind::Geometry => {
                let msg = GeometryMessage::decode(bytes).map_err(protobuf)?;
                geometry_from_message(msg).map(Record::Geometry)
            }
            RecordKind::Intersection => {
                let msg = IntersectionMessage::decode(bytes).map_err(protobuf)?;
                intersection_from_message(msg).map(Record::Intersection)
            }
            RecordKind::Reference => {
                let msg = ReferenceMessage::decode(bytes).map_err(protobuf)?;
                reference_from_message(msg).map(Record::Reference)
            }
            RecordKind::Metadata => {
                let msg = MetadataMessage::decode(bytes).map_err(protobuf)?;
                metadata_from_message(msg).map(Record::Metadata)
            }
        }
    }
}

fn invalid(kind: RecordKind, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidRecord {
        kind,
        reason: reason.into(),
    }
}

fn geometry_from_message(msg: GeometryMessage) -> Result<Geometry, DecodeError> {
    let kind = RecordKind::Geometry;
    if msg.id.is_empty() {
        return Err(invalid(kind, "missing id"));
    }
    if msg.lonlats.len() % 2 != 0 {
        return Err(invalid(
            kind,
            format!("odd coordinate count {}", msg.lonlats.len()),
        ));
    }
    if msg.lonlats.len() < 4 {
        return Err(invalid(kind, "fewer than two points"));
    }

    let points = msg
        .lonlats
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    Ok(Geometry {
        id: msg.id,
        points,
        from_intersection_id: msg.from_intersection_id,
        to_intersection_id: msg.to_intersection_id,
        forward_reference_id: msg.forward_reference_id,
        back_reference_id: msg.back_reference_id,
        road_class: RoadClass::from_wire(msg.road_class),
    })
}

fn intersection_from_message(msg: IntersectionMessage) -> Result<Intersection, DecodeError> {
    if msg.id.is_empty() {
        return Err(invalid(RecordKind::Intersection, "missing id"));
    }
    Ok(Intersection {
        id: msg.id,
        node_id: msg.node_id,
        lon: msg.lon,
        lat: msg.lat,
        inbound_reference_ids: msg.inbound_reference_ids,
        outbound_reference_ids: msg.outbound_reference_ids,
    })
}

fn reference_from_message(msg: ReferenceMessage) -> Result<Reference, DecodeError> {
    let kind = RecordKind::Reference;
    if msg.id.is_empty() {
        return Err(invalid(kind, "missing id"));
    }
    if msg.geometry_id.is_empty() {
        return Err(invalid(kind, "missing geometry id"));
    }
    Ok(Reference {
        id: msg.id,
        geometry_id: msg.geometry_id,
        form_of_way: FormOfWay::from_wire(msg.form_of_way),
        location_references: msg
            .location_references
            .into_iter()
            .map(|lr| LocationReference {
                intersection_id: lr.intersection_id,
                lon: lr.lon,
                lat: lr.lat,
                inbound_bearing: lr.inbound_bearing,
                outbound_bearing: lr.outbound_bearing,
                distance_to_next_ref: lr.distance_to_next_ref,
            })
            .collect(),
    })
}

fn metadata_from_message(msg: MetadataMessage) -> Result<Metadata, DecodeError> {
    if msg.geometry_id.is_empty() {
        return Err(invalid(RecordKind::Metadata, "missing geometry id"));
    }
    Ok(Metadata {
        geometry_id: msg.geometry_id,
        osm: msg.osm_metadata.map(|osm| OsmMetadata {
            name: osm.name,
            way_sections: osm
                .way_sections
                .into_iter()
                .map(|ws| WaySection {
                    way_id: ws.way_id,
                    road_class: RoadClass::from_wire(ws.road_class),
                    one_way: ws.one_way,
                    roundabout: ws.roundabout,
                    link: ws.link,
                    node_ids: ws.node_ids,
                    name: ws.name,
                })
                .collect(),
        }),
        gis: msg
            .gis_metadata
            .into_iter()
            .map(|gis| GisMetadata {
                source: gis.source,
                sections: gis
                    .sections
                    .into_iter()
                    .map(|s| GisSection {
                        section_id: s.section_id,
                        section_properties: s.section_properties,
                    })
                    .collect(),
            })
            .collect(),
    })
}

fn geometry_message(g: &Geometry) -> GeometryMessage {
    GeometryMessage {
        id: g.id.clone(),
        from_intersection_id: g.from_intersection_id.clone(),
        to_intersection_id: g.to_intersection_id.clone(),
        forward_reference_id: g.forward_reference_id.clone(),
        back_reference_id: g.back_reference_id.clone(),
        road_class: g.road_class.to_wire(),
        lonlats: g.points.iter().flat_map(|&(lon, lat)| [lon, lat]).collect(),
    }
}

fn intersection_message(i: &Intersection) -> IntersectionMessage {
    IntersectionMessage {
        id: i.id.clone(),
        node_id: i.node_id,
        lat: i.lat,
        lon: i.lon,
        inbound_reference_ids: i.inbound_reference_ids.clone(),
        outbound_reference_ids: i.outbound_reference_ids.clone(),
    }
}

fn reference_message(r: &Reference) -> ReferenceMessage {
    ReferenceMessage {
        id: r.id.clone(),
        geometry_id: r.geometry_id.clone(),
        form_of_way: r.form_of_way.to_wire(),
        location_references: r
            .location_references
            .iter()
            .map(|lr| LocationReferenceMessage {
                intersection_id: lr.intersection_id.clone(),
                lat: lr.lat,
                lon: lr.lon,
                inbound_bearing: lr.inbound_bearing,
                outbound_bearing: lr.outbound_bearing,
                distance_to_next_ref: lr.distance_to_next_ref,
            })
            .collect(),
    }
}

fn metadata_message(m: &Metadata) -> MetadataMessage {
    MetadataMessage {
        geometry_id: m.geometry_id.clone(),
        osm_metadata: m.osm.as_ref().map(|osm| OsmMetadataMessage {
            name: osm.name.clone(),
            way_sections: osm
                .way_sections
                .iter()
                .map(|ws| WaySectionMessage {
                    way_id: ws.way_id,
                    road_class: ws.road_class.to_wire(),
                    one_way: ws.one_way,
                    roundabout: ws.roundabout,
                    link: ws.link,
                    node_ids: ws.node_ids.clone(),
                    name: ws.name.clone(),
                })
                .collect(),
        }),
        gis_metadata: m
            .gis
            .iter()
            .map(|gis| GisMetadataMessage {
                source: gis.source.clone(),
                sections: gis
                    .sections
                    .iter()
                    .map(|s| GisSectionMessage {
                        section_id: s.section_id.clone(),
                        section_properties: s.section_properties.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], kind: RecordKind) -> Result<Record, DecodeError> {
        ProtobufCodec.decode(bytes, kind)
    }

    #[test]
    fn test_decode_geometry_pairs_coordinates() {
        let bytes = GeometryMessage {
            id: "NlId".into(),
            from_intersection_id: "NNNN".into(),
            to_intersection_id: "dddd".into(),
            forward_reference_id: "NI".into(),
            back_reference_id: "IN".into(),
            road_class: 6,
            lonlats: vec![
                -0.000113, 0.000038, 0.000027, 0.000032, 0.000038, -0.000027, 0.000231,
                -0.000032,
            ],
        }
        .encode_to_vec();

        let Record::Geometry(g) = decode(&bytes, RecordKind::Geometry).unwrap() else {
            panic!("expected geometry");
        };
        assert_eq!(g.id, "NlId");
        assert_eq!(g.points.len(), 4);
        assert_eq!(g.points[0], (-0.000113, 0.000038));
        assert_eq!(g.points[3], (0.000231, -0.000032));
        assert_eq!(g.road_class, RoadClass::Unclassified);
        assert_eq!(g.intersection_ids(), ["NNNN", "dddd"]);
    }

    #[test]
    fn test_decode_geometry_rejects_odd_coordinates() {
        let bytes = GeometryMessage {
            id: "g".into(),
            lonlats: vec![1.0, 2.0, 3.0],
            ..Default::default()
        }
        .encode_to_vec();

        assert!(matches!(
            decode(&bytes, RecordKind::Geometry),
            Err(DecodeError::InvalidRecord {
                kind: RecordKind::Geometry,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_geometry_rejects_single_point() {
        let bytes = GeometryMessage {
            id: "g".into(),
            lonlats: vec![1.0, 2.0],
            ..Default::default()
        }
        .encode_to_vec();

        assert!(decode(&bytes, RecordKind::Geometry).is_err());
    }

    #[test]
    fn test_decode_intersection_keeps_reference_order() {
        let bytes = IntersectionMessage {
            id: "NNNN".into(),
            node_id: 1,
            lat: 0.000038,
            lon: -0.000113,
            inbound_reference_ids: vec!["IN".into(), "X".into()],
            outbound_reference_ids: vec!["NI".into()],
        }
        .encode_to_vec();

        let Record::Intersection(i) = decode(&bytes, RecordKind::Intersection).unwrap() else {
            panic!("expected intersection");
        };
        assert_eq!(i.node_id, 1);
        assert_eq!(i.lon, -0.000113);
        assert_eq!(i.lat, 0.000038);
        assert_eq!(i.inbound_reference_ids, vec!["IN", "X"]);
        assert_eq!(i.outbound_reference_ids, vec!["NI"]);
    }

    #[test]
    fn test_decode_reference_with_trailing_endpoint() {
        let bytes = ReferenceMessage {
            id: "NI".into(),
            geometry_id: "NlId".into(),
            form_of_way: 3,
            location_references: vec![
                LocationReferenceMessage {
                    intersection_id: "NNNN".into(),
                    lat: 0.000038,
                    lon: -0.000113,
                    inbound_bearing: Some(90),
                    outbound_bearing: Some(100),
                    distance_to_next_ref: Some(3800),
                },
                LocationReferenceMessage {
                    intersection_id: "dddd".into(),
                    lat: -0.000032,
                    lon: 0.000231,
                    inbound_bearing: Some(95),
                    outbound_bearing: None,
                    distance_to_next_ref: None,
                },
            ],
        }
        .encode_to_vec();

        let Record::Reference(r) = decode(&bytes, RecordKind::Reference).unwrap() else {
            panic!("expected reference");
        };
        assert_eq!(r.form_of_way, FormOfWay::SingleCarriageway);
        assert_eq!(r.location_references.len(), 2);
        assert_eq!(r.location_references[0].distance_to_next_ref, Some(3800));
        assert_eq!(r.location_references[1].distance_to_next_ref, None);
        assert_eq!(r.location_references[1].outbound_bearing, None);
    }

    #[test]
    fn test_decode_metadata_without_osm() {
        let bytes = MetadataMessage {
            geometry_id: "NlId".into(),
            osm_metadata: None,
            gis_metadata: vec![GisMetadataMessage {
                source: "city".into(),
                sections: vec![],
            }],
        }
        .encode_to_vec();

        let Record::Metadata(m) = decode(&bytes, RecordKind::Metadata).unwrap() else {
            panic!("expected metadata");
        };
        assert!(m.osm.is_none());
        assert_eq!(m.gis[0].source, "city");
    }

    #[test]
    fn test_decode_wrong_wire_type_is_protobuf_error() {
        let bytes = GeometryMessage {
            id: "NlId".into(),
            from_intersection_id: "NNNN".into(),
            lonlats: vec![0.0, 0.0, 1.0, 1.0],
            ..Default::default()
        }
        .encode_to_vec();

        assert!(matches!(
            decode(&bytes, RecordKind::Intersection),
            Err(DecodeError::Protobuf {
                kind: RecordKind::Intersection,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_frame_decodes_back() {
        let metadata = Metadata {
            geometry_id: "NlId".into(),
            osm: Some(OsmMetadata {
                name: "Main St".into(),
                way_sections: vec![WaySection {
                    way_id: 42,
                    road_class: RoadClass::Residential,
                    one_way: true,
                    node_ids: vec![1, 2, 3],
                    ..Default::default()
                }],
            }),
            gis: vec![],
        };

        let frame = ProtobufCodec.encode_frame(&Record::Metadata(metadata.clone()));
        let mut frames = super::super::FramedRecords::new(&frame);
        let payload = frames.next().unwrap().unwrap();

        assert_eq!(
            decode(payload, RecordKind::Metadata).unwrap(),
            Record::Metadata(metadata)
        );
        assert!(frames.next().is_none());
    }
}
