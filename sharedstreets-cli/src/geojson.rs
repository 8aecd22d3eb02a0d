//! GeoJSON rendering of graph fragments and raw records.
//!
//! Property names follow the upstream SharedStreets schema (`nodeId`,
//! `fromIntersectionId`, ...), so output can be compared with other
//! SharedStreets tooling.

use serde_json::{json, Value};

use sharedstreets::model::{
    Geometry, Intersection, LocationReference, Metadata, Record, Reference,
};
use sharedstreets::Tile;

/// A FeatureCollection with intersections as Points, then geometries as
/// LineStrings.
pub fn tile_to_geojson(tile: &Tile) -> Value {
    let features: Vec<Value> = tile
        .intersections()
        .values()
        .map(intersection_feature)
        .chain(tile.geometries().values().map(geometry_feature))
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn intersection_feature(item: &Intersection) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "id": item.id,
            "nodeId": item.node_id,
            "inboundReferenceIds": item.inbound_reference_ids,
            "outboundReferenceIds": item.outbound_reference_ids,
        },
        "geometry": {
            "type": "Point",
            "coordinates": [item.lon, item.lat],
        },
    })
}

pub fn geometry_feature(item: &Geometry) -> Value {
    let coordinates: Vec<[f64; 2]> = item.points.iter().map(|&(lon, lat)| [lon, lat]).collect();
    json!({
        "type": "Feature",
        "properties": {
            "id": item.id,
            "roadClass": item.road_class.to_wire(),
            "fromIntersectionId": item.from_intersection_id,
            "toIntersectionId": item.to_intersection_id,
            "forwardReferenceId": item.forward_reference_id,
            "backReferenceId": item.back_reference_id,
        },
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
    })
}

/// Any record as JSON; spatial records become features.
pub fn record_to_json(record: &Record) -> Value {
    match record {
        Record::Geometry(g) => geometry_feature(g),
        Record::Intersection(i) => intersection_feature(i),
        Record::Reference(r) => reference_json(r),
        Record::Metadata(m) => metadata_json(m),
    }
}

fn reference_json(item: &Reference) -> Value {
    let location_references: Vec<Value> = item
        .location_references
        .iter()
        .map(location_reference_json)
        .collect();
    json!({
        "id": item.id,
        "geometryId": item.geometry_id,
        "formOfWay": item.form_of_way.to_wire(),
        "locationReferences": location_references,
    })
}

fn location_reference_json(item: &LocationReference) -> Value {
    json!({
        "intersectionId": item.intersection_id,
        "lon": item.lon,
        "lat": item.lat,
        "inboundBearing": item.inbound_bearing,
        "outboundBearing": item.outbound_bearing,
        "distanceToNextRef": item.distance_to_next_ref,
    })
}

fn metadata_json(item: &Metadata) -> Value {
    let osm = item.osm.as_ref().map(|osm| {
        let way_sections: Vec<Value> = osm
            .way_sections
            .iter()
            .map(|section| {
                json!({
                    "wayId": section.way_id,
                    "roadClass": section.road_class.to_wire(),
                    "oneWay": section.one_way,
                    "roundabout": section.roundabout,
                    "link": section.link,
                    "nodeIds": section.node_ids,
                    "name": section.name,
                })
            })
            .collect();
        json!({ "name": osm.name, "waySections": way_sections })
    });
    let gis: Vec<Value> = item
        .gis
        .iter()
        .map(|entry| {
            let sections: Vec<Value> = entry
                .sections
                .iter()
                .map(|s| json!({ "sectionId": s.section_id, "sectionProperties": s.section_properties }))
                .collect();
            json!({ "source": entry.source, "sections": sections })
        })
        .collect();

    json!({
        "geometryId": item.geometry_id,
        "osmMetadata": osm,
        "gisMetadata": gis,
    })
}
