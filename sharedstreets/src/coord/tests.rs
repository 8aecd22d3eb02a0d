//! Tests for coordinate conversion

use super::*;

#[test]
fn test_new_york_city_at_zoom_16() {
    // New York City: 40.7128°N, 74.0060°W
    let tile = to_tile_coords(40.7128, -74.0060, 16).unwrap();
    assert_eq!(tile.row, 24640);
    assert_eq!(tile.col, 19295);
    assert_eq!(tile.zoom, 16);
}

#[test]
fn test_london_at_zoom_10() {
    let tile = to_tile_coords(51.5074, -0.1278, 10).unwrap();
    assert_eq!(tile.row, 340);
    assert_eq!(tile.col, 511);
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1: 2×2 tiles, 0,0 falls into the south-east tile
    let tile = to_tile_coords(0.0, 0.0, 1).unwrap();
    assert_eq!(tile.row, 1);
    assert_eq!(tile.col, 1);
}

#[test]
fn test_east_edge_is_clamped_into_last_column() {
    let tile = to_tile_coords(0.0, 180.0, 12).unwrap();
    assert_eq!(tile.col, 4095);

    let tile = to_tile_coords(MIN_LAT, 0.0, 12).unwrap();
    assert_eq!(tile.row, 4095);
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        to_tile_coords(90.0, 0.0, 10),
        Err(CoordError::InvalidLatitude(_))
    ));
    assert!(matches!(
        to_tile_coords(0.0, -181.0, 10),
        Err(CoordError::InvalidLongitude(_))
    ));
    assert!(matches!(
        to_tile_coords(0.0, 0.0, 23),
        Err(CoordError::InvalidZoom(23))
    ));
}

#[test]
fn test_tile_to_lat_lon_northwest_corner() {
    let (lat, lon) = tile_to_lat_lon(&TileCoord::from_zxy(12, 2048, 2048));
    assert!(lat.abs() < 1e-9);
    assert!(lon.abs() < 1e-9);
}

#[test]
fn test_container_at_reference_zoom_from_deeper_zoom() {
    let tile = TileCoord::from_zxy(16, 10509, 25324);
    let container = tile.container_at(12);
    assert_eq!(container, TileCoord::from_zxy(12, 656, 1582));
}

#[test]
fn test_container_at_same_zoom_is_identity() {
    let tile = TileCoord::from_zxy(12, 656, 1582);
    assert_eq!(tile.container_at(12), tile);
}

#[test]
fn test_container_from_shallower_zoom_takes_northwest_descendant() {
    let tile = TileCoord::from_zxy(10, 164, 395);
    assert_eq!(tile.container_at(12), TileCoord::from_zxy(12, 656, 1580));
}

#[test]
fn test_corners_bracket_the_tile() {
    let (sw, ne) = TileCoord::from_zxy(12, 656, 1582).corners();

    assert!((sw.lon - (-122.34375)).abs() < 1e-9);
    assert!((ne.lon - (-122.255859375)).abs() < 1e-9);
    assert!((ne.lat - 37.857507156).abs() < 1e-6);
    assert!((sw.lat - 37.788081384).abs() < 1e-6);
    assert!(sw.lat < ne.lat);
}

#[test]
fn test_covering_tiles_around_origin() {
    let bbox = BoundingBox::new(-0.0005, -0.0005, 0.0005, 0.0005).unwrap();
    let tiles = covering_tiles(&bbox, 12).unwrap();

    assert_eq!(
        tiles,
        vec![
            TileCoord::from_zxy(12, 2047, 2047),
            TileCoord::from_zxy(12, 2048, 2047),
            TileCoord::from_zxy(12, 2047, 2048),
            TileCoord::from_zxy(12, 2048, 2048),
        ]
    );
}

#[test]
fn test_covering_tiles_single_tile() {
    let bbox = BoundingBox::new(-122.30, 37.80, -122.29, 37.81).unwrap();
    let tiles = covering_tiles(&bbox, 12).unwrap();
    assert_eq!(tiles, vec![TileCoord::from_zxy(12, 656, 1582)]);
}

#[test]
fn test_bounding_box_validation() {
    assert!(matches!(
        BoundingBox::new(1.0, 0.0, 0.0, 1.0),
        Err(CoordError::InvertedBoundingBox { .. })
    ));
    assert!(matches!(
        BoundingBox::new(0.0, 0.0, 1.0, 89.0),
        Err(CoordError::InvalidLatitude(_))
    ));
    assert!(matches!(
        BoundingBox::new(-200.0, 0.0, 1.0, 1.0),
        Err(CoordError::InvalidLongitude(_))
    ));
}

#[test]
fn test_error_display() {
    let err = CoordError::InvalidZoom(30);
    assert_eq!(err.to_string(), "Invalid zoom level: 30 (must be between 0 and 22)");
}

#[test]
fn test_tile_validation() {
    assert!(TileCoord::from_zxy(12, 4095, 4095).validate().is_ok());
    assert!(matches!(
        TileCoord::from_zxy(12, 4096, 0).validate(),
        Err(CoordError::TileOutOfRange { x: 4096, .. })
    ));
    assert!(matches!(
        TileCoord::from_zxy(23, 0, 0).validate(),
        Err(CoordError::InvalidZoom(23))
    ));
}

#[test]
fn test_container_far_out_of_range_zoom_does_not_overflow() {
    let tile = TileCoord::from_zxy(200, 5, 5);
    assert_eq!(tile.container_at(12), TileCoord::from_zxy(12, 0, 0));
}

#[test]
fn test_covering_count_of_whole_world_at_deep_zoom() {
    let world = BoundingBox::new(MIN_LON, MIN_LAT, MAX_LON, MAX_LAT).unwrap();
    assert_eq!(covering_tile_count(&world, 12).unwrap(), 1 << 24);
    assert_eq!(covering_tile_count(&world, 16).unwrap(), 1 << 32);
    assert_eq!(covering_tile_count(&world, MAX_ZOOM).unwrap(), 1 << 44);
}

#[test]
fn test_covering_count_matches_tiles() {
    let bbox = BoundingBox::new(-122.30, 37.80, -122.29, 37.81).unwrap();
    for zoom in [12, 16, 18] {
        let tiles = covering_tiles(&bbox, zoom).unwrap();
        assert_eq!(covering_tile_count(&bbox, zoom).unwrap(), tiles.len() as u64);
    }
}

#[test]
fn test_corners_of_last_tile_in_grid() {
    let (sw, ne) = TileCoord::from_zxy(12, 4095, 4095).corners();
    assert!((ne.lon - MAX_LON).abs() < 1e-9);
    assert!(sw.lat < ne.lat);
}

#[test]
fn test_corners_off_the_grid_do_not_overflow() {
    let (sw, ne) = TileCoord::from_zxy(12, u32::MAX, u32::MAX).corners();
    assert!(sw.lat <= ne.lat);
    assert!(sw.lon <= ne.lon);
}
