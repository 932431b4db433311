//! Movement, distance and configuration round trips through the public API

use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use geocoord::{
    ConfigurationManager, CoordinateConfig, CoordinateError, EarthShape, Ellipsoid, FormatRules,
    FormatStyle, LoadPolicy, Position, PositionBuilder, Property,
};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn origin() -> Position {
    let instant = Utc.with_ymd_and_hms(2024, 9, 22, 12, 0, 0).unwrap();
    Position::with_date(0.0, 0.0, instant).unwrap()
}

#[test]
fn test_sphere_move_north_one_degree() {
    let mut position = origin();
    position.move_by(111_195.0, 0.0, EarthShape::Sphere).unwrap();
    assert_abs_diff_eq!(position.latitude().decimal_degree(), 1.0, epsilon = 1e-3);
    assert_abs_diff_eq!(position.longitude().decimal_degree(), 0.0, epsilon = 1e-3);
}

#[test]
fn test_ellipsoid_move_east_keeps_sign() {
    let mut position = origin();
    position.move_by(50_000.0, 90.0, EarthShape::Ellipsoid).unwrap();
    assert!(position.longitude().decimal_degree() > 0.0);

    let mut position = origin();
    position.move_by(50_000.0, 270.0, EarthShape::Ellipsoid).unwrap();
    assert!(position.longitude().decimal_degree() < 0.0);
}

#[test]
fn test_move_refreshes_loaded_representations() {
    let mut position = origin();
    let before = position.grid().as_loaded().copied().unwrap();
    let batches = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&batches);
    position.subscribe(move |changes| sink.lock().unwrap().push(*changes));

    position.move_by(10_000.0, 45.0, EarthShape::Sphere).unwrap();

    let after = position.grid().as_loaded().copied().unwrap();
    assert!(after.easting > before.easting);
    assert!(after.northing > before.northing);

    let batches = batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert!(batches[0].contains(Property::Grid));
    assert!(batches[0].contains(Property::Celestial));
}

#[test]
fn test_distance_is_symmetric_on_sphere() {
    let seattle = Position::new(47.6062, -122.3321).unwrap();
    let sydney = Position::new(-33.8688, 151.2093).unwrap();

    let there = seattle.distance_to(&sydney, EarthShape::Sphere);
    let back = sydney.distance_to(&seattle, EarthShape::Sphere);
    assert_abs_diff_eq!(there.meters, back.meters, epsilon = 1e-3);
    assert_abs_diff_eq!(there.kilometers(), 12_470.265, epsilon = 1e-2);
}

#[test]
fn test_config_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("geocoord.json");

    let config = CoordinateConfig::default()
        .with_format_rules(
            FormatRules::new(FormatStyle::DegreeDecimalMinute)
                .with_rounding(4)
                .with_leading_zeros(true),
        )
        .with_load_policy(LoadPolicy::lazy().with_earth_centered(true))
        .with_ellipsoid(Ellipsoid::new(6_378_388.0, 297.0));

    let mut manager = ConfigurationManager::new();
    manager.update_config(config).unwrap();
    manager.save_to_file(&path).unwrap();

    let reloaded = ConfigurationManager::from_file(&path).unwrap();
    assert_eq!(*reloaded.config(), config);

    let position = PositionBuilder::from_decimal(47.6062, -122.3321)
        .unwrap()
        .config(reloaded.config())
        .build()
        .unwrap();
    assert!(position.earth_centered().is_loaded());
    assert!(position.grid().is_unloaded());
    assert_eq!(position.to_string(), "N 47º 36.372' W 122º 19.926'");
}

#[test]
fn test_config_rejects_invalid_ellipsoid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{"ellipsoid": {"equatorial_radius": -6378137.0, "inverse_flattening": 298.257223563}}"#,
    )
    .unwrap();

    let mut manager = ConfigurationManager::new();
    let err = manager.load_from_file(&path).unwrap_err();
    assert!(matches!(err, CoordinateError::Config { .. }));
    assert_eq!(*manager.config(), CoordinateConfig::default());
}
