//! End-to-end checks of the coordinate model through the public API

use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use geocoord::{
    parse, AngleField, AngleValue, Axis, CelestialCalculator, CelestialResult, CoordinateError,
    FormatRules, FormatStyle, Hemisphere, LoadPolicy, Position, PositionBuilder, Property,
    Services,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct CountingCelestial {
    calls: Arc<AtomicUsize>,
}

impl CelestialCalculator for CountingCelestial {
    fn compute(
        &self,
        latitude: f64,
        longitude: f64,
        instant: chrono::DateTime<Utc>,
    ) -> CelestialResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        geocoord::algorithms::SolarCalculator.compute(latitude, longitude, instant)
    }
}

fn check_invariants(angle: &AngleValue) {
    assert_eq!(angle.hemisphere().axis(), angle.axis());
    assert!(angle.decimal_degree().abs() <= angle.axis().bound());
    if angle.decimal_degree() != 0.0 {
        assert_eq!(angle.decimal_degree() < 0.0, angle.hemisphere().is_negative());
    }
    let composed = angle.degrees() as f64 + angle.minutes() as f64 / 60.0 + angle.seconds() / 3600.0;
    assert_abs_diff_eq!(angle.decimal_degree().abs(), composed, epsilon = 1e-9);
    assert_abs_diff_eq!(
        angle.decimal_minute(),
        angle.minutes() as f64 + angle.seconds() / 60.0,
        epsilon = 1e-9
    );
    assert!(angle.minutes() < 60);
    assert!((0.0..60.0).contains(&angle.seconds()));
}

#[test]
fn test_dms_round_trip_examples() {
    let angle = AngleValue::from_dms(47, 36, 22.32, Hemisphere::North).unwrap();
    assert_eq!(
        (angle.degrees(), angle.minutes(), angle.seconds(), angle.hemisphere()),
        (47, 36, 22.32, Hemisphere::North)
    );
    let decimal = AngleValue::from_decimal(47.0 + 36.0 / 60.0 + 22.32 / 3600.0, Axis::Latitude)
        .unwrap();
    assert_abs_diff_eq!(angle.decimal_degree(), decimal.decimal_degree(), epsilon = 1e-9);
}

#[test]
fn test_idempotent_writes_are_silent() {
    let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut position = Position::with_date(10.5, 20.25, instant).unwrap();
    let batches = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&batches);
    position.subscribe(move |_| *counter.lock().unwrap() += 1);

    let seconds = position.latitude().seconds();
    let changes = position
        .edit_latitude(|latitude| latitude.set_seconds(seconds))
        .unwrap();
    assert!(changes.is_empty());

    let mut angle = *position.longitude();
    assert!(angle.set_decimal_degree(20.25).unwrap().is_empty());
    assert!(angle.set_hemisphere(Hemisphere::East).unwrap().is_empty());
    assert_eq!(*batches.lock().unwrap(), 0);
}

#[test]
fn test_bound_rejection() {
    for (value, axis) in [
        (91.0, Axis::Latitude),
        (-91.0, Axis::Latitude),
        (181.0, Axis::Longitude),
    ] {
        assert!(matches!(
            AngleValue::from_decimal(value, axis),
            Err(CoordinateError::Range { .. })
        ));
    }
    assert!(matches!(
        AngleValue::from_dms(90, 0, 0.1, Hemisphere::North),
        Err(CoordinateError::Range { .. })
    ));
}

#[test]
fn test_degree_decimal_minute_carry() {
    let angle = AngleValue::from_dms(42, 59, 59.99, Hemisphere::North).unwrap();
    let rules = FormatRules::new(FormatStyle::DegreeDecimalMinute).with_rounding(0);
    assert_eq!(geocoord::render_angle(&angle, &rules), "N 43º 0.0'");

    let rules = rules.with_degree_glyph('°');
    let text = geocoord::render_angle(&angle, &rules);
    assert_eq!(text, "N 43° 0.0'");
    let reparsed = geocoord::parse_axis(&text, Axis::Latitude).unwrap();
    assert_eq!(reparsed.decimal_degree(), 43.0);
}

#[test]
fn test_axis_mismatch_keeps_latitude() {
    let mut position = Position::new(47.6062, -122.3321).unwrap();
    let before = *position.latitude();
    let east = AngleValue::from_dms(12, 30, 0.0, Hemisphere::East).unwrap();

    let err = position.set_latitude(east).unwrap_err();
    assert!(matches!(err, CoordinateError::TypeMismatch { .. }));
    assert_eq!(*position.latitude(), before);
}

#[test]
fn test_celestial_gating() {
    let calls = Arc::new(AtomicUsize::new(0));
    let services = Services::default().with_celestial(Arc::new(CountingCelestial {
        calls: Arc::clone(&calls),
    }));
    let mut position = PositionBuilder::from_decimal(47.6062, -122.3321)
        .unwrap()
        .policy(LoadPolicy::eager().with_celestial(false))
        .services(services)
        .build()
        .unwrap();

    let changes = position
        .edit_latitude(|latitude| latitude.set_degrees(48))
        .unwrap();
    assert!(!changes.contains(Property::Celestial));
    assert!(changes.contains(Property::Grid));
    assert!(position.celestial().is_unloaded());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    position.set_policy(position.policy().with_celestial(true));
    position.load_celestial();
    assert!(position.celestial().is_loaded());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_parse_format_duality() {
    for text in [
        "N 47º 36' 22.32\" W 122º 19' 55.56\"",
        "S 33º 52' 7.68\" E 151º 12' 33.48\"",
        "N 0º 0' 0\" E 0º 0' 0\"",
    ] {
        let position: Position = text.parse().unwrap();
        assert_eq!(position.to_string(), text);
    }

    let (latitude, longitude) = parse("47.6062, -122.3321").unwrap();
    assert_eq!(latitude.decimal_degree(), 47.6062);
    assert_eq!(longitude.decimal_degree(), -122.3321);
    assert_eq!(latitude.hemisphere(), Hemisphere::North);
    assert_eq!(longitude.hemisphere(), Hemisphere::West);
}

#[test]
fn test_parse_layouts_agree() {
    let expected = (47.6062, -122.3321);
    for text in [
        "47.6062 N 122.3321 W",
        "N47.6062 W122.3321",
        "47º 36.372' N, 122º 19.926' W",
        "+47 36 22.32 -122 19 55.56",
        "47°36′22.32″N 122°19′55.56″W",
    ] {
        let (latitude, longitude) = parse(text).unwrap();
        assert_abs_diff_eq!(latitude.decimal_degree(), expected.0, epsilon = 1e-9);
        assert_abs_diff_eq!(longitude.decimal_degree(), expected.1, epsilon = 1e-9);
    }
}

#[test]
fn test_parse_failures() {
    assert!(geocoord::try_parse("").is_none());
    assert!(geocoord::try_parse("somewhere north").is_none());
    assert!(geocoord::try_parse("N 47 61 0 W 122 0 0").is_none());
    assert!(geocoord::try_parse("-47.5 N, 122 W").is_none());
    assert!(geocoord::try_parse_axis("47.5 E", Axis::Latitude).is_none());
}

#[test]
fn test_datum_precondition() {
    let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut position = Position::lazy(47.6062, -122.3321, instant).unwrap();
    let err = position.set_datum(6_378_388.0, 297.0).unwrap_err();
    assert!(matches!(err, CoordinateError::PrecursorNotLoaded { .. }));

    position.load_grid();
    assert!(position.set_datum(6_378_388.0, 297.0).is_ok());
}

#[test]
fn test_seconds_edit_reports_coupled_fields() {
    let mut angle = AngleValue::from_dms(10, 20, 30.0, Hemisphere::South).unwrap();
    let changes = angle.set_seconds(45.0).unwrap();
    let fields: Vec<_> = changes.iter().collect();
    assert_eq!(
        fields,
        vec![AngleField::DecimalDegree, AngleField::DecimalMinute, AngleField::Seconds]
    );
}

#[test]
fn test_failed_setter_is_atomic() {
    let mut angle = AngleValue::from_dms(89, 30, 0.0, Hemisphere::North).unwrap();
    let before = angle;
    assert!(angle.set_degrees(90).is_err());
    assert!(angle.set_minutes(75).is_err());
    assert!(angle.set_decimal_degree(-90.5).is_err());
    assert_eq!(angle, before);
}

fn setter_strategy() -> impl Strategy<Value = Vec<(u8, f64)>> {
    prop::collection::vec((0u8..6, -200.0f64..200.0), 1..12)
}

proptest! {
    #[test]
    fn prop_setter_sequences_hold_invariants(
        start in -90.0f64..=90.0,
        steps in setter_strategy(),
    ) {
        let mut angle = AngleValue::from_decimal(start, Axis::Latitude).unwrap();
        for (setter, value) in steps {
            let _ = match setter {
                0 => angle.set_decimal_degree(value),
                1 => angle.set_degrees(value.abs() as u32),
                2 => angle.set_minutes(value as i32),
                3 => angle.set_seconds(value),
                4 => angle.set_decimal_minute(value),
                _ => angle.set_hemisphere(if value < 0.0 {
                    Hemisphere::South
                } else {
                    Hemisphere::North
                }),
            };
            check_invariants(&angle);
        }
    }
}
