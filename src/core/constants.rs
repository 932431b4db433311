//! Geodetic constants and format defaults

/// Largest legal latitude magnitude (degrees)
pub const MAX_LATITUDE: f64 = 90.0;

/// Largest legal longitude magnitude (degrees)
pub const MAX_LONGITUDE: f64 = 180.0;

/// Minutes and seconds must stay strictly below this value
pub const SEXAGESIMAL_LIMIT: f64 = 60.0;

/// Largest seconds value a derived field may hold
pub const MAX_SECONDS: f64 = 59.999_999_999_999;

/// WGS84 equatorial radius (meters)
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257223563;

/// Mean earth radius used by the spherical formulas (meters)
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;

/// Default rounding for decimal and decimal-degree rendering
pub const DEFAULT_DECIMAL_ROUNDING: u8 = 9;

/// Default rounding for minute and second rendering
pub const DEFAULT_SEXAGESIMAL_ROUNDING: u8 = 3;

/// Highest rounding precision accepted by format rules
pub const MAX_ROUNDING: u8 = 15;

/// Tolerance used when comparing re-derived angle fields
pub const ANGLE_EPSILON: f64 = 1e-9;
