//! Geographic Coordinate Model
//!
//! Dual-encoded latitude/longitude values (decimal degrees alongside degrees,
//! minutes, seconds and hemisphere) with a position type that keeps grid,
//! earth-centered, cartesian and celestial representations in step with every
//! change, plus a text codec for human-readable coordinates.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;
pub mod position;

// Re-export commonly used types
pub use core::{
    AngleChanges, AngleField, AngleValue, Axis, Changes, EarthShape, Ellipsoid, Hemisphere,
    Property, PropertySet,
};
pub use algorithms::{
    Cartesian, CelestialCalculator, CelestialResult, DayCondition, EarthCentered,
    EarthCenteredConverter, GeodesicSolver, GridProjection, GridResult, MgrsEncoder, MoonPhase,
    Services, ZodiacSign,
};
pub use api::{render_angle, render_pair, FormatRules, FormatStyle, SubscriptionHandle};
pub use position::{Derived, Distance, LoadPolicy, Position, PositionBuilder};
pub use processing::{parse, parse_axis, try_parse, try_parse_axis};
pub use utils::{ConfigurationManager, CoordinateConfig};
pub use validation::{CoordinateError, CoordinateResult};
