//! Error taxonomy and shared range checks

pub mod bounds;
pub mod error;

pub use bounds::{check_component, check_ellipsoid, check_finite, check_magnitude, check_rounding};
pub use error::{CoordinateError, CoordinateResult};
