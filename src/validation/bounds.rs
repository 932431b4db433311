//! Range checks shared by constructors, setters and the parser

use crate::core::constants::{MAX_ROUNDING, SEXAGESIMAL_LIMIT};
use crate::core::{Axis, Ellipsoid};
use crate::validation::{CoordinateError, CoordinateResult};

/// Validates a minute or second component: finite, non-negative, below 60
pub fn check_component(field: &str, value: f64) -> CoordinateResult<()> {
    if !value.is_finite() {
        return Err(CoordinateError::range(field, value, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(CoordinateError::range(field, value, "must not be negative"));
    }
    if value >= SEXAGESIMAL_LIMIT {
        return Err(CoordinateError::range(field, value, "must be less than 60"));
    }
    Ok(())
}

/// Validates an unsigned magnitude against the axis bound
pub fn check_magnitude(axis: Axis, magnitude: f64) -> CoordinateResult<()> {
    if !magnitude.is_finite() {
        return Err(CoordinateError::range(
            &axis.to_string(),
            magnitude,
            "must be a finite number",
        ));
    }
    if magnitude.abs() > axis.bound() {
        return Err(CoordinateError::range(
            &axis.to_string(),
            magnitude,
            format!("magnitude must not exceed {}°", axis.bound()),
        ));
    }
    Ok(())
}

/// Validates ellipsoid parameters: positive radius, inverse flattening 0 or above 1
pub fn check_ellipsoid(ellipsoid: &Ellipsoid) -> CoordinateResult<()> {
    if !ellipsoid.equatorial_radius.is_finite() || ellipsoid.equatorial_radius <= 0.0 {
        return Err(CoordinateError::range(
            "equatorial radius",
            ellipsoid.equatorial_radius,
            "must be a positive number of meters",
        ));
    }
    if !ellipsoid.is_valid() {
        return Err(CoordinateError::range(
            "inverse flattening",
            ellipsoid.inverse_flattening,
            "must be 0 for a sphere or greater than 1",
        ));
    }
    Ok(())
}

/// Validates a rendering precision
pub fn check_rounding(rounding: Option<u8>) -> CoordinateResult<()> {
    match rounding {
        Some(digits) if digits > MAX_ROUNDING => Err(CoordinateError::range(
            "rounding",
            digits as f64,
            format!("must not exceed {} digits", MAX_ROUNDING),
        )),
        _ => Ok(()),
    }
}

/// Validates a plain finite input such as a height or distance
pub fn check_finite(field: &str, value: f64) -> CoordinateResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoordinateError::range(field, value, "must be a finite number"))
    }
}
