//! Dual-encoded angle value for one coordinate axis
//!
//! An [`AngleValue`] keeps the decimal-degree form and the sexagesimal form
//! (degrees, minutes, seconds, decimal minute, hemisphere) of a latitude or
//! longitude in lock-step. Every write goes through a setter that validates
//! first, then re-derives the remaining fields from the one just written, and
//! finally reports which fields moved.
//!
//! Invariants held after every successful call:
//! 1. latitude values carry N/S, longitude values carry E/W
//! 2. `|decimal_degree|` never exceeds the axis bound (90 or 180)
//! 3. `decimal_degree` is negative only for S or W
//! 4. `decimal_degree = sign × (degrees + minutes/60 + seconds/3600)` and
//!    `decimal_minute = minutes + seconds/60`
//! 5. `0 ≤ minutes < 60` and `0 ≤ seconds < 60`

use crate::core::changes::{AngleChanges, AngleField};
use crate::core::constants::{ANGLE_EPSILON, MAX_SECONDS};
use crate::core::types::{Axis, Hemisphere};
use crate::validation::{check_component, check_magnitude, CoordinateError, CoordinateResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// One coordinate axis in both decimal and sexagesimal form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "AngleRepr", try_from = "AngleRepr")]
pub struct AngleValue {
    decimal_degree: f64,
    degrees: u32,
    minutes: u32,
    seconds: f64,
    decimal_minute: f64,
    hemisphere: Hemisphere,
    axis: Axis,
}

impl AngleValue {
    /// Zero angle on the given axis (N or E)
    pub fn zero(axis: Axis) -> Self {
        Self {
            decimal_degree: 0.0,
            degrees: 0,
            minutes: 0,
            seconds: 0.0,
            decimal_minute: 0.0,
            hemisphere: axis.positive(),
            axis,
        }
    }

    /// Builds a value from signed decimal degrees
    ///
    /// Non-negative values get N or E, negative values S or W.
    pub fn from_decimal(value: f64, axis: Axis) -> CoordinateResult<Self> {
        check_magnitude(axis, value)?;
        let mut angle = Self::zero(axis);
        angle.decimal_degree = value;
        angle.hemisphere = hemisphere_for(axis, value);
        angle.derive_from_decimal();
        Ok(angle)
    }

    /// Builds a value from degrees, minutes and seconds
    ///
    /// The hemisphere selects both the axis and the sign. The components are
    /// stored as given, so reading them back reproduces the inputs exactly.
    pub fn from_dms(
        degrees: u32,
        minutes: u32,
        seconds: f64,
        hemisphere: Hemisphere,
    ) -> CoordinateResult<Self> {
        let axis = hemisphere.axis();
        check_component("minutes", minutes as f64)?;
        check_component("seconds", seconds)?;
        check_magnitude(axis, sexagesimal_total(degrees, minutes, seconds))?;

        let mut angle = Self::zero(axis);
        angle.degrees = degrees;
        angle.minutes = minutes;
        angle.seconds = seconds;
        angle.hemisphere = hemisphere;
        angle.derive_from_dms();
        Ok(angle)
    }

    /// Builds a value from whole degrees and a decimal minute
    pub fn from_degree_decimal_minute(
        degrees: u32,
        decimal_minute: f64,
        hemisphere: Hemisphere,
    ) -> CoordinateResult<Self> {
        let axis = hemisphere.axis();
        check_component("decimal minute", decimal_minute)?;
        check_magnitude(axis, degrees as f64 + decimal_minute / 60.0)?;

        let mut angle = Self::zero(axis);
        angle.degrees = degrees;
        angle.hemisphere = hemisphere;
        angle.decimal_minute = decimal_minute;
        angle.derive_from_decimal_minute();
        Ok(angle)
    }

    pub fn decimal_degree(&self) -> f64 {
        self.decimal_degree
    }

    pub fn degrees(&self) -> u32 {
        self.degrees
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn decimal_minute(&self) -> f64 {
        self.decimal_minute
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Unsigned magnitude rebuilt from the sexagesimal fields
    pub fn magnitude(&self) -> f64 {
        sexagesimal_total(self.degrees, self.minutes, self.seconds)
    }

    pub fn to_radians(&self) -> f64 {
        self.decimal_degree * std::f64::consts::PI / 180.0
    }

    /// Writes the signed decimal degree and re-derives every other field
    pub fn set_decimal_degree(&mut self, value: f64) -> CoordinateResult<AngleChanges> {
        if value.to_bits() == self.decimal_degree.to_bits() {
            return Ok(AngleChanges::empty());
        }
        check_magnitude(self.axis, value)?;

        let previous = self.hemisphere;
        self.decimal_degree = value;
        self.hemisphere = hemisphere_for(self.axis, value);
        self.derive_from_decimal();
        trace!(axis = %self.axis, value, "decimal degree written");

        let mut changes = AngleChanges::empty()
            .with(AngleField::DecimalDegree)
            .with(AngleField::DecimalMinute)
            .with(AngleField::Degrees)
            .with(AngleField::Minutes)
            .with(AngleField::Seconds);
        if previous != self.hemisphere {
            changes.insert(AngleField::Hemisphere);
        }
        Ok(changes)
    }

    /// Writes whole degrees, keeping minutes, seconds and hemisphere
    pub fn set_degrees(&mut self, value: u32) -> CoordinateResult<AngleChanges> {
        if value == self.degrees {
            return Ok(AngleChanges::empty());
        }
        check_magnitude(self.axis, sexagesimal_total(value, self.minutes, self.seconds))?;

        self.degrees = value;
        self.derive_from_dms();
        trace!(axis = %self.axis, value, "degrees written");

        Ok(AngleChanges::empty()
            .with(AngleField::DecimalDegree)
            .with(AngleField::Degrees))
    }

    /// Writes whole minutes
    ///
    /// A negative input is taken as its absolute value.
    pub fn set_minutes(&mut self, value: i32) -> CoordinateResult<AngleChanges> {
        let value = value.unsigned_abs();
        if value == self.minutes {
            return Ok(AngleChanges::empty());
        }
        check_component("minutes", value as f64)?;
        check_magnitude(self.axis, sexagesimal_total(self.degrees, value, self.seconds))?;

        self.minutes = value;
        self.derive_from_dms();
        trace!(axis = %self.axis, value, "minutes written");

        Ok(AngleChanges::empty()
            .with(AngleField::DecimalDegree)
            .with(AngleField::DecimalMinute)
            .with(AngleField::Minutes))
    }

    /// Writes seconds
    ///
    /// A negative input is taken as its absolute value.
    pub fn set_seconds(&mut self, value: f64) -> CoordinateResult<AngleChanges> {
        let value = value.abs();
        if value.to_bits() == self.seconds.to_bits() {
            return Ok(AngleChanges::empty());
        }
        check_component("seconds", value)?;
        check_magnitude(self.axis, sexagesimal_total(self.degrees, self.minutes, value))?;

        self.seconds = value;
        self.derive_from_dms();
        trace!(axis = %self.axis, value, "seconds written");

        Ok(AngleChanges::empty()
            .with(AngleField::DecimalDegree)
            .with(AngleField::DecimalMinute)
            .with(AngleField::Seconds))
    }

    /// Writes the decimal minute, splitting it into minutes and seconds
    ///
    /// A negative input is taken as its absolute value.
    pub fn set_decimal_minute(&mut self, value: f64) -> CoordinateResult<AngleChanges> {
        let value = value.abs();
        if value.to_bits() == self.decimal_minute.to_bits() {
            return Ok(AngleChanges::empty());
        }
        check_component("decimal minute", value)?;
        check_magnitude(self.axis, self.degrees as f64 + value / 60.0)?;

        self.decimal_minute = value;
        self.derive_from_decimal_minute();
        trace!(axis = %self.axis, value, "decimal minute written");

        Ok(AngleChanges::empty()
            .with(AngleField::DecimalDegree)
            .with(AngleField::DecimalMinute)
            .with(AngleField::Minutes)
            .with(AngleField::Seconds))
    }

    /// Flips the sign by switching to the opposite hemisphere
    ///
    /// Degrees, minutes and seconds are untouched. A hemisphere from the other
    /// axis is rejected.
    pub fn set_hemisphere(&mut self, hemisphere: Hemisphere) -> CoordinateResult<AngleChanges> {
        if hemisphere.axis() != self.axis {
            return Err(CoordinateError::HemisphereMismatch {
                axis: self.axis,
                hemisphere,
            });
        }
        if hemisphere == self.hemisphere {
            return Ok(AngleChanges::empty());
        }

        self.hemisphere = hemisphere;
        self.decimal_degree = -self.decimal_degree;
        trace!(axis = %self.axis, %hemisphere, "hemisphere written");

        Ok(AngleChanges::empty()
            .with(AngleField::DecimalDegree)
            .with(AngleField::Hemisphere))
    }

    fn derive_from_decimal(&mut self) {
        let magnitude = self.decimal_degree.abs();
        let degrees = magnitude.trunc();
        let decimal_minute = (magnitude - degrees) * 60.0;
        let minutes = decimal_minute.trunc();
        let seconds = ((decimal_minute - minutes) * 60.0).clamp(0.0, MAX_SECONDS);

        self.degrees = degrees as u32;
        self.minutes = minutes as u32;
        self.seconds = seconds;
        self.decimal_minute = decimal_minute;
    }

    fn derive_from_dms(&mut self) {
        self.decimal_minute = self.minutes as f64 + self.seconds / 60.0;
        self.decimal_degree = self.hemisphere.sign() * self.magnitude();
    }

    fn derive_from_decimal_minute(&mut self) {
        let minutes = self.decimal_minute.trunc();
        self.minutes = minutes as u32;
        self.seconds = ((self.decimal_minute - minutes) * 60.0).clamp(0.0, MAX_SECONDS);
        self.decimal_degree =
            self.hemisphere.sign() * (self.degrees as f64 + self.decimal_minute / 60.0);
    }

    #[cfg(test)]
    pub(crate) fn holds_invariants(&self) -> bool {
        let labelled = self.hemisphere.axis() == self.axis;
        let bounded = self.decimal_degree.abs() <= self.axis.bound();
        let signed = if self.decimal_degree < 0.0 {
            self.hemisphere.is_negative()
        } else if self.decimal_degree > 0.0 {
            !self.hemisphere.is_negative()
        } else {
            true
        };
        let composed = (self.decimal_degree.abs() - self.magnitude()).abs() < ANGLE_EPSILON;
        let minute = (self.decimal_minute - (self.minutes as f64 + self.seconds / 60.0)).abs()
            < ANGLE_EPSILON;
        let components = self.minutes < 60 && (0.0..60.0).contains(&self.seconds);
        labelled && bounded && signed && composed && minute && components
    }
}

impl fmt::Display for AngleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules = crate::api::FormatRules::default();
        write!(f, "{}", crate::api::render_angle(self, &rules))
    }
}

fn hemisphere_for(axis: Axis, value: f64) -> Hemisphere {
    if value < 0.0 {
        axis.negative()
    } else {
        axis.positive()
    }
}

fn sexagesimal_total(degrees: u32, minutes: u32, seconds: f64) -> f64 {
    degrees as f64 + minutes as f64 / 60.0 + seconds / 3600.0
}

/// Serialized form; validated on the way back in
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AngleRepr {
    axis: Axis,
    decimal_degree: f64,
    degrees: u32,
    minutes: u32,
    seconds: f64,
    hemisphere: Hemisphere,
}

impl From<AngleValue> for AngleRepr {
    fn from(angle: AngleValue) -> Self {
        Self {
            axis: angle.axis,
            decimal_degree: angle.decimal_degree,
            degrees: angle.degrees,
            minutes: angle.minutes,
            seconds: angle.seconds,
            hemisphere: angle.hemisphere,
        }
    }
}

impl TryFrom<AngleRepr> for AngleValue {
    type Error = CoordinateError;

    fn try_from(repr: AngleRepr) -> Result<Self, Self::Error> {
        if repr.hemisphere.axis() != repr.axis {
            return Err(CoordinateError::HemisphereMismatch {
                axis: repr.axis,
                hemisphere: repr.hemisphere,
            });
        }
        let mut angle = AngleValue::from_dms(repr.degrees, repr.minutes, repr.seconds, repr.hemisphere)?;
        let consistent = (angle.decimal_degree - repr.decimal_degree).abs() < ANGLE_EPSILON;
        if !consistent {
            return Err(CoordinateError::range(
                "decimal degree",
                repr.decimal_degree,
                "does not match the degree, minute and second fields",
            ));
        }
        angle.decimal_degree = repr.decimal_degree;
        Ok(angle)
    }
}
