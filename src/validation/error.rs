//! Error taxonomy for coordinate validation, parsing and propagation
//!
//! Every failure in this crate is a permanent input-validity problem raised at
//! the point of the offending call. Nothing is retried, and a failed call never
//! leaves a partially mutated value behind.

use crate::core::{Axis, Hemisphere};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by angle values, positions and the text codec
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum CoordinateError {
    /// A numeric field violates its axis bound or component bound
    #[error("{field} value {value} is out of range: {reason}")]
    Range {
        field: String,
        value: f64,
        reason: String,
    },

    /// A value of one axis was supplied where the other axis is required
    #[error("expected a {expected} value, got {found}")]
    TypeMismatch { expected: Axis, found: Axis },

    /// A hemisphere label that does not belong to the value's axis
    #[error("hemisphere {hemisphere} cannot be applied to a {axis} value")]
    HemisphereMismatch { axis: Axis, hemisphere: Hemisphere },

    /// Text input matched no recognized coordinate grammar
    #[error("unrecognized coordinate text '{input}': {reason}")]
    Format { input: String, reason: String },

    /// An operation needs a derived representation that was never loaded
    #[error("{operation} requires the {representation} representation to be loaded first")]
    PrecursorNotLoaded {
        operation: String,
        representation: String,
    },

    /// The grid collaborator rejected its input
    #[error("grid projection unavailable at latitude {latitude}: {reason}")]
    Grid { latitude: f64, reason: String },

    /// Configuration could not be read, written or validated
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CoordinateError {
    /// Shorthand for a [`CoordinateError::Range`] error
    pub fn range(field: &str, value: f64, reason: impl Into<String>) -> Self {
        CoordinateError::Range {
            field: field.to_string(),
            value,
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`CoordinateError::Format`] error
    pub fn format(input: &str, reason: impl Into<String>) -> Self {
        CoordinateError::Format {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`CoordinateError::Config`] error
    pub fn config(message: impl Into<String>) -> Self {
        CoordinateError::Config {
            message: message.into(),
        }
    }

    /// True for the variants that describe an axis/hemisphere mix-up
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            CoordinateError::TypeMismatch { .. } | CoordinateError::HemisphereMismatch { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type CoordinateResult<T> = Result<T, CoordinateError>;
