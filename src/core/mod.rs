//! Core types and constants for the coordinate model

pub mod angle;
pub mod changes;
pub mod constants;
pub mod types;

pub use angle::AngleValue;
pub use changes::{AngleChanges, AngleField, Changes, Field, FieldSet, Property, PropertySet};
pub use constants::*;
pub use types::*;
