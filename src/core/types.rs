//! Core data types shared by angle values, positions and collaborators

use crate::core::constants::{
    MAX_LATITUDE, MAX_LONGITUDE, WGS84_EQUATORIAL_RADIUS, WGS84_INVERSE_FLATTENING,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate axis an angle value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest legal magnitude in decimal degrees
    pub fn bound(self) -> f64 {
        match self {
            Axis::Latitude => MAX_LATITUDE,
            Axis::Longitude => MAX_LONGITUDE,
        }
    }

    /// Hemisphere used for non-negative values
    pub fn positive(self) -> Hemisphere {
        match self {
            Axis::Latitude => Hemisphere::North,
            Axis::Longitude => Hemisphere::East,
        }
    }

    /// Hemisphere used for negative values
    pub fn negative(self) -> Hemisphere {
        match self {
            Axis::Latitude => Hemisphere::South,
            Axis::Longitude => Hemisphere::West,
        }
    }

    /// Width of the zero-padded degree field
    pub fn degree_width(self) -> usize {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Directional label encoding both the sign and the axis of an angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn axis(self) -> Axis {
        match self {
            Hemisphere::North | Hemisphere::South => Axis::Latitude,
            Hemisphere::East | Hemisphere::West => Axis::Longitude,
        }
    }

    /// True for S and W
    pub fn is_negative(self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }

    /// -1.0 for S/W, 1.0 for N/E
    pub fn sign(self) -> f64 {
        if self.is_negative() {
            -1.0
        } else {
            1.0
        }
    }

    pub fn letter(self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
            Hemisphere::East => 'E',
            Hemisphere::West => 'W',
        }
    }

    /// Case-insensitive lookup from a single letter
    pub fn from_letter(letter: char) -> Option<Hemisphere> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' => Some(Hemisphere::West),
            _ => None,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Reference ellipsoid parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub equatorial_radius: f64,
    /// 1/f; zero describes a sphere
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub fn new(equatorial_radius: f64, inverse_flattening: f64) -> Self {
        Self {
            equatorial_radius,
            inverse_flattening,
        }
    }

    pub fn wgs84() -> Self {
        Self::new(WGS84_EQUATORIAL_RADIUS, WGS84_INVERSE_FLATTENING)
    }

    pub fn flattening(&self) -> f64 {
        if self.inverse_flattening == 0.0 {
            0.0
        } else {
            1.0 / self.inverse_flattening
        }
    }

    /// Semi-minor axis (meters)
    pub fn polar_radius(&self) -> f64 {
        self.equatorial_radius * (1.0 - self.flattening())
    }

    /// First eccentricity squared
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        2.0 * f - f * f
    }

    /// Checks the parameters describe a usable ellipsoid
    pub fn is_valid(&self) -> bool {
        self.equatorial_radius.is_finite()
            && self.equatorial_radius > 0.0
            && self.inverse_flattening.is_finite()
            && (self.inverse_flattening == 0.0 || self.inverse_flattening > 1.0)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Earth model used by distance and movement calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarthShape {
    Sphere,
    Ellipsoid,
}
