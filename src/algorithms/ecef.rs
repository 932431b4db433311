//! Earth-centered, earth-fixed coordinates and the unit-sphere cartesian form

use crate::algorithms::EarthCenteredConverter;
use crate::core::Ellipsoid;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Earth-centered, earth-fixed position (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthCentered {
    pub position: Vector3<f64>,
}

impl EarthCentered {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Straight-line distance to another earth-centered point
    pub fn distance_to(&self, other: &EarthCentered) -> f64 {
        (self.position - other.position).norm()
    }
}

/// Unit-sphere cartesian position used by quick bearing and distance helpers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartesian {
    pub position: Vector3<f64>,
}

impl Cartesian {
    /// Projects decimal-degree latitude/longitude onto the unit sphere
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        let phi = latitude.to_radians();
        let lambda = longitude.to_radians();
        Self {
            position: Vector3::new(phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin()),
        }
    }
}

/// Geodetic to ECEF conversion on an arbitrary ellipsoid
#[derive(Debug, Clone, Copy, Default)]
pub struct GeocentricConverter;

impl GeocentricConverter {
    pub fn new() -> Self {
        Self
    }
}

impl EarthCenteredConverter for GeocentricConverter {
    fn to_ecef(
        &self,
        latitude: f64,
        longitude: f64,
        height: f64,
        ellipsoid: &Ellipsoid,
    ) -> EarthCentered {
        let phi = latitude.to_radians();
        let lambda = longitude.to_radians();
        let e2 = ellipsoid.eccentricity_squared();
        let n = ellipsoid.equatorial_radius / (1.0 - e2 * phi.sin().powi(2)).sqrt();

        EarthCentered::new(
            (n + height) * phi.cos() * lambda.cos(),
            (n + height) * phi.cos() * lambda.sin(),
            (n * (1.0 - e2) + height) * phi.sin(),
        )
    }
}
