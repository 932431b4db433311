//! Moving a position along a bearing and measuring between positions

use super::Position;
use crate::algorithms::{normalize_bearing, normalize_longitude};
use crate::core::{AngleValue, Axis, Changes, EarthShape, MAX_LATITUDE};
use crate::validation::{check_finite, CoordinateResult};
use serde::{Deserialize, Serialize};

const METERS_PER_MILE: f64 = 1_609.344;
const METERS_PER_NAUTICAL_MILE: f64 = 1_852.0;
const METERS_PER_FOOT: f64 = 0.3048;

/// Surface distance and initial bearing between two positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub meters: f64,
    /// Initial bearing in degrees, [0, 360)
    pub bearing: f64,
}

impl Distance {
    pub fn kilometers(&self) -> f64 {
        self.meters / 1_000.0
    }

    /// Statute miles
    pub fn miles(&self) -> f64 {
        self.meters / METERS_PER_MILE
    }

    pub fn nautical_miles(&self) -> f64 {
        self.meters / METERS_PER_NAUTICAL_MILE
    }

    pub fn feet(&self) -> f64 {
        self.meters / METERS_PER_FOOT
    }
}

impl Position {
    /// Moves `distance` meters along `bearing` degrees
    ///
    /// The result is written back through [`Position::set_coordinates`], so
    /// derived representations and listeners see an ordinary coordinate change.
    pub fn move_by(
        &mut self,
        distance: f64,
        bearing: f64,
        shape: EarthShape,
    ) -> CoordinateResult<Changes> {
        check_finite("distance", distance)?;
        check_finite("bearing", bearing)?;

        let latitude = self.latitude.to_radians();
        let longitude = self.longitude.to_radians();
        let bearing = bearing.to_radians();

        let (latitude, longitude) = match shape {
            EarthShape::Sphere => self
                .services
                .geodesic
                .direct(latitude, longitude, bearing, distance),
            EarthShape::Ellipsoid => {
                // the ellipsoidal solver counts longitude positive to the west
                let (latitude, longitude) = self.services.geodesic.direct_ellipsoidal(
                    latitude,
                    -longitude,
                    bearing,
                    distance,
                    &self.ellipsoid,
                );
                (latitude, -longitude)
            }
        };

        let latitude = AngleValue::from_decimal(
            latitude.to_degrees().clamp(-MAX_LATITUDE, MAX_LATITUDE),
            Axis::Latitude,
        )?;
        let longitude =
            AngleValue::from_decimal(normalize_longitude(longitude.to_degrees()), Axis::Longitude)?;
        self.set_coordinates(latitude, longitude)
    }

    /// Moves `distance` meters along the initial bearing toward `target`
    pub fn move_toward(
        &mut self,
        target: &Position,
        distance: f64,
        shape: EarthShape,
    ) -> CoordinateResult<Changes> {
        let bearing = self.distance_to(target, shape).bearing;
        self.move_by(distance, bearing, shape)
    }

    /// Surface distance and initial bearing to `other`
    pub fn distance_to(&self, other: &Position, shape: EarthShape) -> Distance {
        let inverse = self.services.geodesic.inverse(
            (self.latitude.decimal_degree(), self.longitude.decimal_degree()),
            (other.latitude.decimal_degree(), other.longitude.decimal_degree()),
            shape,
            &self.ellipsoid,
        );
        Distance {
            meters: inverse.distance,
            bearing: normalize_bearing(inverse.initial_bearing),
        }
    }
}
