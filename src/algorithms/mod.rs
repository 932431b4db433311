//! Numeric collaborators behind the derived representations
//!
//! A position never does grid, earth-centered, celestial or geodesic math
//! itself. It calls the collaborators bundled in [`Services`], each of which is
//! a pure function of its inputs and can be swapped out.

pub mod celestial;
pub mod ecef;
pub mod geodesic;
pub mod grid;

pub use celestial::{CelestialResult, DayCondition, MoonPhase, SolarCalculator, ZodiacSign};
pub use ecef::{Cartesian, EarthCentered, GeocentricConverter};
pub use geodesic::{normalize_bearing, normalize_longitude, GeodesicInverse, GreatCircle};
pub use grid::{GridResult, MgrsGrid, TransverseMercator};

use crate::core::{EarthShape, Ellipsoid};
use crate::validation::CoordinateResult;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Projects geodetic coordinates onto a planar grid
pub trait GridProjection: fmt::Debug + Send + Sync {
    /// Project decimal-degree latitude/longitude on the given ellipsoid
    /// Returns Err when the latitude lies outside the grid's domain
    fn project(&self, latitude: f64, longitude: f64, ellipsoid: &Ellipsoid)
        -> CoordinateResult<GridResult>;
}

/// Encodes a grid result as an MGRS reference
pub trait MgrsEncoder: fmt::Debug + Send + Sync {
    fn encode(&self, grid: &GridResult) -> CoordinateResult<String>;
}

/// Converts geodetic coordinates to earth-centered, earth-fixed ones
pub trait EarthCenteredConverter: fmt::Debug + Send + Sync {
    /// Latitude/longitude in decimal degrees, height in meters
    fn to_ecef(&self, latitude: f64, longitude: f64, height: f64, ellipsoid: &Ellipsoid)
        -> EarthCentered;
}

/// Computes sun and moon information
pub trait CelestialCalculator: fmt::Debug + Send + Sync {
    fn compute(&self, latitude: f64, longitude: f64, instant: DateTime<Utc>) -> CelestialResult;
}

/// Direct and inverse geodesic solutions
pub trait GeodesicSolver: fmt::Debug + Send + Sync {
    /// Spherical direct solution
    /// Latitude, longitude and bearing in radians; returns radians
    fn direct(&self, latitude: f64, longitude: f64, bearing: f64, distance: f64) -> (f64, f64);

    /// Ellipsoidal direct solution
    /// Same units as [`GeodesicSolver::direct`], but longitudes are west-positive
    fn direct_ellipsoidal(
        &self,
        latitude: f64,
        longitude: f64,
        bearing: f64,
        distance: f64,
        ellipsoid: &Ellipsoid,
    ) -> (f64, f64);

    /// Distance and initial bearing between two (latitude, longitude) pairs in degrees
    fn inverse(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        shape: EarthShape,
        ellipsoid: &Ellipsoid,
    ) -> GeodesicInverse;
}

/// The collaborators a position delegates to
#[derive(Debug, Clone)]
pub struct Services {
    pub grid: Arc<dyn GridProjection>,
    pub mgrs: Arc<dyn MgrsEncoder>,
    pub earth_centered: Arc<dyn EarthCenteredConverter>,
    pub celestial: Arc<dyn CelestialCalculator>,
    pub geodesic: Arc<dyn GeodesicSolver>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            grid: Arc::new(TransverseMercator),
            mgrs: Arc::new(MgrsGrid),
            earth_centered: Arc::new(GeocentricConverter),
            celestial: Arc::new(SolarCalculator),
            geodesic: Arc::new(GreatCircle::default()),
        }
    }
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, grid: Arc<dyn GridProjection>) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_mgrs(mut self, mgrs: Arc<dyn MgrsEncoder>) -> Self {
        self.mgrs = mgrs;
        self
    }

    pub fn with_earth_centered(mut self, converter: Arc<dyn EarthCenteredConverter>) -> Self {
        self.earth_centered = converter;
        self
    }

    pub fn with_celestial(mut self, celestial: Arc<dyn CelestialCalculator>) -> Self {
        self.celestial = celestial;
        self
    }

    pub fn with_geodesic(mut self, geodesic: Arc<dyn GeodesicSolver>) -> Self {
        self.geodesic = geodesic;
        self
    }
}
