//! UTM grid projection and MGRS encoding
//!
//! The projection uses the Snyder transverse Mercator series on the position's
//! ellipsoid, including the Norway and Svalbard zone exceptions. Latitudes
//! beyond ±84° are outside the UTM domain and rejected.

use crate::algorithms::{GridProjection, MgrsEncoder};
use crate::core::Ellipsoid;
use crate::validation::{CoordinateError, CoordinateResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// UTM scale factor on the central meridian
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
/// Largest latitude magnitude covered by UTM
pub const UTM_LATITUDE_LIMIT: f64 = 84.0;

const BAND_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";
const ROW_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUV";
const COLUMN_SETS: [&[u8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];
const GRID_SQUARE: f64 = 100_000.0;

/// Result of a UTM projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridResult {
    /// Longitude zone, 1-60
    pub zone: u8,
    /// Latitude band letter, C-X
    pub band: char,
    /// Easting (meters)
    pub easting: f64,
    /// Northing (meters, southern hemisphere offset applied)
    pub northing: f64,
}

impl GridResult {
    pub fn is_northern(&self) -> bool {
        self.band >= 'N'
    }
}

impl fmt::Display for GridResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:.0}mE {:.0}mN",
            self.zone, self.band, self.easting, self.northing
        )
    }
}

/// Transverse Mercator projection into UTM zones
#[derive(Debug, Clone, Copy, Default)]
pub struct TransverseMercator;

impl TransverseMercator {
    pub fn new() -> Self {
        Self
    }

    /// Zone number including the Norway and Svalbard exceptions
    pub fn zone_for(latitude: f64, longitude: f64) -> u8 {
        if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
            return 32;
        }
        if (72.0..=84.0).contains(&latitude) {
            if (0.0..9.0).contains(&longitude) {
                return 31;
            } else if (9.0..21.0).contains(&longitude) {
                return 33;
            } else if (21.0..33.0).contains(&longitude) {
                return 35;
            } else if (33.0..42.0).contains(&longitude) {
                return 37;
            }
        }
        let zone = ((longitude + 180.0) / 6.0).floor() as i32 + 1;
        zone.clamp(1, 60) as u8
    }

    /// Latitude band letter; X spans 72-84 and C also covers 84-80 south
    pub fn band_for(latitude: f64) -> char {
        let index = ((latitude + 80.0) / 8.0).floor() as i32;
        let index = index.clamp(0, BAND_LETTERS.len() as i32 - 1) as usize;
        BAND_LETTERS[index] as char
    }

    fn central_meridian(zone: u8) -> f64 {
        ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
    }
}

impl GridProjection for TransverseMercator {
    fn project(
        &self,
        latitude: f64,
        longitude: f64,
        ellipsoid: &Ellipsoid,
    ) -> CoordinateResult<GridResult> {
        if !latitude.is_finite() || latitude.abs() > UTM_LATITUDE_LIMIT {
            return Err(CoordinateError::Grid {
                latitude,
                reason: format!("UTM covers latitudes within ±{}°", UTM_LATITUDE_LIMIT),
            });
        }
        if !ellipsoid.is_valid() {
            return Err(CoordinateError::Grid {
                latitude,
                reason: "invalid ellipsoid parameters".to_string(),
            });
        }

        let zone = Self::zone_for(latitude, longitude);
        let a = ellipsoid.equatorial_radius;
        let e2 = ellipsoid.eccentricity_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);

        let phi = latitude.to_radians();
        let lambda = longitude.to_radians();
        let lon_diff = lambda - Self::central_meridian(zone);

        let n = a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        let t = phi.tan().powi(2);
        let c = ep2 * phi.cos().powi(2);
        let big_a = phi.cos() * lon_diff;

        let m = a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

        let easting = FALSE_EASTING
            + SCALE_FACTOR
                * n
                * (big_a
                    + (1.0 - t + c) * big_a.powi(3) / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * big_a.powi(5) / 120.0);

        let mut northing = SCALE_FACTOR
            * (m + n
                * phi.tan()
                * (big_a.powi(2) / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * big_a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * big_a.powi(6)
                        / 720.0));
        if latitude < 0.0 {
            northing += FALSE_NORTHING_SOUTH;
        }

        Ok(GridResult {
            zone,
            band: Self::band_for(latitude),
            easting,
            northing,
        })
    }
}

/// MGRS encoder built on the standard 100 km square lettering
#[derive(Debug, Clone, Copy, Default)]
pub struct MgrsGrid;

impl MgrsGrid {
    pub fn new() -> Self {
        Self
    }
}

impl MgrsEncoder for MgrsGrid {
    fn encode(&self, grid: &GridResult) -> CoordinateResult<String> {
        let invalid = |reason: &str| CoordinateError::Grid {
            latitude: f64::NAN,
            reason: reason.to_string(),
        };
        if !(1..=60).contains(&grid.zone) {
            return Err(invalid("zone out of range"));
        }

        // Column letters cycle through three sets of eight, rows through twenty
        let set = (grid.zone as usize - 1) % 3;
        let column_index = (grid.easting / GRID_SQUARE).floor() as i64 - 1;
        let column = usize::try_from(column_index)
            .ok()
            .and_then(|index| COLUMN_SETS[set].get(index))
            .ok_or_else(|| invalid("easting outside the 100 km column range"))?;

        let row_offset = if grid.zone % 2 == 0 { 5 } else { 0 };
        let row_index = ((grid.northing / GRID_SQUARE).floor() as i64 + row_offset)
            .rem_euclid(ROW_LETTERS.len() as i64) as usize;
        let row = ROW_LETTERS[row_index];

        let easting = (grid.easting.rem_euclid(GRID_SQUARE)).floor() as u32;
        let northing = (grid.northing.rem_euclid(GRID_SQUARE)).floor() as u32;

        Ok(format!(
            "{}{} {}{} {:05} {:05}",
            grid.zone, grid.band, *column as char, row as char, easting, northing
        ))
    }
}
