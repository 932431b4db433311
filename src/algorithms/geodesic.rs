//! Great-circle and Vincenty geodesic solutions

use crate::algorithms::GeodesicSolver;
use crate::core::constants::MEAN_EARTH_RADIUS;
use crate::core::{EarthShape, Ellipsoid};
use serde::{Deserialize, Serialize};
use tracing::warn;

const VINCENTY_TOLERANCE: f64 = 1e-12;
const VINCENTY_MAX_ITERATIONS: usize = 200;

/// Result of an inverse geodesic solution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodesicInverse {
    /// Distance along the surface (meters)
    pub distance: f64,
    /// Initial bearing in degrees, [0, 360)
    pub initial_bearing: f64,
}

/// Haversine sphere formulas plus Vincenty's ellipsoidal solutions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircle {
    /// Sphere radius used by the spherical formulas (meters)
    pub radius: f64,
}

impl Default for GreatCircle {
    fn default() -> Self {
        Self {
            radius: MEAN_EARTH_RADIUS,
        }
    }
}

impl GreatCircle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    fn haversine(&self, from: (f64, f64), to: (f64, f64)) -> GeodesicInverse {
        let (phi1, phi2) = (from.0.to_radians(), to.0.to_radians());
        let d_phi = phi2 - phi1;
        let d_lambda = (to.1 - from.1).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        let theta = (d_lambda.sin() * phi2.cos())
            .atan2(phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos());

        GeodesicInverse {
            distance: self.radius * c,
            initial_bearing: normalize_bearing(theta.to_degrees()),
        }
    }

    /// Vincenty inverse; `None` when the iteration does not converge
    fn vincenty_inverse(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        ellipsoid: &Ellipsoid,
    ) -> Option<GeodesicInverse> {
        let a = ellipsoid.equatorial_radius;
        let f = ellipsoid.flattening();
        let b = ellipsoid.polar_radius();

        let l = (to.1 - from.1).to_radians();
        let u1 = ((1.0 - f) * from.0.to_radians().tan()).atan();
        let u2 = ((1.0 - f) * to.0.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        for _ in 0..VINCENTY_MAX_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
                + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
            .sqrt();
            if sin_sigma == 0.0 {
                return Some(GeodesicInverse {
                    distance: 0.0,
                    initial_bearing: 0.0,
                });
            }
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            // Equatorial lines have cos²α = 0
            let cos_2sigma_m = if cos_sq_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                0.0
            };
            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            let previous = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

            if (lambda - previous).abs() < VINCENTY_TOLERANCE {
                let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
                let (big_a, big_b) = vincenty_coefficients(u_sq);
                let delta_sigma = sigma_correction(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
                let (sin_lambda, cos_lambda) = lambda.sin_cos();
                let alpha1 = (cos_u2 * sin_lambda)
                    .atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
                return Some(GeodesicInverse {
                    distance: b * big_a * (sigma - delta_sigma),
                    initial_bearing: normalize_bearing(alpha1.to_degrees()),
                });
            }
        }
        None
    }
}

impl GeodesicSolver for GreatCircle {
    fn direct(&self, latitude: f64, longitude: f64, bearing: f64, distance: f64) -> (f64, f64) {
        let delta = distance / self.radius;
        let lat2 = (latitude.sin() * delta.cos() + latitude.cos() * delta.sin() * bearing.cos()).asin();
        let lon2 = longitude
            + (bearing.sin() * delta.sin() * latitude.cos())
                .atan2(delta.cos() - latitude.sin() * lat2.sin());
        (lat2, lon2)
    }

    fn direct_ellipsoidal(
        &self,
        latitude: f64,
        longitude: f64,
        bearing: f64,
        distance: f64,
        ellipsoid: &Ellipsoid,
    ) -> (f64, f64) {
        let f = ellipsoid.flattening();
        let a = ellipsoid.equatorial_radius;
        let b = ellipsoid.polar_radius();

        let (sin_alpha1, cos_alpha1) = bearing.sin_cos();
        let tan_u1 = (1.0 - f) * latitude.tan();
        let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;
        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let (big_a, big_b) = vincenty_coefficients(u_sq);

        let base = distance / (b * big_a);
        let mut sigma = base;
        let mut cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        for _ in 0..VINCENTY_MAX_ITERATIONS {
            cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let previous = sigma;
            sigma = base + sigma_correction(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
            if (sigma - previous).abs() < VINCENTY_TOLERANCE {
                break;
            }
        }

        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + x * x).sqrt());
        let lambda = (sin_sigma * sin_alpha1)
            .atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let l = lambda
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        // West-positive longitudes: moving east decreases the value
        (lat2, longitude - l)
    }

    fn inverse(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        shape: EarthShape,
        ellipsoid: &Ellipsoid,
    ) -> GeodesicInverse {
        match shape {
            EarthShape::Sphere => self.haversine(from, to),
            EarthShape::Ellipsoid => self.vincenty_inverse(from, to, ellipsoid).unwrap_or_else(|| {
                warn!(?from, ?to, "vincenty inverse did not converge, using great circle");
                self.haversine(from, to)
            }),
        }
    }
}

fn vincenty_coefficients(u_sq: f64) -> (f64, f64) {
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    (big_a, big_b)
}

fn sigma_correction(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))))
}

/// Folds any bearing into [0, 360)
pub fn normalize_bearing(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// Folds a longitude in degrees into [-180, 180]
pub fn normalize_longitude(degrees: f64) -> f64 {
    if (-180.0..=180.0).contains(&degrees) {
        return degrees;
    }
    let folded = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if folded == -180.0 && degrees > 0.0 {
        180.0
    } else {
        folded
    }
}
