//! Sun and moon information for a position and instant
//!
//! Solar times follow the sunrise equation with the standard -0.833° horizon;
//! the sun position uses the low-precision almanac series. Moon illumination
//! comes from the mean synodic month, which is good to a few hours.

use crate::algorithms::CelestialCalculator;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Julian day of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian day of J2000.0
const J2000_JD: f64 = 2_451_545.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Sun altitude at apparent rise/set, including refraction and solar radius
const HORIZON_ALTITUDE: f64 = -0.833;
const OBLIQUITY: f64 = 23.4397;
/// Mean synodic month (days)
const SYNODIC_MONTH: f64 = 29.530_588_853;
/// A reference new moon: 2000-01-06 18:14 UTC
const REFERENCE_NEW_MOON_JD: f64 = 2_451_550.26;

/// Whether the sun crosses the horizon on the date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCondition {
    RiseAndSet,
    UpAllDay,
    DownAllDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Phase for a moon age in days since new moon
    pub fn from_age(age: f64) -> Self {
        const PHASES: [MoonPhase; 8] = [
            MoonPhase::NewMoon,
            MoonPhase::WaxingCrescent,
            MoonPhase::FirstQuarter,
            MoonPhase::WaxingGibbous,
            MoonPhase::FullMoon,
            MoonPhase::WaningGibbous,
            MoonPhase::LastQuarter,
            MoonPhase::WaningCrescent,
        ];
        // Each phase is centered on its eighth of the cycle
        let eighth = SYNODIC_MONTH / 8.0;
        let index = ((age.rem_euclid(SYNODIC_MONTH) + eighth / 2.0) / eighth).floor() as usize % 8;
        PHASES[index]
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        };
        write!(f, "{}", name)
    }
}

/// Tropical zodiac sign of a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub fn from_month_day(month: u32, day: u32) -> Self {
        // (month, first day of the sign starting in that month, sign)
        const STARTS: [(u32, u32, ZodiacSign); 12] = [
            (1, 20, ZodiacSign::Aquarius),
            (2, 19, ZodiacSign::Pisces),
            (3, 21, ZodiacSign::Aries),
            (4, 20, ZodiacSign::Taurus),
            (5, 21, ZodiacSign::Gemini),
            (6, 21, ZodiacSign::Cancer),
            (7, 23, ZodiacSign::Leo),
            (8, 23, ZodiacSign::Virgo),
            (9, 23, ZodiacSign::Libra),
            (10, 23, ZodiacSign::Scorpio),
            (11, 22, ZodiacSign::Sagittarius),
            (12, 22, ZodiacSign::Capricorn),
        ];
        let index = STARTS
            .iter()
            .position(|(start_month, _, _)| *start_month == month)
            .unwrap_or(0);
        let (_, first_day, sign) = STARTS[index];
        if day >= first_day {
            sign
        } else {
            STARTS[(index + STARTS.len() - 1) % STARTS.len()].2
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Celestial information computed for one position and instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialResult {
    /// Sunrise on the UTC date of the instant; `None` unless the sun rises and sets
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub solar_noon: Option<DateTime<Utc>>,
    pub condition: DayCondition,
    /// Sun altitude at the instant (degrees)
    pub sun_altitude: f64,
    /// Sun azimuth at the instant, clockwise from north (degrees)
    pub sun_azimuth: f64,
    /// Illuminated fraction of the moon, 0-1
    pub moon_illumination: f64,
    pub moon_phase: MoonPhase,
    pub zodiac: ZodiacSign,
}

/// Built-in celestial collaborator
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarCalculator;

impl SolarCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Sun altitude and azimuth in degrees
    pub fn sun_position(latitude: f64, longitude: f64, instant: DateTime<Utc>) -> (f64, f64) {
        let n = julian_day(instant) - J2000_JD;
        let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
        let anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
        let ecliptic = (mean_longitude + 1.915 * anomaly.sin() + 0.020 * (2.0 * anomaly).sin())
            .to_radians();
        let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

        let right_ascension = (obliquity.cos() * ecliptic.sin()).atan2(ecliptic.cos());
        let declination = (obliquity.sin() * ecliptic.sin()).asin();
        let sidereal = (280.460_618_37 + 360.985_647_366_29 * n).rem_euclid(360.0);
        let hour_angle = (sidereal + longitude).to_radians() - right_ascension;

        let phi = latitude.to_radians();
        let altitude = (phi.sin() * declination.sin()
            + phi.cos() * declination.cos() * hour_angle.cos())
        .asin();
        let azimuth = (-declination.cos() * hour_angle.sin()).atan2(
            declination.sin() * phi.cos() - declination.cos() * hour_angle.cos() * phi.sin(),
        );
        (altitude.to_degrees(), azimuth.to_degrees().rem_euclid(360.0))
    }

    /// Rise, transit and set for the UTC date of `instant`
    fn solar_times(
        latitude: f64,
        longitude: f64,
        instant: DateTime<Utc>,
    ) -> (DayCondition, Option<f64>, f64, Option<f64>) {
        // Julian days start at noon, so this is noon of the instant's UTC date
        let noon = (julian_day(instant) - 0.5).floor() + 1.0;
        let day = noon - J2000_JD;
        let mean_solar = day - longitude / 360.0;

        let anomaly = (357.5291 + 0.985_600_28 * mean_solar).rem_euclid(360.0);
        let anomaly_rad = anomaly.to_radians();
        let center = 1.9148 * anomaly_rad.sin()
            + 0.0200 * (2.0 * anomaly_rad).sin()
            + 0.0003 * (3.0 * anomaly_rad).sin();
        let ecliptic = (anomaly + center + 180.0 + 102.9372).rem_euclid(360.0).to_radians();
        let transit =
            J2000_JD + mean_solar + 0.0053 * anomaly_rad.sin() - 0.0069 * (2.0 * ecliptic).sin();

        let sin_declination = ecliptic.sin() * OBLIQUITY.to_radians().sin();
        let cos_declination = sin_declination.asin().cos();
        let phi = latitude.to_radians();
        let cos_hour_angle = (HORIZON_ALTITUDE.to_radians().sin() - phi.sin() * sin_declination)
            / (phi.cos() * cos_declination);

        if cos_hour_angle < -1.0 {
            (DayCondition::UpAllDay, None, transit, None)
        } else if cos_hour_angle > 1.0 {
            (DayCondition::DownAllDay, None, transit, None)
        } else {
            let offset = cos_hour_angle.acos().to_degrees() / 360.0;
            (
                DayCondition::RiseAndSet,
                Some(transit - offset),
                transit,
                Some(transit + offset),
            )
        }
    }

    /// Moon age (days since new moon) and illuminated fraction
    pub fn moon_illumination(instant: DateTime<Utc>) -> (f64, f64) {
        let age = (julian_day(instant) - REFERENCE_NEW_MOON_JD).rem_euclid(SYNODIC_MONTH);
        let fraction = (1.0 - (2.0 * PI * age / SYNODIC_MONTH).cos()) / 2.0;
        (age, fraction)
    }
}

impl CelestialCalculator for SolarCalculator {
    fn compute(&self, latitude: f64, longitude: f64, instant: DateTime<Utc>) -> CelestialResult {
        let (condition, rise, transit, set) = Self::solar_times(latitude, longitude, instant);
        let (sun_altitude, sun_azimuth) = Self::sun_position(latitude, longitude, instant);
        let (age, moon_illumination) = Self::moon_illumination(instant);

        CelestialResult {
            sunrise: rise.and_then(from_julian_day),
            sunset: set.and_then(from_julian_day),
            solar_noon: from_julian_day(transit),
            condition,
            sun_altitude,
            sun_azimuth,
            moon_illumination,
            moon_phase: MoonPhase::from_age(age),
            zodiac: ZodiacSign::from_month_day(instant.month(), instant.day()),
        }
    }
}

fn julian_day(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

fn from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_seattle_summer_solstice() {
        let result = SolarCalculator.compute(47.6062, -122.3321, utc(2024, 6, 21, 18, 0));
        assert_eq!(result.condition, DayCondition::RiseAndSet);

        let sunrise = result.sunrise.unwrap();
        assert_eq!((sunrise.day(), sunrise.hour(), sunrise.minute()), (21, 12, 11));
        let noon = result.solar_noon.unwrap();
        assert_eq!((noon.hour(), noon.minute()), (20, 11));
        let sunset = result.sunset.unwrap();
        assert_eq!((sunset.day(), sunset.hour(), sunset.minute()), (22, 4, 10));
    }

    #[test]
    fn test_polar_day_and_night() {
        let summer = SolarCalculator.compute(69.65, 18.96, utc(2024, 6, 21, 12, 0));
        assert_eq!(summer.condition, DayCondition::UpAllDay);
        assert!(summer.sunrise.is_none());
        assert!(summer.solar_noon.is_some());

        let winter = SolarCalculator.compute(69.65, 18.96, utc(2024, 12, 21, 12, 0));
        assert_eq!(winter.condition, DayCondition::DownAllDay);
        assert!(winter.sunset.is_none());
    }

    #[test]
    fn test_sun_position() {
        let (altitude, _) = SolarCalculator::sun_position(0.0, 0.0, utc(2024, 3, 20, 12, 7));
        assert!(altitude > 89.0);

        let (altitude, azimuth) =
            SolarCalculator::sun_position(47.6062, -122.3321, utc(2024, 6, 21, 20, 10));
        assert!((altitude - 65.8).abs() < 0.2);
        assert!((azimuth - 180.0).abs() < 2.0);

        let (_, azimuth) = SolarCalculator::sun_position(47.6062, -122.3321, utc(2024, 6, 21, 15, 0));
        assert!(azimuth > 60.0 && azimuth < 100.0);
    }

    #[test]
    fn test_moon_phases() {
        let new_moon = SolarCalculator.compute(0.0, 0.0, utc(2024, 4, 8, 18, 21));
        assert!(new_moon.moon_illumination < 0.02);
        assert_eq!(new_moon.moon_phase, MoonPhase::NewMoon);

        let full_moon = SolarCalculator.compute(0.0, 0.0, utc(2024, 4, 23, 23, 49));
        assert!(full_moon.moon_illumination > 0.98);
        assert_eq!(full_moon.moon_phase, MoonPhase::FullMoon);
        assert_eq!(full_moon.moon_phase.to_string(), "Full Moon");
    }

    #[test]
    fn test_zodiac_boundaries() {
        assert_eq!(ZodiacSign::from_month_day(3, 20), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_month_day(3, 21), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_month_day(1, 1), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::from_month_day(12, 25), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::from_month_day(6, 21), ZodiacSign::Cancer);
        assert_eq!(ZodiacSign::Sagittarius.to_string(), "Sagittarius");
    }
}
