//! Low-precision solar ephemeris.
//!
//! Uses the mean anomaly / equation of centre series with a fixed obliquity,
//! good to a fraction of a degree for civil purposes. Azimuth is reported as a
//! compass bearing (0 = north, clockwise).

use crate::domain::{Coordinate, SolarPosition};
use crate::errors::{ApiError, ApiResult};
use crate::utils::{normalize_degrees, round1};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::f64::consts::PI;

const J2000: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Mean obliquity of the ecliptic (deg)
const OBLIQUITY_DEG: f64 = 23.4397;
/// Longitude of perihelion (deg)
const PERIHELION_DEG: f64 = 102.9372;

/// Accepted flight time layouts, all read as UTC
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a `YYYY-MM-DDTHH:MM` flight time as a UTC instant.
///
/// No airport timezone is applied.
pub fn parse_flight_datetime(raw: &str) -> ApiResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "unparsable datetime '{}', expected YYYY-MM-DDTHH:MM",
                raw
            ))
        })
}

/// Stateless calculator; every call is independent
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarPositionCalculator;

impl SolarPositionCalculator {
    /// Sun position rounded to 0.1 degree
    pub fn position(&self, at: Coordinate, when: DateTime<Utc>) -> SolarPosition {
        let (azimuth, altitude) = self.position_unrounded(at, when);
        SolarPosition::new(
            normalize_degrees(round1(azimuth)),
            round1(altitude).clamp(-90.0, 90.0),
        )
    }

    /// (azimuth, altitude) in degrees, before presentation rounding
    pub fn position_unrounded(&self, at: Coordinate, when: DateTime<Utc>) -> (f64, f64) {
        let d = days_since_j2000(when);
        let lw = (-at.longitude).to_radians();
        let phi = at.latitude.to_radians();

        let (dec, ra) = sun_equatorial(d);
        let h = sidereal_time(d, lw) - ra;

        let altitude = (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos())
            .clamp(-1.0, 1.0)
            .asin();
        // Measured from south, positive towards west
        let azimuth_south = h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos());

        (
            normalize_degrees((azimuth_south + PI).to_degrees()),
            altitude.to_degrees(),
        )
    }
}

fn days_since_j2000(when: DateTime<Utc>) -> f64 {
    let seconds = when.timestamp() as f64 + f64::from(when.timestamp_subsec_millis()) / 1000.0;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD - J2000
}

fn solar_mean_anomaly(d: f64) -> f64 {
    (357.5291 + 0.985_600_28 * d).to_radians()
}

fn ecliptic_longitude(m: f64) -> f64 {
    let centre = (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians();
    m + centre + PERIHELION_DEG.to_radians() + PI
}

/// (declination, right ascension) in radians for ecliptic latitude 0
fn sun_equatorial(d: f64) -> (f64, f64) {
    let l = ecliptic_longitude(solar_mean_anomaly(d));
    let e = OBLIQUITY_DEG.to_radians();
    let dec = (e.sin() * l.sin()).asin();
    let ra = (l.sin() * e.cos()).atan2(l.cos());
    (dec, ra)
}

fn sidereal_time(d: f64, lw: f64) -> f64 {
    (280.16 + 360.985_623_5 * d).to_radians() - lw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        parse_flight_datetime(raw).unwrap()
    }

    #[test]
    fn test_parse_minutes_format_as_utc() {
        let dt = at("2024-06-21T10:00");
        assert_eq!(dt.to_rfc3339(), "2024-06-21T10:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_flight_datetime("tomorrow morning"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(parse_flight_datetime("2024-13-40T10:00").is_err());
    }

    #[test]
    fn test_equinox_noon_sun_overhead_at_null_island() {
        let sun = SolarPositionCalculator.position(Coordinate::new(0.0, 0.0), at("2024-03-20T12:00"));
        assert!(sun.altitude_deg > 85.0, "altitude {}", sun.altitude_deg);
        assert!(sun.is_daytime);
    }

    #[test]
    fn test_solstice_noon_sun_overhead_at_tropic_of_cancer() {
        let sun =
            SolarPositionCalculator.position(Coordinate::new(23.44, 0.0), at("2024-06-21T12:00"));
        assert!(sun.altitude_deg > 85.0, "altitude {}", sun.altitude_deg);
    }

    #[test]
    fn test_midnight_is_night() {
        let sun = SolarPositionCalculator.position(Coordinate::new(0.0, 0.0), at("2024-03-20T00:00"));
        assert!(sun.altitude_deg < -80.0);
        assert!(!sun.is_daytime);
    }

    #[test]
    fn test_london_noon_sun_is_due_south() {
        let sun =
            SolarPositionCalculator.position(Coordinate::new(51.5, 0.0), at("2024-06-21T12:00"));
        assert!((sun.azimuth_deg - 180.0).abs() < 5.0, "azimuth {}", sun.azimuth_deg);
        assert!((sun.altitude_deg - 62.0).abs() < 1.5, "altitude {}", sun.altitude_deg);
    }

    #[test]
    fn test_london_morning_sun_is_in_the_east() {
        let sun =
            SolarPositionCalculator.position(Coordinate::new(51.5, 0.0), at("2024-06-21T06:00"));
        assert!(
            (50.0..100.0).contains(&sun.azimuth_deg),
            "azimuth {}",
            sun.azimuth_deg
        );
        assert!(sun.altitude_deg > 5.0 && sun.altitude_deg < 25.0);
    }

    #[test]
    fn test_london_evening_sun_is_in_the_west() {
        let sun =
            SolarPositionCalculator.position(Coordinate::new(51.5, 0.0), at("2024-06-21T18:00"));
        assert!(
            (260.0..310.0).contains(&sun.azimuth_deg),
            "azimuth {}",
            sun.azimuth_deg
        );
    }

    #[test]
    fn test_polar_midnight_sun() {
        let sun =
            SolarPositionCalculator.position(Coordinate::new(78.2, 15.6), at("2024-06-21T23:00"));
        assert!(sun.is_daytime);
        assert!(sun.azimuth_deg > 300.0 || sun.azimuth_deg < 60.0);
    }

    #[test]
    fn test_ranges_hold_across_the_globe() {
        let when = at("2024-12-01T07:30");
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(30) {
                let sun = SolarPositionCalculator
                    .position(Coordinate::new(lat as f64, lon as f64), when);
                assert!((0.0..360.0).contains(&sun.azimuth_deg));
                assert!((-90.0..=90.0).contains(&sun.altitude_deg));
                assert_eq!(sun.is_daytime, sun.altitude_deg > 0.0);
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let here = Coordinate::new(48.85, 2.35);
        let when = at("2024-09-01T15:45");
        let first = SolarPositionCalculator.position(here, when);
        for _ in 0..100 {
            assert_eq!(SolarPositionCalculator.position(here, when), first);
        }
    }
}
