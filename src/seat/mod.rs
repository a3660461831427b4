/// Window-side decision from flight heading and sun position
use crate::domain::{Confidence, SeatRecommendation, SeatSide, SolarPosition};
use crate::utils::{angular_difference, normalize_degrees};

/// Side picked when the sun is exactly ahead of or behind the aircraft
pub const TIE_BREAK_SIDE: SeatSide = SeatSide::Right;

/// Sun altitude above which light counts as overhead (deg)
const HIGH_SUN_DEG: f64 = 45.0;
/// Sun altitude above which light counts as side lighting (deg)
const LOW_SUN_DEG: f64 = 15.0;

pub const NIGHT_REASON: &str = "Night flight - no scenic advantage for either side";

#[derive(Debug, Clone, Copy, Default)]
pub struct SeatRecommender;

impl SeatRecommender {
    pub fn recommend(&self, flight_bearing_deg: f64, sun: &SolarPosition) -> SeatRecommendation {
        if !sun.is_daytime {
            return SeatRecommendation {
                side: SeatSide::Either,
                reason: NIGHT_REASON.to_string(),
                confidence: Confidence::Low,
            };
        }

        let side = sunward_side(flight_bearing_deg, sun.azimuth_deg);
        let (confidence, view) = band(sun.altitude_deg);
        let label = match side {
            SeatSide::Left => "Left",
            _ => "Right",
        };

        SeatRecommendation {
            side,
            reason: format!("{} side faces the sun for {}", label, view),
            confidence,
        }
    }
}

/// Compass bearings the left and right windows look out along
pub fn window_bearings(flight_bearing_deg: f64) -> (f64, f64) {
    (
        normalize_degrees(flight_bearing_deg + 270.0),
        normalize_degrees(flight_bearing_deg + 90.0),
    )
}

/// Window whose outward bearing is nearest the sun
pub fn sunward_side(flight_bearing_deg: f64, sun_azimuth_deg: f64) -> SeatSide {
    let (left_bearing, right_bearing) = window_bearings(flight_bearing_deg);
    let left_angle = angular_difference(left_bearing, sun_azimuth_deg);
    let right_angle = angular_difference(right_bearing, sun_azimuth_deg);

    if left_angle < right_angle {
        SeatSide::Left
    } else if right_angle < left_angle {
        SeatSide::Right
    } else {
        TIE_BREAK_SIDE
    }
}

fn band(altitude_deg: f64) -> (Confidence, &'static str) {
    if altitude_deg > HIGH_SUN_DEG {
        (Confidence::High, "optimal overhead lighting and scenic views")
    } else if altitude_deg > LOW_SUN_DEG {
        (
            Confidence::Medium,
            "beautiful side lighting and enhanced scenic views",
        )
    } else {
        (Confidence::High, "spectacular sunrise/sunset views")
    }
}
