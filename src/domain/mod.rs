/// Domain models for the application
use crate::errors::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reject non-finite or out-of-range values
    pub fn validate(&self) -> ApiResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ApiError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ApiError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Great-circle summary of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightGeometry {
    pub distance_km: f64,
    pub initial_bearing_deg: f64,
    pub midpoint: Coordinate,
    pub estimated_duration_minutes: u32,
}

/// A sampled position along the route, `index` counting from departure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub index: usize,
    pub coordinate: Coordinate,
}

/// Sun position as seen from one observer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    #[serde(rename = "azimuth")]
    pub azimuth_deg: f64,
    #[serde(rename = "altitude")]
    pub altitude_deg: f64,
    #[serde(rename = "isDaytime")]
    pub is_daytime: bool,
}

impl SolarPosition {
    /// Build from already-normalized angles; daytime means strictly above the horizon
    pub fn new(azimuth_deg: f64, altitude_deg: f64) -> Self {
        Self {
            azimuth_deg,
            altitude_deg,
            is_daytime: altitude_deg > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatSide {
    Left,
    Right,
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeatRecommendation {
    pub side: SeatSide,
    pub reason: String,
    pub confidence: Confidence,
}

/// Sun position paired with the path point it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunSample {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(flatten)]
    pub sun: SolarPosition,
}

/// Everything computed for one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSunReport {
    pub geometry: FlightGeometry,
    pub midpoint_sun: SolarPosition,
    pub recommendation: SeatRecommendation,
    pub sun_positions: Vec<SunSample>,
}

#[derive(Serialize)]
struct FlightInfo {
    distance: f64,
    bearing: f64,
    duration: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportBody<'a> {
    recommendation: SeatSide,
    reason: &'a str,
    confidence: Confidence,
    flight_info: FlightInfo,
    sun_info: &'a SolarPosition,
    sun_positions: &'a [SunSample],
}

impl Serialize for FlightSunReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReportBody {
            recommendation: self.recommendation.side,
            reason: &self.recommendation.reason,
            confidence: self.recommendation.confidence,
            flight_info: FlightInfo {
                distance: self.geometry.distance_km,
                bearing: self.geometry.initial_bearing_deg,
                duration: self.geometry.estimated_duration_minutes,
            },
            sun_info: &self.midpoint_sun,
            sun_positions: &self.sun_positions,
        }
        .serialize(serializer)
    }
}

/// Airport record from the OpenFlights dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: String,
    pub icao: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Airport {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Autocomplete entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportSuggestion {
    pub iata: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Airport> for AirportSuggestion {
    fn from(a: &Airport) -> Self {
        Self {
            iata: a.iata.clone(),
            name: a.name.clone(),
            city: a.city.clone(),
            country: a.country.clone(),
            lat: a.lat,
            lon: a.lon,
        }
    }
}

/// Body of a recommendation request
#[derive(Debug, Default, Deserialize)]
pub struct FlightRequest {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub datetime: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinate::new(-90.0, -180.0).validate().is_ok());
    }

    #[test]
    fn test_coordinate_validate_rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(91.0, 0.0).validate(),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.5).validate(),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_solar_position_zero_altitude_is_night() {
        assert!(!SolarPosition::new(180.0, 0.0).is_daytime);
        assert!(!SolarPosition::new(180.0, -0.1).is_daytime);
        assert!(SolarPosition::new(180.0, 0.1).is_daytime);
    }

    #[test]
    fn test_report_serializes_wire_shape() {
        let sun = SolarPosition::new(120.5, 33.2);
        let report = FlightSunReport {
            geometry: FlightGeometry {
                distance_km: 343.5,
                initial_bearing_deg: 148.1,
                midpoint: Coordinate::new(50.2, 1.1),
                estimated_duration_minutes: 23,
            },
            midpoint_sun: sun,
            recommendation: SeatRecommendation {
                side: SeatSide::Left,
                reason: "Left side faces the sun".to_string(),
                confidence: Confidence::Medium,
            },
            sun_positions: vec![SunSample {
                coordinate: Coordinate::new(51.5, -0.1),
                sun,
            }],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "recommendation": "left",
                "reason": "Left side faces the sun",
                "confidence": "medium",
                "flightInfo": { "distance": 343.5, "bearing": 148.1, "duration": 23 },
                "sunInfo": { "azimuth": 120.5, "altitude": 33.2, "isDaytime": true },
                "sunPositions": [
                    { "lat": 51.5, "lon": -0.1, "azimuth": 120.5, "altitude": 33.2, "isDaytime": true }
                ]
            })
        );
    }

    #[test]
    fn test_either_serializes_lowercase() {
        assert_eq!(serde_json::to_value(SeatSide::Either).unwrap(), "either");
        assert_eq!(serde_json::to_value(Confidence::Low).unwrap(), "low");
    }
}
