/// Great-circle geometry between two airports
use crate::domain::{Coordinate, FlightGeometry};
use crate::utils::{central_angle, haversine_km, normalize_degrees, normalize_longitude, round1};

/// Average cruise speed used for duration estimates
pub const DEFAULT_CRUISE_SPEED_KMH: f64 = 900.0;

/// Central angle (rad) below which two coordinates are the same place
const COINCIDENT_EPSILON: f64 = 1e-12;

/// Computes distance, bearing, midpoint and duration for a route.
///
/// Inputs are not range-checked here; callers validate coordinates first.
#[derive(Debug, Clone, Copy)]
pub struct FlightGeometryCalculator {
    cruise_speed_kmh: f64,
}

impl Default for FlightGeometryCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_CRUISE_SPEED_KMH)
    }
}

impl FlightGeometryCalculator {
    pub fn new(cruise_speed_kmh: f64) -> Self {
        Self { cruise_speed_kmh }
    }

    pub fn cruise_speed_kmh(&self) -> f64 {
        self.cruise_speed_kmh
    }

    /// Full geometry summary, distance and bearing rounded to 0.1
    pub fn calculate(&self, departure: Coordinate, arrival: Coordinate) -> FlightGeometry {
        let distance = distance_km(departure, arrival);
        let bearing = initial_bearing_deg(departure, arrival);
        let midpoint = midpoint(departure, arrival);

        FlightGeometry {
            distance_km: round1(distance),
            initial_bearing_deg: normalize_degrees(round1(bearing)),
            midpoint,
            estimated_duration_minutes: self.duration_minutes(distance),
        }
    }

    /// Minutes at cruise speed, rounded to the nearest minute
    pub fn duration_minutes(&self, distance_km: f64) -> u32 {
        if self.cruise_speed_kmh.is_nan() || self.cruise_speed_kmh <= 0.0 || !distance_km.is_finite()
        {
            return 0;
        }
        (distance_km / self.cruise_speed_kmh * 60.0).round().max(0.0) as u32
    }
}

/// Haversine distance in km
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    haversine_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// True when `a` and `b` name the same physical point, e.g. longitude 180 and -180
pub fn is_coincident(a: Coordinate, b: Coordinate) -> bool {
    a == b || central_angle(a.latitude, a.longitude, b.latitude, b.longitude) < COINCIDENT_EPSILON
}

/// Forward azimuth from `a` towards `b` in [0, 360).
///
/// Coincident points have no defined direction and report 0 (due north).
pub fn initial_bearing_deg(a: Coordinate, b: Coordinate) -> f64 {
    if is_coincident(a, b) {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point on the great circle halfway between `a` and `b`
pub fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    if is_coincident(a, b) {
        return a;
    }
    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let bx = lat2.cos() * dlon.cos();
    let by = lat2.cos() * dlon.sin();
    let mid_lat = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
    let mid_lon = lon1 + by.atan2(lat1.cos() + bx);

    Coordinate::new(mid_lat.to_degrees(), normalize_longitude(mid_lon.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEL: Coordinate = Coordinate::new(28.5562, 77.1000);
    const JFK: Coordinate = Coordinate::new(40.6413, -73.7781);
    const LHR: Coordinate = Coordinate::new(51.4700, -0.4543);
    const SYD: Coordinate = Coordinate::new(-33.9399, 151.1753);

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [(DEL, JFK), (LHR, SYD), (SYD, JFK), (LHR, DEL)];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_delhi_to_new_york() {
        let geometry = FlightGeometryCalculator::default().calculate(DEL, JFK);
        assert!((geometry.distance_km - 11_760.0).abs() < 50.0);
        assert!((geometry.estimated_duration_minutes as i64 - 784).abs() <= 10);
        assert!((0.0..360.0).contains(&geometry.initial_bearing_deg));
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((initial_bearing_deg(origin, Coordinate::new(10.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing_deg(origin, Coordinate::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing_deg(origin, Coordinate::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing_deg(origin, Coordinate::new(0.0, -10.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_is_not_simply_reversed() {
        let forward = initial_bearing_deg(LHR, JFK);
        let back = initial_bearing_deg(JFK, LHR);
        assert!((normalize_degrees(forward + 180.0) - back).abs() > 1.0);
    }

    #[test]
    fn test_midpoint_of_same_point() {
        assert_eq!(midpoint(LHR, LHR), LHR);
    }

    #[test]
    fn test_midpoint_lies_on_arc() {
        for (a, b) in [(DEL, JFK), (LHR, SYD), (JFK, SYD)] {
            let m = midpoint(a, b);
            let total = distance_km(a, b);
            let first = distance_km(a, m);
            let second = distance_km(m, b);
            assert!((first - second).abs() < 1e-3);
            assert!((first + second - total).abs() < 1e-3);
        }
    }

    #[test]
    fn test_midpoint_across_antimeridian_stays_in_range() {
        let m = midpoint(Coordinate::new(10.0, 170.0), Coordinate::new(10.0, -170.0));
        assert!((-180.0..=180.0).contains(&m.longitude));
        assert!((m.longitude.abs() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_departure_and_arrival() {
        let geometry = FlightGeometryCalculator::default().calculate(JFK, JFK);
        assert_eq!(geometry.distance_km, 0.0);
        assert_eq!(geometry.initial_bearing_deg, 0.0);
        assert_eq!(geometry.estimated_duration_minutes, 0);
        assert_eq!(geometry.midpoint, JFK);
    }

    #[test]
    fn test_same_point_across_antimeridian() {
        let east = Coordinate::new(10.0, 180.0);
        let west = Coordinate::new(10.0, -180.0);
        assert!(is_coincident(east, west));
        assert!(!is_coincident(east, Coordinate::new(10.0, 179.9)));

        let geometry = FlightGeometryCalculator::default().calculate(east, west);
        assert_eq!(geometry.distance_km, 0.0);
        assert_eq!(geometry.initial_bearing_deg, 0.0);
        assert_eq!(geometry.estimated_duration_minutes, 0);
        assert_eq!(geometry.midpoint, east);
    }

    #[test]
    fn test_cruise_speed_is_configurable() {
        let slow = FlightGeometryCalculator::new(450.0);
        assert_eq!(slow.duration_minutes(900.0), 120);
        assert_eq!(FlightGeometryCalculator::default().duration_minutes(900.0), 60);
    }

    #[test]
    fn test_out_of_range_input_does_not_panic() {
        let geometry =
            FlightGeometryCalculator::default().calculate(Coordinate::new(123.0, 400.0), JFK);
        assert!(geometry.distance_km >= 0.0);
    }
}
