/// Route sampling between departure and arrival
use crate::domain::{Coordinate, PathPoint};
use crate::geo::is_coincident;
use crate::utils::central_angle;
use std::fmt;
use std::str::FromStr;

/// Default number of interpolation steps; the path holds steps + 1 points
pub const DEFAULT_PATH_STEPS: usize = 64;

/// Below this, sin of the central angle is treated as zero
const SIN_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStrategy {
    /// Spherical linear interpolation along the great circle
    #[default]
    Geodesic,
    /// Independent linear interpolation of latitude and longitude
    Planar,
}

impl FromStr for PathStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geodesic" | "great-circle" | "slerp" => Ok(PathStrategy::Geodesic),
            "planar" | "linear" => Ok(PathStrategy::Planar),
            other => Err(format!("unknown path strategy '{}'", other)),
        }
    }
}

impl fmt::Display for PathStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStrategy::Geodesic => write!(f, "geodesic"),
            PathStrategy::Planar => write!(f, "planar"),
        }
    }
}

/// Produces `steps + 1` ordered points from departure to arrival.
///
/// The first and last points are always the exact input coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PathInterpolator {
    strategy: PathStrategy,
    steps: usize,
}

impl Default for PathInterpolator {
    fn default() -> Self {
        Self::new(PathStrategy::default(), DEFAULT_PATH_STEPS)
    }
}

impl PathInterpolator {
    /// `steps` of zero is bumped to one so both endpoints are always present
    pub fn new(strategy: PathStrategy, steps: usize) -> Self {
        Self {
            strategy,
            steps: steps.max(1),
        }
    }

    pub fn strategy(&self) -> PathStrategy {
        self.strategy
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn interpolate(&self, from: Coordinate, to: Coordinate) -> Vec<PathPoint> {
        let mut coords = if is_coincident(from, to) {
            vec![from; self.steps + 1]
        } else {
            match self.strategy {
                PathStrategy::Geodesic => geodesic(from, to, self.steps),
                PathStrategy::Planar => planar(from, to, self.steps),
            }
        };

        if let Some(first) = coords.first_mut() {
            *first = from;
        }
        if let Some(last) = coords.last_mut() {
            *last = to;
        }

        coords
            .into_iter()
            .enumerate()
            .map(|(index, coordinate)| PathPoint { index, coordinate })
            .collect()
    }
}

fn fractions(steps: usize) -> impl Iterator<Item = f64> {
    (0..=steps).map(move |i| i as f64 / steps as f64)
}

fn planar(from: Coordinate, to: Coordinate, steps: usize) -> Vec<Coordinate> {
    fractions(steps)
        .map(|f| {
            Coordinate::new(
                from.latitude + (to.latitude - from.latitude) * f,
                from.longitude + (to.longitude - from.longitude) * f,
            )
        })
        .collect()
}

fn geodesic(from: Coordinate, to: Coordinate, steps: usize) -> Vec<Coordinate> {
    // Meridian routes: the great circle is the meridian itself
    if from.longitude == to.longitude {
        return fractions(steps)
            .map(|f| {
                Coordinate::new(
                    from.latitude + (to.latitude - from.latitude) * f,
                    from.longitude,
                )
            })
            .collect();
    }

    let d = central_angle(from.latitude, from.longitude, to.latitude, to.longitude);
    let sin_d = d.sin();
    // Antipodal: no unique great circle
    if sin_d.abs() < SIN_EPSILON {
        return planar(from, to, steps);
    }

    let lat1 = from.latitude.to_radians();
    let lon1 = from.longitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let lon2 = to.longitude.to_radians();

    fractions(steps)
        .map(|f| {
            let a = ((1.0 - f) * d).sin() / sin_d;
            let b = (f * d).sin() / sin_d;
            let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
            let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
            let z = a * lat1.sin() + b * lat2.sin();
            let lat = z.atan2((x * x + y * y).sqrt());
            let lon = y.atan2(x);
            Coordinate::new(lat.to_degrees(), lon.to_degrees())
        })
        .collect()
}
