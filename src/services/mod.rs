/// Business logic services layer
use crate::config::FlightSettings;
use crate::domain::{AirportSuggestion, Coordinate, FlightSunReport, SunSample};
use crate::errors::{ApiError, ApiResult};
use crate::geo::FlightGeometryCalculator;
use crate::path::PathInterpolator;
use crate::repo::{AirportRepo, CacheRepo};
use crate::seat::SeatRecommender;
use crate::solar::{parse_flight_datetime, SolarPositionCalculator};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on suggestions per search, whatever the caller asks for
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Seat recommendation pipeline: geometry, path, sun sampling, decision
#[derive(Debug, Clone)]
pub struct FlightService {
    geometry: FlightGeometryCalculator,
    interpolator: PathInterpolator,
    solar: SolarPositionCalculator,
    recommender: SeatRecommender,
}

impl FlightService {
    pub fn new(settings: &FlightSettings) -> Self {
        Self {
            geometry: FlightGeometryCalculator::new(settings.cruise_speed_kmh),
            interpolator: PathInterpolator::new(settings.path_strategy, settings.path_steps),
            solar: SolarPositionCalculator,
            recommender: SeatRecommender,
        }
    }

    /// Number of points every report samples
    pub fn sample_count(&self) -> usize {
        self.interpolator.steps() + 1
    }

    /// Build a full report for a route departing at `datetime` (UTC)
    pub fn report(
        &self,
        departure: Coordinate,
        arrival: Coordinate,
        datetime: &str,
    ) -> ApiResult<FlightSunReport> {
        departure.validate()?;
        arrival.validate()?;
        let when = parse_flight_datetime(datetime)?;

        let geometry = self.geometry.calculate(departure, arrival);
        let midpoint_sun = self.solar.position(geometry.midpoint, when);
        let recommendation = self
            .recommender
            .recommend(geometry.initial_bearing_deg, &midpoint_sun);

        let path = self.interpolator.interpolate(departure, arrival);
        let sun_positions: Vec<SunSample> = path
            .par_iter()
            .map(|point| SunSample {
                coordinate: point.coordinate,
                sun: self.solar.position(point.coordinate, when),
            })
            .collect();

        info!(
            "Recommendation {:?} ({:?}) for {:.1} km at bearing {:.1}, sun alt {:.1}",
            recommendation.side,
            recommendation.confidence,
            geometry.distance_km,
            geometry.initial_bearing_deg,
            midpoint_sun.altitude_deg
        );

        Ok(FlightSunReport {
            geometry,
            midpoint_sun,
            recommendation,
            sun_positions,
        })
    }
}

/// Airport lookup with a TTL cache in front of the dataset
pub struct AirportService {
    repo: Arc<AirportRepo>,
    coordinates: CacheRepo<Coordinate>,
    suggestions: CacheRepo<Vec<AirportSuggestion>>,
}

impl AirportService {
    pub fn new(repo: Arc<AirportRepo>, cache_ttl: Duration) -> Self {
        Self {
            repo,
            coordinates: CacheRepo::new(cache_ttl),
            suggestions: CacheRepo::new(cache_ttl),
        }
    }

    /// Resolve an IATA code or city name to coordinates
    pub fn resolve(&self, query: &str) -> ApiResult<Coordinate> {
        let q = query.trim();
        if q.is_empty() {
            return Err(ApiError::InvalidInput("Invalid airport query".to_string()));
        }

        let cache_key = format!("airport:{}", q.to_uppercase());
        if let Some(coords) = self.coordinates.get(&cache_key) {
            debug!("Airport cache hit for {}", cache_key);
            return Ok(coords);
        }

        let is_iata = q.len() == 3 && q.chars().all(|c| c.is_ascii_alphabetic());
        let found = if is_iata {
            self.repo.find_by_iata(q)
        } else {
            self.repo.find_by_city(&q.to_lowercase())
        };

        let coords = found
            .map(|a| a.coordinate())
            .ok_or_else(|| ApiError::NotFound(format!("Airport not found for: {}", query)))?;
        self.coordinates.put(cache_key, coords);
        Ok(coords)
    }

    /// Autocomplete: IATA prefix matches first, then city or name substring matches.
    ///
    /// `limit` is capped at `MAX_SEARCH_LIMIT` before it becomes part of the cache key.
    pub fn search(&self, query: &str, limit: usize) -> Vec<AirportSuggestion> {
        let q = query.trim().to_lowercase();
        let limit = limit.min(MAX_SEARCH_LIMIT);
        if q.is_empty() || limit == 0 {
            return Vec::new();
        }

        let cache_key = format!("search:{}:{}", q, limit);
        if let Some(cached) = self.suggestions.get(&cache_key) {
            debug!("Returning {} cached suggestions for '{}'", cached.len(), q);
            return cached;
        }

        let airports = self.repo.all();
        let iata_matches = airports
            .iter()
            .filter(|a| a.iata.to_lowercase().starts_with(&q));
        let text_matches = airports.iter().filter(|a| {
            !a.iata.to_lowercase().starts_with(&q)
                && (a.city.to_lowercase().contains(&q) || a.name.to_lowercase().contains(&q))
        });

        let results: Vec<AirportSuggestion> = iata_matches
            .chain(text_matches)
            .take(limit)
            .map(AirportSuggestion::from)
            .collect();

        debug!("Found {} suggestions for '{}'", results.len(), q);
        self.suggestions.put(cache_key, results.clone());
        results
    }

    /// Sweep both caches, returning the number of entries removed
    pub fn evict_expired(&self) -> usize {
        self.coordinates.evict_expired() + self.suggestions.evict_expired()
    }

    pub fn airport_count(&self) -> usize {
        self.repo.len()
    }
}
