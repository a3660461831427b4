/// Application configuration module
use crate::geo::DEFAULT_CRUISE_SPEED_KMH;
use crate::path::{PathStrategy, DEFAULT_PATH_STEPS};
use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub airports_path: PathBuf,
    pub flight: FlightSettings,
    pub cache: CacheSettings,
    pub search_limit: usize,
}

/// Tunables for the seat recommendation pipeline
#[derive(Clone, Debug, PartialEq)]
pub struct FlightSettings {
    pub cruise_speed_kmh: f64,
    pub path_steps: usize,
    pub path_strategy: PathStrategy,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            cruise_speed_kmh: DEFAULT_CRUISE_SPEED_KMH,
            path_steps: DEFAULT_PATH_STEPS,
            path_strategy: PathStrategy::Geodesic,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CacheSettings {
    pub ttl_seconds: u64,
    pub sweep_seconds: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; used directly by tests
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:4000".to_string());
        let airports_path = lookup("AIRPORTS_DAT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/airports.dat"));

        let path_strategy = match lookup("PATH_STRATEGY") {
            Some(raw) => PathStrategy::from_str(&raw).map_err(anyhow::Error::msg)?,
            None => PathStrategy::default(),
        };

        let flight = FlightSettings {
            cruise_speed_kmh: parse_or(&lookup, "CRUISE_SPEED_KMH", DEFAULT_CRUISE_SPEED_KMH)?,
            path_steps: parse_or(&lookup, "PATH_STEPS", DEFAULT_PATH_STEPS)?,
            path_strategy,
        };
        if !flight.cruise_speed_kmh.is_finite() || flight.cruise_speed_kmh <= 0.0 {
            bail!("CRUISE_SPEED_KMH must be positive, got {}", flight.cruise_speed_kmh);
        }
        if flight.path_steps == 0 {
            bail!("PATH_STEPS must be at least 1");
        }

        let cache = CacheSettings {
            ttl_seconds: parse_or(&lookup, "AIRPORT_CACHE_TTL_SECONDS", 86_400)?, // 24h
            sweep_seconds: parse_or(&lookup, "CACHE_SWEEP_SECONDS", 3_600)?,
        };
        if cache.sweep_seconds == 0 {
            bail!("CACHE_SWEEP_SECONDS must be at least 1");
        }

        Ok(Self {
            bind_addr,
            airports_path,
            flight,
            cache,
            search_limit: parse_or(&lookup, "SEARCH_LIMIT", 6)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
