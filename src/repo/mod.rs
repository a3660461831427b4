/// Repository layer: airport dataset and lookup cache
use crate::domain::Airport;
use crate::errors::ApiResult;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// OpenFlights marker for a missing field
const NULL_FIELD: &str = "\\N";

/// In-memory airport dataset, read once at startup
#[derive(Debug, Default)]
pub struct AirportRepo {
    airports: Vec<Airport>,
}

impl AirportRepo {
    pub fn new(airports: Vec<Airport>) -> Self {
        Self { airports }
    }

    /// Load an OpenFlights `airports.dat` file
    pub fn load(path: &Path) -> ApiResult<Self> {
        info!("Loading airport dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse headerless OpenFlights CSV, skipping rows without IATA code or coordinates
    pub fn from_reader<R: Read>(reader: R) -> ApiResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut airports = Vec::new();
        let mut skipped = 0usize;
        for record in csv_reader.records() {
            match parse_record(&record?) {
                Some(airport) => airports.push(airport),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("Skipped {} airport rows without IATA code or coordinates", skipped);
        }
        info!("Parsed {} airports", airports.len());
        Ok(Self { airports })
    }

    pub fn all(&self) -> &[Airport] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Case-insensitive IATA code match
    pub fn find_by_iata(&self, code: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|a| a.iata.eq_ignore_ascii_case(code))
    }

    /// First airport whose city contains `needle` (already lowercased)
    pub fn find_by_city(&self, needle: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|a| a.city.to_lowercase().contains(needle))
    }
}

fn field(record: &csv::StringRecord, idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != NULL_FIELD)
}

fn parse_record(record: &csv::StringRecord) -> Option<Airport> {
    let iata = field(record, 4)?;
    let lat = field(record, 6)?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let lon = field(record, 7)?.parse::<f64>().ok().filter(|v| v.is_finite())?;

    Some(Airport {
        id: field(record, 0).unwrap_or_default().to_string(),
        name: field(record, 1).unwrap_or_default().to_string(),
        city: field(record, 2).unwrap_or_default().to_string(),
        country: field(record, 3).unwrap_or_default().to_string(),
        iata: iata.to_string(),
        icao: field(record, 5).map(str::to_string),
        lat,
        lon,
    })
}

struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

/// Keyed cache with a fixed time-to-live.
///
/// Expired entries are dropped lazily on `get` and in bulk by `evict_expired`.
pub struct CacheRepo<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> CacheRepo<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // Entries are plain values; a panic elsewhere cannot leave them half-written
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_live(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.duration_since(entry.stored_at) < self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if self.is_live(entry, now) {
            return Some(entry.value.clone());
        }
        entries.remove(key);
        None
    }

    pub fn put(&self, key: impl Into<String>, value: V) {
        self.lock().insert(
            key.into(),
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_AIRPORTS_DAT: &str = r#"2997,"Indira Gandhi International Airport","Delhi","India","DEL","VIDP",28.5665,77.103104,777,5.5,"N","Asia/Calcutta","airport","OurAirports"
3797,"John F Kennedy International Airport","New York","United States","JFK","KJFK",40.63980103,-73.77890015,13,-5,"A","America/New_York","airport","OurAirports"
9999,"Closed Field","Nowhere","Atlantis","\N","XXXX",10.0,10.0,0,0,"U","\N","airport","OurAirports"
8888,"Broken Coordinates","Somewhere","Atlantis","BRK","YYYY",abc,10.0,0,0,"U","\N","airport","OurAirports"
507,"London Heathrow Airport","London","United Kingdom","LHR","EGLL",51.4706,-0.461941,83,0,"E","Europe/London","airport","OurAirports"
"#;
