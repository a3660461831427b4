/// Main application entry point with clean architecture
use std::sync::Arc;
use std::time::Duration;
use sunside::config::AppConfig;
use sunside::handlers::AppState;
use sunside::repo::AirportRepo;
use sunside::routes::build_router;
use sunside::services::{AirportService, FlightService};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        "Configuration loaded: {} path, {} steps, cruise {} km/h",
        config.flight.path_strategy, config.flight.path_steps, config.flight.cruise_speed_kmh
    );

    // Load airport dataset
    let airport_repo = Arc::new(AirportRepo::load(&config.airports_path)?);
    info!("Airport dataset ready with {} airports", airport_repo.len());

    // Initialize services
    let flight_service = Arc::new(FlightService::new(&config.flight));
    let airport_service = Arc::new(AirportService::new(
        airport_repo,
        Duration::from_secs(config.cache.ttl_seconds),
    ));

    let state = AppState {
        flight_service,
        airport_service: airport_service.clone(),
        search_limit: config.search_limit,
    };

    // Start background tasks
    start_cache_sweeper(config.cache.sweep_seconds, airport_service);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("sunside service listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Periodically drop expired airport lookups
fn start_cache_sweeper(interval: u64, airport_service: Arc<AirportService>) {
    tokio::spawn(async move {
        info!("Starting cache sweep task (interval: {}s)", interval);
        loop {
            tokio::time::sleep(Duration::from_secs(interval)).await;
            let removed = airport_service.evict_expired();
            debug!(
                "Cache sweep removed {} entries ({} airports indexed)",
                removed,
                airport_service.airport_count()
            );
        }
    });
}
