use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_server::backend::TransportBackendClient;
use trip_server::config::AppConfig;
use trip_server::geocode::{CacheConfig, CachedGeocoder, NominatimClient};
use trip_server::places::RecentDestinations;
use trip_server::session::TripSession;
use trip_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Geocoder with result cache
    let nominatim =
        NominatimClient::new(config.geocoder.clone()).expect("Failed to create geocoding client");
    let geocoder = CachedGeocoder::new(nominatim, &CacheConfig::default());

    let mut builder = TripSession::builder(geocoder)
        .with_config(config.session.clone())
        .with_recent(RecentDestinations::new(&config.recent_path));

    match &config.backend {
        Some(backend_config) => {
            let backend = TransportBackendClient::new(backend_config.clone())
                .expect("Failed to create transport backend client");
            info!(url = %backend_config.base_url, "Using transport backend");
            builder = builder.with_backend(backend);
        }
        None => warn!("TRANSPORT_BACKEND_URL not set, using built-in route options"),
    }

    let state = AppState::new(builder.build());
    let static_dir = config.static_dir.to_string_lossy();
    let app = create_router(state, &static_dir);

    let addr = config.bind_addr;
    info!("Trip planner listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
