//! Application configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::backend::BackendConfig;
use crate::geocode::GeocoderConfig;
use crate::session::SessionConfig;
use crate::simulation::{DelayConfig, DelayConfigError};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_RECENT_PATH: &str = "data/recent_destinations.json";

/// Errors from [`AppConfig::from_env`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Delays(#[from] DelayConfigError),
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub recent_path: PathBuf,
    pub geocoder: GeocoderConfig,
    /// `None` runs without a transport backend.
    pub backend: Option<BackendConfig>,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr: SocketAddr =
            parse_or(&var, "TRIP_BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let static_dir = var("TRIP_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());
        let recent_path =
            var("RECENT_DESTINATIONS_PATH").unwrap_or_else(|| DEFAULT_RECENT_PATH.to_string());

        let mut geocoder = GeocoderConfig::new();
        if let Some(url) = var("NOMINATIM_BASE_URL") {
            geocoder = geocoder.with_base_url(url);
        }

        let backend = var("TRANSPORT_BACKEND_URL").map(BackendConfig::new);

        let defaults = DelayConfig::default();
        let delays = DelayConfig::default()
            .with_delay_probability(parse_or(
                &var,
                "DELAY_PROBABILITY",
                Some(defaults.delay_probability),
            )?)
            .with_cancellation_probability(parse_or(
                &var,
                "CANCELLATION_PROBABILITY",
                Some(defaults.cancellation_probability),
            )?)
            .with_delay_range(
                parse_or(&var, "DELAY_MIN_MINUTES", Some(defaults.min_delay_mins))?,
                parse_or(&var, "DELAY_MAX_MINUTES", Some(defaults.max_delay_mins))?,
            )
            .with_check_interval(Duration::from_secs(parse_or(
                &var,
                "DELAY_CHECK_INTERVAL_SECS",
                Some(defaults.check_interval.as_secs()),
            )?));
        delays.validate()?;

        let session_defaults = SessionConfig::default();
        let latency_ms: u64 = parse_or(
            &var,
            "RESULT_LATENCY_MS",
            u64::try_from(session_defaults.result_latency.as_millis()).ok(),
        )?;
        let session = session_defaults
            .with_result_latency(Duration::from_millis(latency_ms))
            .with_delays(delays);

        Ok(Self {
            bind_addr,
            static_dir: PathBuf::from(static_dir),
            recent_path: PathBuf::from(recent_path),
            geocoder,
            backend,
            session,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => default.ok_or(ConfigError::Invalid {
            name,
            value: String::new(),
        }),
    }
}
