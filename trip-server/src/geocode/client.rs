//! Nominatim HTTP client.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use super::Geocoder;
use super::error::GeocodeError;
use crate::domain::Coordinate;
use crate::places::{Place, PlaceKind};

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = "trip-server/0.1 (Sri Lanka transport planner)";

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL for the service
    pub base_url: String,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Restrict forward search to these ISO country codes (comma separated)
    pub country_codes: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: Some("lk".to_string()),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for self-hosted instances and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn with_country_codes(mut self, codes: Option<String>) -> Self {
        self.country_codes = codes;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Address parts of a reverse lookup, most specific first.
#[derive(Debug, Default, Deserialize)]
struct Address {
    suburb: Option<String>,
    neighbourhood: Option<String>,
    city_district: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

/// Client for a Nominatim-compatible geocoding service.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    country_codes: Option<String>,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| GeocodeError::Api {
            status: 0,
            message: "Invalid user agent".to_string(),
        })?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country_codes: config.country_codes,
        })
    }

    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, GeocodeError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl Geocoder for NominatimClient {
    async fn reverse_geocode(&self, at: Coordinate) -> Result<String, GeocodeError> {
        let body = self
            .get_text(
                "/reverse",
                &[
                    ("format", "json".to_string()),
                    ("lat", at.latitude().to_string()),
                    ("lon", at.longitude().to_string()),
                    ("addressdetails", "1".to_string()),
                    ("zoom", "18".to_string()),
                ],
            )
            .await?;

        let response: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        label_from_reverse(response).ok_or_else(|| GeocodeError::NotFound {
            query: at.to_string(),
        })
    }

    async fn search_places(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        let mut params = vec![
            ("format", "json".to_string()),
            ("q", query.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(codes) = &self.country_codes {
            params.push(("countrycodes", codes.clone()));
        }

        let body = self.get_text("/search", &params).await?;
        let hits: Vec<SearchHit> = serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })?;

        let places: Vec<Place> = hits.into_iter().filter_map(place_from_hit).collect();
        debug!(query, results = places.len(), "Geocoder search");
        Ok(places)
    }
}

/// Pick the most specific address part, then the first segment of the
/// display name.
fn label_from_reverse(response: ReverseResponse) -> Option<String> {
    let address = response.address?;
    let display_head = response
        .display_name
        .as_deref()
        .and_then(|name| name.split(',').next())
        .map(|head| head.trim().to_string());

    [
        address.suburb,
        address.neighbourhood,
        address.city_district,
        address.city,
        address.town,
        address.village,
        address.municipality,
        address.county,
        display_head,
    ]
    .into_iter()
    .flatten()
    .find(|label| !label.is_empty())
}

/// Hits with unparseable or out-of-range coordinates are dropped.
fn place_from_hit(hit: SearchHit) -> Option<Place> {
    let lat = hit.lat.parse().ok()?;
    let lng = hit.lon.parse().ok()?;
    let coordinate = Coordinate::new(lat, lng).ok()?;
    let name = hit.display_name.split(',').next()?.trim().to_string();
    Some(Place::new(name, coordinate, PlaceKind::Other))
}
