//! Transport backend HTTP client.
//!
//! Every endpoint answers with an envelope `{"status": "success", "data": ...}`.
//! Callers treat any error as "backend unavailable" and fall back to local data.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{Coordinate, RouteId, RouteOption, RouteStatus, StatusCode, Stop};

use super::error::BackendError;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Search radius used for nearby stops when the caller has no preference.
pub const DEFAULT_STOP_RADIUS_M: u32 = 1000;

/// Configuration for the transport backend client.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:8083`
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRecord {
    id: RouteId,
    status: StatusCode,
    #[serde(default)]
    delay_minutes: Option<u32>,
}

/// Client for the optional transport backend.
#[derive(Debug, Clone)]
pub struct TransportBackendClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TransportBackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Route options between two points.
    pub async fn fetch_options(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Vec<RouteOption>, BackendError> {
        self.get(
            "/routes/options",
            &[
                ("fromLat", from.latitude().to_string()),
                ("fromLng", from.longitude().to_string()),
                ("toLat", to.latitude().to_string()),
                ("toLng", to.longitude().to_string()),
            ],
        )
        .await
    }

    /// Stops within `radius_m` metres of a point.
    pub async fn nearby_stops(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Stop>, BackendError> {
        self.get(
            "/location/nearbyStops",
            &[
                ("lat", at.latitude().to_string()),
                ("lng", at.longitude().to_string()),
                ("radius", radius_m.to_string()),
            ],
        )
        .await
    }

    /// Live status of the given routes. Routes the backend does not mention
    /// are absent from the map.
    pub async fn fetch_statuses(
        &self,
        ids: &[RouteId],
    ) -> Result<HashMap<RouteId, RouteStatus>, BackendError> {
        let joined = ids
            .iter()
            .map(RouteId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let records: Vec<StatusRecord> = self.get("/routes/status", &[("ids", joined)]).await?;
        statuses_from_records(records)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| BackendError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        decode_envelope(&body)
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| BackendError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    if envelope.status != "success" {
        return Err(BackendError::Unsuccessful(envelope.status));
    }

    envelope.data.ok_or_else(|| BackendError::Json {
        message: "missing data".to_string(),
        body: None,
    })
}

fn statuses_from_records(
    records: Vec<StatusRecord>,
) -> Result<HashMap<RouteId, RouteStatus>, BackendError> {
    records
        .into_iter()
        .map(|r| {
            RouteStatus::from_parts(r.status, r.delay_minutes)
                .map(|status| (r.id, status))
                .map_err(|e| BackendError::InvalidRecord(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_options_envelope() {
        let body = r#"{
            "status": "success",
            "data": [{
                "id": "bus_route_2",
                "transportType": "bus",
                "routeName": "Route 2 to Galle",
                "routeNumber": "2",
                "estimatedDuration": 180,
                "walkingDistance": 200,
                "stops": [],
                "status": "delayed",
                "delayMinutes": 12
            }]
        }"#;

        let options: Vec<RouteOption> = decode_envelope(body).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].status.delay_minutes(), Some(12));
    }

    #[test]
    fn unsuccessful_envelope_is_an_error() {
        let err = decode_envelope::<Vec<Stop>>(r#"{"status": "error"}"#).unwrap_err();
        assert!(matches!(err, BackendError::Unsuccessful(s) if s == "error"));
    }

    #[test]
    fn invalid_option_fails_decoding() {
        let body = r#"{"status": "success", "data": [{
            "id": "x", "transportType": "bus", "routeName": "X", "routeNumber": "1",
            "estimatedDuration": 1, "walkingDistance": 1, "status": "cancelled",
            "delayMinutes": 4
        }]}"#;
        assert!(matches!(
            decode_envelope::<Vec<RouteOption>>(body),
            Err(BackendError::Json { .. })
        ));
    }

    #[test]
    fn status_records() {
        let body = r#"{"status": "success", "data": [
            {"id": "a", "status": "on_time"},
            {"id": "b", "status": "delayed", "delayMinutes": 20},
            {"id": "c", "status": "cancelled", "delayMinutes": null}
        ]}"#;
        let records: Vec<StatusRecord> = decode_envelope(body).unwrap();
        let statuses = statuses_from_records(records).unwrap();

        assert_eq!(statuses[&RouteId::new("a").unwrap()], RouteStatus::OnTime);
        assert_eq!(statuses[&RouteId::new("b").unwrap()].delay_minutes(), Some(20));
        assert!(statuses[&RouteId::new("c").unwrap()].is_cancelled());
    }

    #[test]
    fn inconsistent_status_record() {
        let records = vec![StatusRecord {
            id: RouteId::new("a").unwrap(),
            status: StatusCode::Delayed,
            delay_minutes: None,
        }];
        assert!(matches!(
            statuses_from_records(records),
            Err(BackendError::InvalidRecord(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_http_error() {
        let client = TransportBackendClient::new(
            BackendConfig::new("http://127.0.0.1:1/").with_timeout(2),
        )
        .unwrap();
        let here = Coordinate::new(6.9344, 79.8441).unwrap();

        let err = client.nearby_stops(here, DEFAULT_STOP_RADIUS_M).await.unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
    }
}
