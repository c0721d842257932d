//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::domain::{InvalidCoordinate, InvalidRouteOption, OptionsSummary, RouteId};
use crate::location::LocationFix;
use crate::notify::NotificationId;
use crate::places::{manual_origins, popular_destinations};
use crate::resolver::resolve_options;
use crate::session::SessionError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/routes/options", get(route_options))
        .route("/location/nearbyStops", get(nearby_stops))
        .route("/destinations/search", get(search_destinations))
        .route("/destinations/popular", get(popular))
        .route("/destinations/recent", get(recent))
        .route("/session", get(session_state))
        .route("/session/options", get(session_options))
        .route("/session/location", post(update_location))
        .route("/session/query", post(type_query))
        .route(
            "/session/destination",
            post(select_destination).delete(clear_destination),
        )
        .route("/session/options/:id/map", post(view_on_map))
        .route("/session/options/:id/start", post(start_journey))
        .route("/notifications", get(notifications))
        .route("/notifications/:id", delete(dismiss_notification))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Index page with origin picker and destination search.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.session.snapshot();
    let template = IndexTemplate {
        location_label: snapshot
            .current_location_label
            .unwrap_or_else(|| "Location not set".to_string()),
        origins: manual_origins().into_iter().map(|p| p.name).collect(),
        popular: popular_destinations().iter().map(PlaceView::from_place).collect(),
        recent: state
            .session
            .recent()
            .iter()
            .map(PlaceView::from_place)
            .collect(),
    };
    render(&template)
}

/// Candidate options between two points, from the built-in resolver.
async fn route_options(Query(req): Query<OptionsRequest>) -> Result<Response, AppError> {
    let (from, to) = req.endpoints()?;
    Ok(Json(ApiResponse::success(resolve_options(from, to))).into_response())
}

async fn nearby_stops(
    State(state): State<AppState>,
    Query(req): Query<NearbyStopsRequest>,
) -> Result<Response, AppError> {
    let stops = state.session.nearby_stops(req.at()?, req.radius).await;
    Ok(Json(ApiResponse::success(stops)).into_response())
}

async fn search_destinations(
    State(state): State<AppState>,
    Query(req): Query<DestinationSearchRequest>,
) -> Json<DestinationsResponse> {
    Json(DestinationsResponse {
        destinations: state.session.search(&req.q).await,
    })
}

async fn popular() -> Json<DestinationsResponse> {
    Json(DestinationsResponse {
        destinations: popular_destinations(),
    })
}

async fn recent(State(state): State<AppState>) -> Json<DestinationsResponse> {
    Json(DestinationsResponse {
        destinations: state.session.recent(),
    })
}

async fn session_state(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse::from(state.session.snapshot()))
}

/// The active options, as JSON or as an HTML fragment.
async fn session_options(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let snapshot = state.session.snapshot();

    if accepts_html(&headers) {
        let template = OptionsListTemplate {
            destination: snapshot.destination_name.unwrap_or_default(),
            loading: snapshot.loading,
            options: snapshot
                .active_options
                .iter()
                .enumerate()
                .map(|(i, o)| OptionView::from_option(o, i))
                .collect(),
            summary: OptionsSummary::from_options(&snapshot.active_options)
                .map(|s| SummaryView::from_summary(&s)),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(ApiResponse::success(snapshot.active_options)).into_response())
    }
}

async fn update_location(
    State(state): State<AppState>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let fix = LocationFix::try_from(req)?;
    state.session.update_location(fix)?;
    Ok(Json(SessionResponse::from(state.session.snapshot())))
}

async fn type_query(State(state): State<AppState>, Json(req): Json<QueryRequest>) -> StatusCode {
    state.session.type_query(req.query);
    StatusCode::NO_CONTENT
}

async fn select_destination(
    State(state): State<AppState>,
    Json(req): Json<DestinationRequest>,
) -> Result<Json<SearchStartResponse>, AppError> {
    let place = req.into_place()?;
    Ok(Json(state.session.select_destination(place).into()))
}

async fn clear_destination(State(state): State<AppState>) -> StatusCode {
    state.session.clear_search();
    StatusCode::NO_CONTENT
}

async fn view_on_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let route_id = RouteId::new(id)?;
    let path = state.session.view_on_map(&route_id)?;
    Ok(Json(path).into_response())
}

async fn start_journey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let route_id = RouteId::new(id)?;
    let option = state.session.start_journey(&route_id)?;
    Ok(Json(option).into_response())
}

/// Live notifications, as JSON or as an HTML fragment.
async fn notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let notifications = state.session.notifications();

    if accepts_html(&headers) {
        let template = NotificationsTemplate {
            notifications: notifications
                .iter()
                .map(NotificationView::from_notification)
                .collect(),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(NotificationsResponse { notifications }).into_response())
    }
}

/// Dismissing an unknown or already expired notification is not an error.
async fn dismiss_notification(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    state.session.dismiss(NotificationId(id));
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidRouteOption> for AppError {
    fn from(e: InvalidRouteOption) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DestinationRequestError> for AppError {
    fn from(e: DestinationRequestError) -> Self {
        match e {
            DestinationRequestError::UnknownPlace(_) => AppError::NotFound {
                message: e.to_string(),
            },
            DestinationRequestError::Coordinate(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::UnknownRoute(_) => AppError::NotFound {
                message: e.to_string(),
            },
            SessionError::UnknownOrigin(_) | SessionError::NoTrip => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        if status.is_server_error() {
            error!(%status, error = %message, "Request failed");
        } else {
            warn!(%status, error = %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_map_to_status() {
        let not_found = AppError::from(SessionError::UnknownRoute(RouteId::new("x").unwrap()));
        assert!(matches!(not_found, AppError::NotFound { .. }));

        let bad = AppError::from(SessionError::NoTrip);
        assert!(matches!(bad, AppError::BadRequest { .. }));
    }

    #[test]
    fn error_response_status() {
        let response = AppError::NotFound {
            message: "gone".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn html_accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_html(&headers));

        headers.insert(header::ACCEPT, "text/html,application/xhtml+xml".parse().unwrap());
        assert!(accepts_html(&headers));
    }
}
