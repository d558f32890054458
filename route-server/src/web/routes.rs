//! HTTP route handlers.

use std::path::Path;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::InvalidStationId;
use crate::planner::{RouteError, plan_route};
use crate::stations::SourceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `static_dir` is served for every path not matched by the API.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/route", post(plan))
        .route("/api/stations", get(list_stations))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan the shortest route between two stations.
async fn plan(State(state): State<AppState>, body: Bytes) -> Result<Json<RouteResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: RouteRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "Rejected route request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;
    let query = req.to_query()?;

    debug!(
        start = %query.start,
        end = %query.end,
        allow_special_line = query.allow_special_line,
        "Planning route"
    );

    let source = state.source.clone();
    let config = state.config.clone();
    let route = tokio::task::spawn_blocking(move || plan_route(source.as_ref(), &config, &query))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("route planning task failed: {e}"),
        })??;

    Ok(Json(RouteResponse::from_route(&route)))
}

/// List the active stations, sorted by id.
async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationListEntry>>, AppError> {
    let source = state.source.clone();
    let mut stations = tokio::task::spawn_blocking(move || source.active_stations())
        .await
        .map_err(|e| AppError::Internal {
            message: format!("station listing task failed: {e}"),
        })??;

    stations.sort_by_key(|s| s.id);
    Ok(Json(
        stations.iter().map(StationListEntry::from_station).collect(),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InvalidStationId> for AppError {
    fn from(e: InvalidStationId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::UnknownStation(_) | RouteError::NoPath { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            RouteError::DataUnavailable(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
