use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{AddressResult, LookupResult};
use crate::tasks::{LocationApp, TaskInfo, TASKS};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        api_error(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        api_error(rejection.status(), rejection.body_text())
    }
}

/// Runs a task on the blocking pool; provider calls are synchronous HTTP.
async fn run_task<T, F>(state: Arc<AppState>, task: F) -> Result<T, ApiError>
where
    F: FnOnce(&LocationApp) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || task(&state.app))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("task worker failed: {}", e)))
}

// ─── GET /health, GET /api/tasks ─────────────────────────────────

pub async fn health() -> &'static str {
    "ok"
}

pub async fn task_list() -> Json<&'static [TaskInfo]> {
    Json(TASKS)
}

// ─── POST /api/tasks/search_place ────────────────────────────────

#[derive(Deserialize)]
pub struct SearchRequest {
    pub place: String,
}

pub async fn search_place(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<LookupResult>, ApiError> {
    let Json(req) = payload?;
    let start = Instant::now();
    let place = req.place.clone();

    let result = run_task(state, move |app| app.search_place(&req.place)).await?;

    tracing::info!(
        %place,
        found = result.error().is_none(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "search_place"
    );
    Ok(Json(result))
}

// ─── POST /api/tasks/get_location_info ───────────────────────────

#[derive(Deserialize)]
pub struct CoordinateRequest {
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn get_location_info(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CoordinateRequest>, JsonRejection>,
) -> Result<Json<AddressResult>, ApiError> {
    let Json(CoordinateRequest { latitude, longitude }) = payload?;
    let start = Instant::now();

    let result = run_task(state, move |app| app.get_location_info(latitude, longitude)).await?;

    tracing::info!(
        latitude,
        longitude,
        found = result.error().is_none(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "get_location_info"
    );
    Ok(Json(result))
}

// ─── POST /api/tasks/generate_map ────────────────────────────────

pub async fn generate_map(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CoordinateRequest>, JsonRejection>,
) -> Result<Json<String>, ApiError> {
    let Json(CoordinateRequest { latitude, longitude }) = payload?;
    let markup = run_task(state, move |app| app.generate_map(latitude, longitude)).await?;
    tracing::info!(latitude, longitude, bytes = markup.len(), "generate_map");
    Ok(Json(markup))
}

// ─── GET /map ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MapQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub async fn map_page(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MapQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let Query(params) = query?;
    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters"));
    };
    let markup = run_task(state, move |app| app.generate_map(lat, lon)).await?;
    Ok(Html(markup))
}
