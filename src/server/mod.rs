//! Local host: serves the tasks over HTTP for running the app on one machine.

mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::tasks::LocationApp;

pub fn build_router(app: LocationApp) -> Router {
    let state = Arc::new(AppState { app });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/map", get(handlers::map_page))
        .route("/api/tasks", get(handlers::task_list))
        .route("/api/tasks/search_place", post(handlers::search_place))
        .route("/api/tasks/get_location_info", post(handlers::get_location_info))
        .route("/api/tasks/generate_map", post(handlers::generate_map))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start(app: LocationApp, host: &str, port: u16) -> std::io::Result<()> {
    let router = build_router(app);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("location app listening on http://{}", addr);

    axum::serve(listener, router).await
}
