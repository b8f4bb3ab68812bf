use std::path::PathBuf;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod admin;
pub mod entries;
pub mod export;
pub mod stats;

/// Shared handler state: pooled DB connection and the uploads directory.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub uploads_dir: PathBuf,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: JSON API, admin trigger, CSV export,
/// uploaded files and the static frontend pages.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));
    let uploads = ServeDir::new(state.uploads_dir.clone());

    let api = Router::new()
        .route("/health", get(health))
        .route("/api/entries", get(entries::list).post(entries::create))
        .route(
            "/api/entries/:id",
            get(entries::get).put(entries::update).delete(entries::delete),
        )
        .route("/api/entries/:id/images", get(entries::list_images))
        .route("/api/stats", get(stats::food_types))
        .route("/export", get(export::download_csv))
        .route("/admin/cleanup", post(admin::cleanup))
        .with_state(state);

    api.nest_service("/uploads", uploads)
        .fallback_service(static_dir)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
