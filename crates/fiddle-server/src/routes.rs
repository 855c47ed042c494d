//! HTTP routes for the fiddle server.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::get,
};
use fiddle_core::{FiddleResolver, Library, ResolvedFiddleData};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::error::ServerResult;

/// Application state shared across handlers.
pub struct AppState {
    /// Resolver backed by the fiddle store and the library catalog.
    pub resolver: Arc<FiddleResolver>,
}

/// Inline source parameters: `zrc` is a compressed token, `source` plain text.
#[derive(Debug, Default, Deserialize)]
pub struct InlineQuery {
    pub zrc: Option<String>,
    pub source: Option<String>,
}

/// Library listing parameters.
#[derive(Debug, Default, Deserialize)]
pub struct LibraryQuery {
    /// Language-version tag to filter by.
    pub version: Option<String>,
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/fiddle", get(inline_fiddle_handler))
        .route("/api/fiddle/{id}", get(fiddle_handler))
        .route("/api/fiddle/{id}/{version}", get(fiddle_version_handler))
        .route("/api/libraries", get(libraries_handler))
        .route("/raw", get(inline_raw_handler))
        .route("/raw/{id}/{version}", get(raw_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Unsaved fiddle from query parameters or the default template.
async fn inline_fiddle_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InlineQuery>,
) -> Json<ResolvedFiddleData> {
    Json(resolve_inline(&state, &query))
}

/// `/api/fiddle/{id}` resolves version 0.
async fn fiddle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<ResolvedFiddleData>> {
    let data = state.resolver.resolve(&id, 0, None).await?;
    Ok(Json(data))
}

async fn fiddle_version_handler(
    State(state): State<Arc<AppState>>,
    Path((id, version)): Path<(String, u32)>,
) -> ServerResult<Json<ResolvedFiddleData>> {
    let data = state.resolver.resolve(&id, version, None).await?;
    Ok(Json(data))
}

/// Catalog listing, optionally filtered by language version.
async fn libraries_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LibraryQuery>,
) -> Json<Vec<Library>> {
    let catalog = state.resolver.catalog().snapshot();
    let libraries = match query.version.as_deref() {
        Some(tag) => catalog.list_for(tag),
        None => catalog.list_all().to_vec(),
    };
    Json(libraries)
}

/// Saved fiddle as annotated standalone source.
async fn raw_handler(
    State(state): State<Arc<AppState>>,
    Path((id, version)): Path<(String, u32)>,
) -> ServerResult<String> {
    let data = state.resolver.resolve(&id, version, None).await?;
    Ok(fiddle_core::serialize(&data))
}

/// Inline fiddle as annotated standalone source.
async fn inline_raw_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InlineQuery>,
) -> String {
    fiddle_core::serialize(&resolve_inline(&state, &query))
}

fn resolve_inline(state: &AppState, query: &InlineQuery) -> ResolvedFiddleData {
    state
        .resolver
        .resolve_inline(query.zrc.as_deref(), query.source.as_deref())
}
