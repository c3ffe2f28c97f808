//! HTTP routes over the recipe catalog.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/recipes` | All recipes, optionally filtered by `q` and `tag` |
//! | `GET`  | `/recipes/{slug}` | One recipe by slug |
//! | `GET`  | `/debug/refresh` | Forced refetch plus source diagnostics |
//! | `GET`  | `/health` | Liveness and cache status, never fetches |

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
    Json, Router,
};
use barback_core::{Recipe, RecipeQuery};
use barback_engine::{CacheStatus, RecipeCatalog, RefreshReport};
use barback_logging::barback_info;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RecipeCatalog>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/favicon.ico", get(handle_favicon))
        .route("/health", get(handle_health))
        .route("/recipes", get(handle_list))
        .route("/recipes/{slug}", get(handle_get))
        .route("/debug/refresh", get(handle_refresh))
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    csv_url_set: bool,
    cache: CacheStatus,
}

async fn handle_index() -> Redirect {
    Redirect::temporary("/recipes")
}

async fn handle_favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        csv_url_set: state.catalog.is_configured(),
        cache: state.catalog.status(),
    })
}

async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(state.catalog.search(&query).await?))
}

async fn handle_get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    state
        .catalog
        .get(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no recipe with slug {slug:?}")))
}

async fn handle_refresh(State(state): State<AppState>) -> Result<Json<RefreshReport>, ApiError> {
    let report = state.catalog.refresh().await?;
    barback_info!(
        "Forced refresh loaded {} rows from {}",
        report.row_count,
        report.source.effective_url
    );
    Ok(Json(report))
}
