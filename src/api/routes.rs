use std::sync::Arc;

use axum::{
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    costing::{calculate_material_cost, check_compatibility},
    market::{market_radar, search_market, RadarResponse, SearchResponse},
    models::{Project, ProjectCreate, ProjectUpdate},
    tools::{
        projects::{self, DeleteProjectResponse, ListProjectsResponse},
        status::ServiceStatus,
    },
};

use super::{error::AppError, state::State};

type AppState = AxumState<Arc<State>>;

/// Body of the cost calculation request; every field is required
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRequest {
    pub purchase_price: f64,
    pub purchase_amount: f64,
    pub purchase_unit: String,
    pub recipe_amount: f64,
    pub recipe_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResponse {
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    pub status: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    pub delta: i64,
}

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "MarketLens Brain is Online" }))
}

pub async fn calculate_cost_handler(Json(material): Json<MaterialRequest>) -> Json<CostResponse> {
    if let Some(mismatch) = check_compatibility(&material.purchase_unit, &material.recipe_unit) {
        warn!(
            "Cost requested across unit categories: '{}' ({}) vs '{}' ({})",
            mismatch.purchase_unit,
            mismatch.purchase_category.as_str(),
            mismatch.recipe_unit,
            mismatch.recipe_category.as_str(),
        );
    }

    let cost = calculate_material_cost(
        material.purchase_price,
        material.purchase_amount,
        &material.purchase_unit,
        material.recipe_amount,
        &material.recipe_unit,
    );
    debug!("Material cost {:?} -> {}", material, cost);

    Json(CostResponse { cost })
}

pub async fn search_handler(
    AxumState(state): AppState,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    Json(search_market(state.market.as_ref(), &params.query).await)
}

pub async fn market_radar_handler(AxumState(state): AppState) -> Json<RadarResponse> {
    Json(market_radar(state.market.as_ref()).await)
}

pub async fn status_handler(AxumState(state): AppState) -> Json<ServiceStatus> {
    Json(state.status_tracker.get_status())
}

// ============================================================================
// Projects
// ============================================================================

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Project {id} not found"))
}

pub async fn list_projects_handler(
    AxumState(state): AppState,
    Query(params): Query<ListProjectsParams>,
) -> Result<Json<ListProjectsResponse>, AppError> {
    let db = state.database.clone();
    let response = tokio::task::spawn_blocking(move || {
        projects::list_projects(&db, params.status.as_deref(), params.limit, params.offset)
    })
    .await??;

    Ok(Json(response))
}

pub async fn create_project_handler(
    AxumState(state): AppState,
    Json(data): Json<ProjectCreate>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.database.clone();
    let project = tokio::task::spawn_blocking(move || projects::create_project(&db, data)).await??;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project_handler(
    AxumState(state): AppState,
    Path(id): Path<i64>,
) -> Result<Json<Project>, AppError> {
    let db = state.database.clone();
    let project = tokio::task::spawn_blocking(move || projects::get_project(&db, id)).await??;

    project.map(Json).ok_or_else(|| not_found(id))
}

pub async fn update_project_handler(
    AxumState(state): AppState,
    Path(id): Path<i64>,
    Json(data): Json<ProjectUpdate>,
) -> Result<Json<Project>, AppError> {
    let db = state.database.clone();
    let project =
        tokio::task::spawn_blocking(move || projects::update_project(&db, id, data)).await??;

    project.map(Json).ok_or_else(|| not_found(id))
}

pub async fn adjust_stock_handler(
    AxumState(state): AppState,
    Path(id): Path<i64>,
    Json(adjustment): Json<StockAdjustment>,
) -> Result<Json<Project>, AppError> {
    let db = state.database.clone();
    let project = tokio::task::spawn_blocking(move || {
        projects::adjust_project_stock(&db, id, adjustment.delta)
    })
    .await??;

    project.map(Json).ok_or_else(|| not_found(id))
}

pub async fn delete_project_handler(
    AxumState(state): AppState,
    Path(id): Path<i64>,
) -> Result<Json<DeleteProjectResponse>, AppError> {
    let db = state.database.clone();
    let deleted = tokio::task::spawn_blocking(move || projects::delete_project(&db, id)).await??;

    deleted.map(Json).ok_or_else(|| not_found(id))
}
