use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::catalog_controller::CatalogController;
use crate::dto::directory_dto::{CatalogStatusResponse, CoverageAuditResponse, DirectoryResponse};
use crate::services::directory::DirectoryFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/service-points", get(get_service_points))
        .route("/catalog/status", get(catalog_status))
        .route("/catalog/reload", post(reload_catalog))
        .route("/coverage/audit", get(coverage_audit))
}

async fn get_service_points(
    State(state): State<AppState>,
    Query(filter): Query<DirectoryFilter>,
) -> Result<Json<DirectoryResponse>, AppError> {
    let controller = CatalogController::new(state);
    let response = controller.directory(filter).await?;
    Ok(Json(response))
}

async fn catalog_status(State(state): State<AppState>) -> Json<CatalogStatusResponse> {
    let controller = CatalogController::new(state);
    Json(controller.status().await)
}

async fn reload_catalog(State(state): State<AppState>) -> Json<CatalogStatusResponse> {
    let controller = CatalogController::new(state);
    Json(controller.reload().await)
}

async fn coverage_audit(State(state): State<AppState>) -> Result<Json<CoverageAuditResponse>, AppError> {
    let controller = CatalogController::new(state);
    let response = controller.audit().await?;
    Ok(Json(response))
}
