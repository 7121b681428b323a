use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::tariff_controller::TariffController;
use crate::dto::common_dto::{ListResponse, PageQuery};
use crate::dto::tariff_dto::{CalculateTariffRequest, TariffCalculationResponse};
use crate::models::city::ApiCity;
use crate::models::service_point::{ServicePoint, ServicePointKind};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_tariff_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/cities", get(get_cities))
        .route("/warehouses", get(get_warehouses))
        .route("/lockers", get(get_lockers))
        .route("/calculate-tariff", post(calculate_tariff))
}

async fn ping() -> Json<Value> {
    Json(json!({
        "message": "pong",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn get_cities(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<ApiCity>>, AppError> {
    let controller = TariffController::new(state);
    let response = controller.cities(query).await?;
    Ok(Json(response))
}

async fn get_warehouses(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<ServicePoint>>, AppError> {
    let controller = TariffController::new(state);
    let response = controller.service_points(ServicePointKind::Office, query).await?;
    Ok(Json(response))
}

async fn get_lockers(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<ServicePoint>>, AppError> {
    let controller = TariffController::new(state);
    let response = controller.service_points(ServicePointKind::Locker, query).await?;
    Ok(Json(response))
}

async fn calculate_tariff(
    State(state): State<AppState>,
    Json(request): Json<CalculateTariffRequest>,
) -> Result<Json<TariffCalculationResponse>, AppError> {
    let controller = TariffController::new(state);
    let response = controller.calculate(request).await?;
    Ok(Json(response))
}
