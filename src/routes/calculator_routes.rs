use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::calculator_controller::CalculatorController;
use crate::dto::calculator_dto::{CalculatorRequest, EligibilityResponse};
use crate::dto::tariff_dto::TariffCalculationResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_calculator_router() -> Router<AppState> {
    Router::new()
        .route("/eligibility", post(check_eligibility))
        .route("/calculator/quote", post(quote))
}

async fn check_eligibility(
    State(state): State<AppState>,
    Json(request): Json<CalculatorRequest>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let controller = CalculatorController::new(state);
    let response = controller.eligibility(request).await?;
    Ok(Json(response))
}

async fn quote(
    State(state): State<AppState>,
    Json(request): Json<CalculatorRequest>,
) -> Result<Json<TariffCalculationResponse>, AppError> {
    let controller = CalculatorController::new(state);
    let response = controller.quote(request).await?;
    Ok(Json(response))
}
