use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::region_controller::RegionController;
use crate::dto::common_dto::DataResponse;
use crate::dto::directory_dto::CitySearchQuery;
use crate::models::city::{Region, RegionCity};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_region_router() -> Router<AppState> {
    Router::new()
        .route("/regions", get(get_regions))
        .route("/regions/:region_id/cities", get(get_region_cities))
        .route("/cities/search", get(search_cities))
}

async fn get_regions(State(state): State<AppState>) -> Json<DataResponse<Vec<Region>>> {
    let controller = RegionController::new(state);
    Json(DataResponse::new(controller.regions()))
}

async fn get_region_cities(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> Result<Json<DataResponse<Vec<RegionCity>>>, AppError> {
    let controller = RegionController::new(state);
    let cities = controller.region_cities(&region_id)?;
    Ok(Json(DataResponse::new(cities)))
}

async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<CitySearchQuery>,
) -> Json<DataResponse<Vec<RegionCity>>> {
    let controller = RegionController::new(state);
    Json(DataResponse::new(controller.search(&query.q, query.limit)))
}
