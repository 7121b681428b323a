//! Rutas HTTP
//!
//! Todas las rutas cuelgan de `/api`.

pub mod calculator_routes;
pub mod catalog_routes;
pub mod region_routes;
pub mod tariff_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_from_config;
use crate::state::AppState;

/// Crear el router de la API (sin estado aplicado)
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(tariff_routes::create_tariff_router())
        .merge(region_routes::create_region_router())
        .merge(calculator_routes::create_calculator_router())
        .merge(catalog_routes::create_catalog_router())
}

/// Aplicación completa: rutas, CORS, trazas y estado
pub fn create_app(state: AppState) -> Router {
    let cors = cors_from_config(&state.config.cors_origins);

    Router::new()
        .nest("/api", create_api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
