use validator::{Validate, ValidationErrors};

use crate::dto::common_dto::{ListResponse, PageQuery};
use crate::dto::tariff_dto::{CalculateTariffRequest, TariffCalculationResponse};
use crate::models::city::ApiCity;
use crate::models::service_point::{Coordinates, ServicePoint, ServicePointKind};
use crate::models::tariff::{PriceRequest, TariffType};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{parse_weight, validate_coordinates};

/// Tamaño de página por defecto del listado de ciudades
const CITIES_PAGE_SIZE: u32 = 200;

fn field_error(field: &'static str, error: validator::ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}

/// Proxies hacia el proveedor upstream
pub struct TariffController {
    state: AppState,
}

impl TariffController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn cities(&self, query: PageQuery) -> AppResult<ListResponse<ApiCity>> {
        query.validate()?;
        let size = query.size.unwrap_or(CITIES_PAGE_SIZE);
        let page = self.state.source.fetch_cities_page(query.page(), size).await?;
        log::info!("🏙️ {} ciudades devueltas", page.items.len());
        Ok(page.into())
    }

    pub async fn service_points(
        &self,
        kind: ServicePointKind,
        query: PageQuery,
    ) -> AppResult<ListResponse<ServicePoint>> {
        query.validate()?;
        let page = self
            .state
            .source
            .fetch_service_points_page(kind, query.page(), query.size())
            .await?;
        log::info!("📦 {} puntos {} devueltos", page.items.len(), kind.upstream_type());
        Ok(page.into())
    }

    /// Cálculo directo con coordenadas, sin comprobación de elegibilidad
    pub async fn calculate(&self, request: CalculateTariffRequest) -> AppResult<TariffCalculationResponse> {
        if !request.is_complete() {
            return Err(AppError::MissingFields(CalculateTariffRequest::REQUIRED_FIELDS.to_vec()));
        }

        let (Some(from_lat), Some(from_lon), Some(to_lat), Some(to_lon), Some(weight), Some(tariff)) = (
            request.from_latitude,
            request.from_longitude,
            request.to_latitude,
            request.to_longitude,
            request.weight.as_ref(),
            request.tariff_type.as_deref(),
        ) else {
            return Err(AppError::MissingFields(CalculateTariffRequest::REQUIRED_FIELDS.to_vec()));
        };

        validate_coordinates(from_lat, from_lon).map_err(|e| field_error("from", e))?;
        validate_coordinates(to_lat, to_lon).map_err(|e| field_error("to", e))?;
        let weight_kg = parse_weight(&weight.as_text()).map_err(|e| field_error("weight", e))?;
        let tariff_type: TariffType = tariff.parse().map_err(AppError::BadRequest)?;

        let price_request = PriceRequest {
            from: Coordinates { lat: from_lat, lon: from_lon },
            to: Coordinates { lat: to_lat, lon: to_lon },
            weight_kg,
            tariff_type,
        };

        log::info!("💰 Cálculo directo {} ({} kg)", tariff_type, weight_kg);
        let prices = self.state.pricing.fetch_prices(&price_request).await?;
        Ok(prices.into())
    }
}
