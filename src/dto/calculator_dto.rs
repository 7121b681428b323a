use serde::{Deserialize, Serialize};

use crate::dto::tariff_dto::WeightInput;
use crate::models::city::CityRef;
use crate::models::tariff::TariffType;
use crate::services::eligibility::WarningView;
use crate::utils::i18n::Language;

// Selección del calculador (elegibilidad y cotización)
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorRequest {
    pub origin: Option<CityRef>,
    pub destination: Option<CityRef>,
    pub tariff_type: Option<TariffType>,
    pub weight: Option<WeightInput>,
    pub language: Option<Language>,
}

// Respuesta de elegibilidad
#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub disabled: bool,
    pub warning: WarningView,
    /// Estado de la carga de puntos de servicio
    pub coverage: &'static str,
    pub language: Language,
}
