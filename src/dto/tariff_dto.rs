use serde::{Deserialize, Serialize};

use crate::models::tariff::{PriceList, TariffPrice};

/// Peso tal como llega del cliente: número o texto
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(f64),
    Text(String),
}

impl WeightInput {
    pub fn as_text(&self) -> String {
        match self {
            WeightInput::Number(value) => value.to_string(),
            WeightInput::Text(text) => text.clone(),
        }
    }
}

// Request del proxy de cálculo de tarifas (coordenadas ya resueltas)
#[derive(Debug, Deserialize)]
pub struct CalculateTariffRequest {
    pub from_latitude: Option<f64>,
    pub from_longitude: Option<f64>,
    pub to_latitude: Option<f64>,
    pub to_longitude: Option<f64>,
    pub weight: Option<WeightInput>,
    pub tariff_type: Option<String>,
}

impl CalculateTariffRequest {
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "from_latitude",
        "from_longitude",
        "to_latitude",
        "to_longitude",
        "weight",
        "tariff_type",
    ];

    /// Ausentes, vacíos o cero cuentan como no informados
    pub fn is_complete(&self) -> bool {
        let coordinate_ok = |value: Option<f64>| value.map_or(false, |v| v != 0.0);
        coordinate_ok(self.from_latitude)
            && coordinate_ok(self.from_longitude)
            && coordinate_ok(self.to_latitude)
            && coordinate_ok(self.to_longitude)
            && self
                .weight
                .as_ref()
                .map_or(false, |w| !w.as_text().trim().is_empty())
            && self
                .tariff_type
                .as_deref()
                .map_or(false, |t| !t.trim().is_empty())
    }
}

// Respuesta con las opciones de precio
#[derive(Debug, Serialize)]
pub struct TariffCalculationResponse {
    pub data: PriceList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest: Option<TariffPrice>,
}

impl From<PriceList> for TariffCalculationResponse {
    fn from(data: PriceList) -> Self {
        let cheapest = data.cheapest().cloned();
        Self { data, cheapest }
    }
}
