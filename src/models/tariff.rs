//! Tipos de tarifa y precios
//!
//! El tipo de tarifa codifica qué se necesita en cada extremo del envío:
//! el primer segmento es el origen y el segundo el destino.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::service_point::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffType {
    OfficeOffice,
    OfficeDoor,
    DoorOffice,
    DoorDoor,
    OfficePostamat,
    DoorPostamat,
}

/// Lo que exige una tarifa en el origen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginRequirement {
    None,
    Office,
}

/// Lo que exige una tarifa en el destino
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationRequirement {
    None,
    Office,
    Locker,
}

impl TariffType {
    pub const ALL: [TariffType; 6] = [
        TariffType::OfficeOffice,
        TariffType::OfficeDoor,
        TariffType::DoorOffice,
        TariffType::DoorDoor,
        TariffType::OfficePostamat,
        TariffType::DoorPostamat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TariffType::OfficeOffice => "OFFICE_OFFICE",
            TariffType::OfficeDoor => "OFFICE_DOOR",
            TariffType::DoorOffice => "DOOR_OFFICE",
            TariffType::DoorDoor => "DOOR_DOOR",
            TariffType::OfficePostamat => "OFFICE_POSTAMAT",
            TariffType::DoorPostamat => "DOOR_POSTAMAT",
        }
    }

    pub fn origin_requirement(self) -> OriginRequirement {
        match self {
            TariffType::OfficeOffice | TariffType::OfficeDoor | TariffType::OfficePostamat => {
                OriginRequirement::Office
            }
            TariffType::DoorOffice | TariffType::DoorDoor | TariffType::DoorPostamat => {
                OriginRequirement::None
            }
        }
    }

    pub fn destination_requirement(self) -> DestinationRequirement {
        match self {
            TariffType::OfficeOffice | TariffType::DoorOffice => DestinationRequirement::Office,
            TariffType::OfficePostamat | TariffType::DoorPostamat => DestinationRequirement::Locker,
            TariffType::OfficeDoor | TariffType::DoorDoor => DestinationRequirement::None,
        }
    }

    /// `false` solo para puerta a puerta
    pub fn requires_service_points(self) -> bool {
        self.origin_requirement() != OriginRequirement::None
            || self.destination_requirement() != DestinationRequirement::None
    }
}

impl fmt::Display for TariffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TariffType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TariffType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("tipo de tarifa desconocido: '{}'", s))
    }
}

/// Petición de precios al proveedor upstream
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    pub from: Coordinates,
    pub to: Coordinates,
    pub weight_kg: f64,
    pub tariff_type: TariffType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierTypeInfo {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetails {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub delivery_time_min: Option<u32>,
    #[serde(default)]
    pub delivery_time_max: Option<u32>,
}

/// Una opción de precio devuelta por upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffPrice {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub courier_type: Option<CourierTypeInfo>,
    #[serde(default)]
    pub rule_id: Option<i64>,
    #[serde(default)]
    pub has_supplier: bool,
    pub price: PriceDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceList {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub list: Vec<TariffPrice>,
}

impl PriceList {
    /// Opción más barata, si hay alguna
    pub fn cheapest(&self) -> Option<&TariffPrice> {
        self.list.iter().min_by(|a, b| a.price.total.cmp(&b.price.total))
    }
}
