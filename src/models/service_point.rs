use serde::{Deserialize, Serialize};

/// Tipo de punto de servicio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServicePointKind {
    /// Oficina / punto de entrega con personal
    #[serde(rename = "POST_OFFICE", alias = "OFFICE")]
    Office,
    /// Postamat (casillero automático)
    #[serde(rename = "LOCKER", alias = "POSTAMAT")]
    Locker,
}

impl ServicePointKind {
    /// Valor del parámetro `type` en la API upstream
    pub fn upstream_type(self) -> &'static str {
        match self {
            ServicePointKind::Office => "POST_OFFICE",
            ServicePointKind::Locker => "LOCKER",
        }
    }
}

/// Coordenadas geográficas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Upstream usa `null` o `0` cuando no hay coordenadas
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 && lat.is_finite() && lon.is_finite() => {
                Some(Self { lat, lon })
            }
            _ => None,
        }
    }
}

/// Punto de recogida (oficina o postamat) ya normalizado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePoint {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: ServicePointKind,
    pub status: String,
}

/// Registro de almacén tal como llega de upstream (`/admin/warehouses`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<ServicePointKind>,
}

impl WarehouseRecord {
    /// Convierte el registro; `requested` es el tipo pedido a upstream y se usa
    /// cuando el registro no trae `type`.
    pub fn into_service_point(self, requested: ServicePointKind) -> ServicePoint {
        ServicePoint {
            id: self.id,
            name: self.name.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            address: self.address.filter(|a| !a.trim().is_empty()),
            coordinates: Coordinates::from_parts(self.lat, self.lon),
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            kind: self.kind.unwrap_or(requested),
            status: self.status.unwrap_or_else(|| "active".to_string()),
        }
    }
}
