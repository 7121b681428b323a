use serde::{Deserialize, Serialize};

use crate::models::service_point::{Coordinates, ServicePoint};
use crate::services::coverage_audit::CoverageReport;
use crate::services::directory::{MapBounds, MapMarker};

// Respuesta del directorio de oficinas y postamats
#[derive(Debug, Serialize)]
pub struct DirectoryResponse {
    pub coverage: &'static str,
    pub total: usize,
    pub offices: usize,
    pub lockers: usize,
    pub items: Vec<ServicePoint>,
    pub markers: Vec<MapMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<MapBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinates>,
}

// Resumen tras recargar el catálogo
#[derive(Debug, Serialize)]
pub struct CatalogStatusResponse {
    pub coverage: &'static str,
    pub cities: usize,
    pub offices: usize,
    pub lockers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// Auditoría de cobertura
#[derive(Debug, Serialize)]
pub struct CoverageAuditResponse {
    pub data: CoverageReport,
}

// Query de búsqueda de ciudades
#[derive(Debug, Deserialize)]
pub struct CitySearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}
