//! Snapshot del catálogo
//!
//! Ciudades upstream + estado de la cobertura de puntos de servicio. Se
//! construye una vez por carga y se comparte como `Arc<Catalog>`; una recarga
//! crea un snapshot nuevo en lugar de mutar el actual.

use std::sync::Arc;

use crate::models::city::CityDirectory;
use crate::services::service_point_index::{ServicePointIndex, ServicePointLookup};

/// Estado de la carga de puntos de servicio
#[derive(Debug, Clone)]
pub enum Coverage {
    /// Carga en curso; el resolvedor difiere
    Loading,
    Ready(Arc<ServicePointIndex>),
    /// La carga falló. Se evalúa como índice vacío pero sin bloquear
    Unavailable { reason: String },
}

impl Coverage {
    pub fn index(&self) -> Option<&ServicePointIndex> {
        match self {
            Coverage::Ready(index) => Some(&**index),
            Coverage::Loading | Coverage::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Coverage::Ready(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            Coverage::Loading => "loading",
            Coverage::Ready(_) => "ready",
            Coverage::Unavailable { .. } => "unavailable",
        }
    }
}

impl Default for Coverage {
    fn default() -> Self {
        Coverage::Loading
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub cities: Arc<CityDirectory>,
    pub coverage: Coverage,
}

impl Catalog {
    /// Catálogo aún sin cargar
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn ready(cities: CityDirectory, index: ServicePointIndex) -> Self {
        Self {
            cities: Arc::new(cities),
            coverage: Coverage::Ready(Arc::new(index)),
        }
    }

    pub fn unavailable(cities: CityDirectory, reason: impl Into<String>) -> Self {
        Self {
            cities: Arc::new(cities),
            coverage: Coverage::Unavailable { reason: reason.into() },
        }
    }

    /// Índice a usar por el resolvedor: `None` mientras no haya cobertura lista
    pub fn lookup(&self) -> Option<&dyn ServicePointLookup> {
        self.coverage.index().map(|index| index as &dyn ServicePointLookup)
    }

    pub fn index(&self) -> Option<&ServicePointIndex> {
        self.coverage.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::service_point::ServicePointKind;
    use crate::services::service_point_index::tests::point;

    #[test]
    fn test_loading_catalog_has_no_lookup() {
        let catalog = Catalog::loading();
        assert!(catalog.lookup().is_none());
        assert_eq!(catalog.coverage.status(), "loading");
    }

    #[test]
    fn test_unavailable_catalog_has_no_lookup() {
        let catalog = Catalog::unavailable(CityDirectory::default(), "timeout");
        assert!(catalog.lookup().is_none());
        assert!(!catalog.coverage.is_ready());
    }

    #[test]
    fn test_ready_catalog_exposes_index() {
        let index = ServicePointIndex::new(vec![point(1, "Nukus", ServicePointKind::Office)]);
        let catalog = Catalog::ready(CityDirectory::default(), index);
        let lookup = catalog.lookup().expect("index");
        assert!(lookup.has_office("Nukus"));
        assert_eq!(catalog.coverage.status(), "ready");
    }
}
