//! Carga paginada de ciudades y puntos de servicio
//!
//! Un único colaborador (`load_all`) recorre las páginas de cualquier listado
//! upstream. El resolvedor no sabe nada de paginación: recibe el índice ya
//! construido dentro de un `Catalog`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::models::city::{ApiCity, CityDirectory};
use crate::models::service_point::{ServicePoint, ServicePointKind};
use crate::services::catalog::Catalog;
use crate::services::service_point_index::ServicePointIndex;
use crate::utils::errors::AppResult;

/// Límite de páginas por listado, por si upstream no marca la última
pub const MAX_PAGES: u32 = 200;

/// Metadatos de paginación tal como los envía upstream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_elements: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    /// Decide si hay que pedir la página siguiente
    fn is_last(&self, page: u32, size: u32) -> bool {
        if self.items.is_empty() || self.meta.last == Some(true) {
            return true;
        }
        if let Some(total_pages) = self.meta.total_pages {
            return page + 1 >= total_pages;
        }
        (self.items.len() as u32) < size
    }
}

#[async_trait]
pub trait PageFetcher<T: Send>: Send + Sync {
    async fn fetch_page(&self, page: u32, size: u32) -> AppResult<Page<T>>;
}

/// Recorre todas las páginas de un listado
pub async fn load_all<T: Send>(fetcher: &dyn PageFetcher<T>, page_size: u32) -> AppResult<Vec<T>> {
    let size = page_size.max(1);
    let mut items = Vec::new();

    for page in 0..MAX_PAGES {
        let current = fetcher.fetch_page(page, size).await?;
        let done = current.is_last(page, size);
        items.extend(current.items);
        if done {
            return Ok(items);
        }
    }

    warn!("⚠️ Se alcanzó el límite de {} páginas; listado truncado", MAX_PAGES);
    Ok(items)
}

/// Origen de los datos del catálogo (upstream o un doble de pruebas)
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_cities_page(&self, page: u32, size: u32) -> AppResult<Page<ApiCity>>;

    async fn fetch_service_points_page(
        &self,
        kind: ServicePointKind,
        page: u32,
        size: u32,
    ) -> AppResult<Page<ServicePoint>>;
}

struct CityPages<'a> {
    source: &'a dyn CatalogSource,
}

#[async_trait]
impl PageFetcher<ApiCity> for CityPages<'_> {
    async fn fetch_page(&self, page: u32, size: u32) -> AppResult<Page<ApiCity>> {
        self.source.fetch_cities_page(page, size).await
    }
}

struct ServicePointPages<'a> {
    source: &'a dyn CatalogSource,
    kind: ServicePointKind,
}

#[async_trait]
impl PageFetcher<ServicePoint> for ServicePointPages<'_> {
    async fn fetch_page(&self, page: u32, size: u32) -> AppResult<Page<ServicePoint>> {
        self.source.fetch_service_points_page(self.kind, page, size).await
    }
}

/// Carga ciudades, oficinas y postamats en paralelo y construye el snapshot.
///
/// Nunca falla: si caen los puntos de servicio el catálogo queda
/// `Unavailable`; si caen las ciudades el directorio queda vacío.
pub async fn load_catalog(source: &dyn CatalogSource, page_size: u32) -> Catalog {
    info!("📦 Cargando catálogo (tamaño de página {})", page_size);

    let cities = CityPages { source };
    let offices = ServicePointPages { source, kind: ServicePointKind::Office };
    let lockers = ServicePointPages { source, kind: ServicePointKind::Locker };

    let (cities, offices, lockers) = futures::join!(
        load_all::<ApiCity>(&cities, page_size),
        load_all::<ServicePoint>(&offices, page_size),
        load_all::<ServicePoint>(&lockers, page_size),
    );

    let directory = match cities {
        Ok(cities) => {
            info!("🏙️ {} ciudades cargadas", cities.len());
            CityDirectory::new(cities)
        }
        Err(e) => {
            error!("❌ Error cargando ciudades: {}", e);
            CityDirectory::default()
        }
    };

    match (offices, lockers) {
        (Ok(mut offices), Ok(lockers)) => {
            info!("🏢 {} oficinas y 📮 {} postamats cargados", offices.len(), lockers.len());
            offices.extend(lockers);
            Catalog::ready(directory, ServicePointIndex::new(offices))
        }
        (Err(e), _) | (_, Err(e)) => {
            error!("❌ Error cargando puntos de servicio: {}", e);
            Catalog::unavailable(directory, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::service_point_index::tests::point;
    use crate::utils::errors::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct VecPages {
        items: Vec<u32>,
        with_meta: bool,
        calls: AtomicU32,
    }

    impl VecPages {
        fn new(count: u32, with_meta: bool) -> Self {
            Self {
                items: (0..count).collect(),
                with_meta,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl PageFetcher<u32> for VecPages {
        async fn fetch_page(&self, page: u32, size: u32) -> AppResult<Page<u32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let start = (page * size) as usize;
            let end = (start + size as usize).min(self.items.len());
            let items = self.items.get(start..end).map(<[u32]>::to_vec).unwrap_or_default();
            let meta = if self.with_meta {
                let total_pages = (self.items.len() as u32 + size - 1) / size;
                PageMeta {
                    total_pages: Some(total_pages),
                    last: Some(page + 1 >= total_pages),
                    ..PageMeta::default()
                }
            } else {
                PageMeta::default()
            };
            Ok(Page::new(items, meta))
        }
    }

    #[tokio::test]
    async fn test_load_all_follows_metadata() {
        let fetcher = VecPages::new(25, true);
        let items = load_all::<u32>(&fetcher, 10).await.unwrap();
        assert_eq!(items.len(), 25);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_load_all_stops_on_short_page_without_metadata() {
        let fetcher = VecPages::new(20, false);
        let items = load_all::<u32>(&fetcher, 10).await.unwrap();
        assert_eq!(items, (0..20).collect::<Vec<_>>());
        // la tercera página llega vacía
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_load_all_empty_listing() {
        let fetcher = VecPages::new(0, true);
        assert!(load_all::<u32>(&fetcher, 500).await.unwrap().is_empty());
    }

    struct FakeSource {
        fail_lockers: bool,
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch_cities_page(&self, _page: u32, _size: u32) -> AppResult<Page<ApiCity>> {
            let city = ApiCity {
                id: 1,
                name: "Nukus shahri".to_string(),
                center_latitude: Some(42.46),
                center_longitude: Some(59.6),
                country_id: Some(234),
                status: None,
            };
            Ok(Page::new(vec![city], PageMeta::default()))
        }

        async fn fetch_service_points_page(
            &self,
            kind: ServicePointKind,
            _page: u32,
            _size: u32,
        ) -> AppResult<Page<ServicePoint>> {
            if kind == ServicePointKind::Locker && self.fail_lockers {
                return Err(AppError::ExternalApi("timeout".to_string()));
            }
            Ok(Page::new(vec![point(1, "Nukus shahri", kind)], PageMeta::default()))
        }
    }

    #[tokio::test]
    async fn test_load_catalog_ready() {
        let catalog = load_catalog(&FakeSource { fail_lockers: false }, 500).await;
        let lookup = catalog.lookup().expect("ready");
        assert!(lookup.has_office("Nukus shahri"));
        assert!(lookup.has_locker("Nukus shahri"));
        assert_eq!(catalog.cities.len(), 1);
    }

    #[tokio::test]
    async fn test_load_catalog_unavailable_keeps_cities() {
        let catalog = load_catalog(&FakeSource { fail_lockers: true }, 500).await;
        assert!(catalog.lookup().is_none());
        assert_eq!(catalog.coverage.status(), "unavailable");
        assert_eq!(catalog.cities.len(), 1);
    }
}
