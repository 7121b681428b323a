use crate::dto::directory_dto::{CatalogStatusResponse, CoverageAuditResponse, DirectoryResponse};
use crate::services::catalog::{Catalog, Coverage};
use crate::services::coverage_audit::audit_coverage;
use crate::services::directory::{filter_points, map_bounds, map_markers, DirectoryFilter};
use crate::services::service_point_index::ServicePointIndex;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

fn ready_index(catalog: &Catalog) -> AppResult<&ServicePointIndex> {
    match &catalog.coverage {
        Coverage::Ready(index) => Ok(&**index),
        Coverage::Loading => Err(AppError::ServiceUnavailable(
            "service points are still loading".to_string(),
        )),
        Coverage::Unavailable { reason } => Err(AppError::ServiceUnavailable(format!(
            "service points could not be loaded: {}",
            reason
        ))),
    }
}

fn status_of(catalog: &Catalog) -> CatalogStatusResponse {
    let (offices, lockers) = catalog
        .index()
        .map(|index| (index.office_count(), index.locker_count()))
        .unwrap_or((0, 0));
    let reason = match &catalog.coverage {
        Coverage::Unavailable { reason } => Some(reason.clone()),
        Coverage::Loading | Coverage::Ready(_) => None,
    };

    CatalogStatusResponse {
        coverage: catalog.coverage.status(),
        cities: catalog.cities.len(),
        offices,
        lockers,
        reason,
    }
}

/// Directorio, recarga y auditoría sobre el snapshot del catálogo
pub struct CatalogController {
    state: AppState,
}

impl CatalogController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn directory(&self, filter: DirectoryFilter) -> AppResult<DirectoryResponse> {
        let catalog = self.state.catalog().await;
        let index = ready_index(&catalog)?;

        let items: Vec<_> = filter_points(index.points(), &filter).into_iter().cloned().collect();
        let markers = map_markers(&items);
        let bounds = map_bounds(&markers);

        Ok(DirectoryResponse {
            coverage: catalog.coverage.status(),
            total: items.len(),
            offices: index.office_count(),
            lockers: index.locker_count(),
            center: bounds.map(|b| b.center()),
            items,
            markers,
            bounds,
        })
    }

    pub async fn status(&self) -> CatalogStatusResponse {
        status_of(&*self.state.catalog().await)
    }

    pub async fn reload(&self) -> CatalogStatusResponse {
        log::info!("🔄 Recarga del catálogo solicitada");
        status_of(&*self.state.reload_catalog().await)
    }

    pub async fn audit(&self) -> AppResult<CoverageAuditResponse> {
        let catalog = self.state.catalog().await;
        let index = ready_index(&catalog)?;
        let report = audit_coverage(&catalog.cities, index);
        log::info!(
            "🔎 Auditoría: {} ciudades, {} con casi-matches",
            report.cities_total,
            report.cities_with_near_misses
        );
        Ok(CoverageAuditResponse { data: report })
    }
}
