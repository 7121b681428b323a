use crate::models::city::{Region, RegionCity};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

/// Máximo de resultados de la búsqueda de ciudades
const SEARCH_LIMIT: usize = 50;

/// Listado de referencia de regiones y ciudades
pub struct RegionController {
    state: AppState,
}

impl RegionController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn regions(&self) -> Vec<Region> {
        self.state.reference.regions().to_vec()
    }

    pub fn region_cities(&self, region_id: &str) -> AppResult<Vec<RegionCity>> {
        let reference = &self.state.reference;
        if reference.region(region_id).is_none() {
            return Err(not_found_error("Region", region_id));
        }
        let cities: Vec<RegionCity> = reference.cities_in_region(region_id).cloned().collect();
        log::debug!("🗺️ {} ciudades en la región {}", cities.len(), region_id);
        Ok(cities)
    }

    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<RegionCity> {
        self.state
            .reference
            .search(query)
            .into_iter()
            .take(limit.unwrap_or(SEARCH_LIMIT).min(SEARCH_LIMIT))
            .cloned()
            .collect()
    }
}
