//! Listado de referencia de regiones y ciudades
//!
//! Se embebe en el binario desde `data/regions.json` y se parsea una vez.

use serde::Deserialize;

use crate::models::city::{Region, RegionCity};
use crate::services::city_matching::search_city_variants;

const REGIONS_JSON: &str = include_str!("../../data/regions.json");

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceData {
    regions: Vec<Region>,
    cities: Vec<RegionCity>,
}

impl ReferenceData {
    /// Listado embebido
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(REGIONS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, region_id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == region_id)
    }

    pub fn cities(&self) -> &[RegionCity] {
        &self.cities
    }

    pub fn cities_in_region<'a>(&'a self, region_id: &'a str) -> impl Iterator<Item = &'a RegionCity> + 'a {
        self.cities.iter().filter(move |c| c.region_id == region_id)
    }

    pub fn search(&self, query: &str) -> Vec<&RegionCity> {
        search_city_variants(query, &self.cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::i18n::Language;
    use std::collections::HashSet;

    #[test]
    fn test_embedded_data_parses() {
        let data = ReferenceData::embedded().unwrap();
        assert_eq!(data.regions().len(), 14);
        assert!(data.cities().len() > 100);
    }

    #[test]
    fn test_every_city_belongs_to_a_known_region() {
        let data = ReferenceData::embedded().unwrap();
        let region_ids: HashSet<&str> = data.regions().iter().map(|r| r.id.as_str()).collect();
        for city in data.cities() {
            assert!(region_ids.contains(city.region_id.as_str()), "{}", city.region_id);
        }
    }

    #[test]
    fn test_region_lookup_and_search() {
        let data = ReferenceData::embedded().unwrap();
        let andijan = data.region("andijon-viloyati").unwrap();
        assert_eq!(andijan.names.get(Language::En), "Andijan Region");
        assert!(data.cities_in_region("andijon-viloyati").count() > 0);
        assert!(data.region("atlantis").is_none());

        let found = data.search("андижан");
        let city = found.iter().find(|c| c.shipox_id == 1125210871).unwrap();
        assert_eq!(city.names.uz, "Andijon shahri");
    }
}
