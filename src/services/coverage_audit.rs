//! Auditoría de cobertura
//!
//! Diagnóstico de solo lectura: para cada ciudad upstream indica si tiene
//! oficina/postamat con match exacto y lista las ortografías del campo `city`
//! de los puntos que solo coinciden ignorando mayúsculas ("casi matches").
//! No cambia la forma de comparar.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::city::CityDirectory;
use crate::services::city_matching::city_match_key;
use crate::services::service_point_index::{ServicePointIndex, ServicePointLookup};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCoverage {
    pub city_id: i64,
    pub city_name: String,
    pub has_office: bool,
    pub has_locker: bool,
    /// Ortografías de puntos iguales al nombre salvo mayúsculas
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub near_misses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub cities_total: usize,
    pub cities_with_office: usize,
    pub cities_with_locker: usize,
    pub cities_with_near_misses: usize,
    /// Ciudades de puntos que no coinciden con ninguna ciudad upstream
    pub orphan_point_cities: Vec<String>,
    pub cities: Vec<CityCoverage>,
}

pub fn audit_coverage(cities: &CityDirectory, index: &ServicePointIndex) -> CoverageReport {
    let mut spellings_by_folded: HashMap<String, Vec<&str>> = HashMap::new();
    for spelling in index.distinct_cities() {
        spellings_by_folded
            .entry(spelling.to_lowercase())
            .or_default()
            .push(spelling);
    }

    let mut matched_spellings = std::collections::HashSet::new();
    let mut report_cities = Vec::with_capacity(cities.len());

    for city in cities.cities() {
        let Some(key) = city_match_key(Some(&city.name)) else {
            continue;
        };

        let mut near_misses: Vec<String> = spellings_by_folded
            .get(&key.to_lowercase())
            .map(|spellings| {
                spellings
                    .iter()
                    .filter(|spelling| **spelling != key)
                    .map(|spelling| spelling.to_string())
                    .collect()
            })
            .unwrap_or_default();
        near_misses.sort();

        if let Some(spellings) = spellings_by_folded.get(&key.to_lowercase()) {
            matched_spellings.extend(spellings.iter().copied());
        }

        report_cities.push(CityCoverage {
            city_id: city.id,
            city_name: key.to_string(),
            has_office: index.has_office(key),
            has_locker: index.has_locker(key),
            near_misses,
        });
    }

    let mut orphan_point_cities: Vec<String> = index
        .distinct_cities()
        .filter(|spelling| !matched_spellings.contains(spelling))
        .map(str::to_string)
        .collect();
    orphan_point_cities.sort();

    CoverageReport {
        cities_total: report_cities.len(),
        cities_with_office: report_cities.iter().filter(|c| c.has_office).count(),
        cities_with_locker: report_cities.iter().filter(|c| c.has_locker).count(),
        cities_with_near_misses: report_cities.iter().filter(|c| !c.near_misses.is_empty()).count(),
        orphan_point_cities,
        cities: report_cities,
    }
}
