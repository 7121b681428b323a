use std::collections::HashSet;

use crate::models::service_point::{ServicePoint, ServicePointKind};
use crate::services::city_matching::city_match_key;

/// Consultas de cobertura que necesita el resolvedor de elegibilidad
pub trait ServicePointLookup {
    /// Hay alguna oficina cuya ciudad (recortada) es exactamente `city_name`
    fn has_office(&self, city_name: &str) -> bool;
    /// Igual que `has_office`, para postamats
    fn has_locker(&self, city_name: &str) -> bool;
}

/// Índice en memoria de oficinas y postamats cargados de upstream.
///
/// Inmutable una vez construido. Los puntos sin ciudad se conservan para el
/// directorio pero no participan en las consultas de cobertura.
#[derive(Debug, Clone, Default)]
pub struct ServicePointIndex {
    points: Vec<ServicePoint>,
    office_cities: HashSet<String>,
    locker_cities: HashSet<String>,
}

impl ServicePointIndex {
    pub fn new(points: Vec<ServicePoint>) -> Self {
        let mut office_cities = HashSet::new();
        let mut locker_cities = HashSet::new();

        for point in &points {
            let Some(key) = city_match_key(Some(&point.city)) else {
                continue;
            };
            match point.kind {
                ServicePointKind::Office => office_cities.insert(key.to_string()),
                ServicePointKind::Locker => locker_cities.insert(key.to_string()),
            };
        }

        Self {
            points,
            office_cities,
            locker_cities,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[ServicePoint] {
        &self.points
    }

    pub fn offices(&self) -> impl Iterator<Item = &ServicePoint> {
        self.points.iter().filter(|p| p.kind == ServicePointKind::Office)
    }

    pub fn lockers(&self) -> impl Iterator<Item = &ServicePoint> {
        self.points.iter().filter(|p| p.kind == ServicePointKind::Locker)
    }

    pub fn office_count(&self) -> usize {
        self.offices().count()
    }

    pub fn locker_count(&self) -> usize {
        self.lockers().count()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ortografías distintas (recortadas) del campo `city` de los puntos
    pub fn distinct_cities(&self) -> impl Iterator<Item = &str> {
        self.office_cities
            .union(&self.locker_cities)
            .map(String::as_str)
    }
}

impl ServicePointLookup for ServicePointIndex {
    fn has_office(&self, city_name: &str) -> bool {
        city_match_key(Some(city_name)).map_or(false, |key| self.office_cities.contains(key))
    }

    fn has_locker(&self, city_name: &str) -> bool {
        city_match_key(Some(city_name)).map_or(false, |key| self.locker_cities.contains(key))
    }
}
