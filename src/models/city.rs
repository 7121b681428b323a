//! Ciudades y regiones
//!
//! En el sistema conviven tres fuentes de nombres de ciudad: el listado de
//! referencia por regiones, las ciudades del proveedor upstream y el campo
//! `city` de cada punto de servicio. No comparten una ortografía canónica.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::service_point::Coordinates;
use crate::utils::i18n::Language;

/// Nombres en los tres idiomas soportados
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNames {
    pub uz: String,
    pub ru: String,
    pub en: String,
}

impl LocalizedNames {
    /// Nombre en el idioma pedido, con el inglés como respaldo
    pub fn get(&self, language: Language) -> &str {
        let name = match language {
            Language::Uz => &self.uz,
            Language::Ru => &self.ru,
            Language::En => &self.en,
        };
        if name.trim().is_empty() {
            &self.en
        } else {
            name
        }
    }

    pub fn variants(&self) -> [&str; 3] {
        [&self.uz, &self.ru, &self.en]
    }
}

/// Región administrativa del listado de referencia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub names: LocalizedNames,
}

/// Ciudad del listado de referencia, enlazada con upstream por `shipox_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCity {
    pub shipox_id: i64,
    pub region_id: String,
    pub names: LocalizedNames,
}

/// Ciudad tal como la devuelve el proveedor upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub center_latitude: Option<f64>,
    #[serde(default)]
    pub center_longitude: Option<f64>,
    #[serde(default)]
    pub country_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiCity {
    /// Centro de la ciudad; upstream usa 0 para "sin coordenadas"
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.center_latitude, self.center_longitude)
    }
}

/// Ciudad seleccionada por el usuario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CityRef {
    /// Ciudad upstream, identificada por su nombre upstream
    Named { id: i64, name: String },
    /// Ciudad del listado de referencia con nombres localizados
    Localized {
        shipox_id: i64,
        #[serde(default)]
        region_id: Option<String>,
        names: LocalizedNames,
    },
}

impl CityRef {
    pub fn display_name(&self, language: Language) -> &str {
        display_name(self, language)
    }

    /// Id de la ciudad upstream a la que apunta la referencia
    pub fn upstream_id(&self) -> i64 {
        match self {
            CityRef::Named { id, .. } => *id,
            CityRef::Localized { shipox_id, .. } => *shipox_id,
        }
    }
}

impl From<&RegionCity> for CityRef {
    fn from(city: &RegionCity) -> Self {
        CityRef::Localized {
            shipox_id: city.shipox_id,
            region_id: Some(city.region_id.clone()),
            names: city.names.clone(),
        }
    }
}

impl From<&ApiCity> for CityRef {
    fn from(city: &ApiCity) -> Self {
        CityRef::Named {
            id: city.id,
            name: city.name.clone(),
        }
    }
}

/// Único punto de conversión de una referencia a texto visible
pub fn display_name(city: &CityRef, language: Language) -> &str {
    match city {
        CityRef::Named { name, .. } => name,
        CityRef::Localized { names, .. } => names.get(language),
    }
}

/// Directorio de ciudades upstream indexado por id
#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    cities: Vec<ApiCity>,
    by_id: HashMap<i64, usize>,
}

impl CityDirectory {
    pub fn new(cities: Vec<ApiCity>) -> Self {
        let by_id = cities
            .iter()
            .enumerate()
            .map(|(position, city)| (city.id, position))
            .collect();
        Self { cities, by_id }
    }

    pub fn find(&self, id: i64) -> Option<&ApiCity> {
        self.by_id.get(&id).map(|&position| &self.cities[position])
    }

    /// Ciudad upstream correspondiente a una selección
    pub fn resolve(&self, city: &CityRef) -> Option<&ApiCity> {
        self.find(city.upstream_id())
    }

    pub fn cities(&self) -> &[ApiCity] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn andijan_names() -> LocalizedNames {
        LocalizedNames {
            uz: "Andijon shahri".to_string(),
            ru: "город Андижан".to_string(),
            en: "Andijan city".to_string(),
        }
    }

    #[test]
    fn test_display_name_by_language() {
        let city = CityRef::Localized {
            shipox_id: 1125210871,
            region_id: None,
            names: andijan_names(),
        };
        assert_eq!(city.display_name(Language::Uz), "Andijon shahri");
        assert_eq!(city.display_name(Language::Ru), "город Андижан");
        assert_eq!(city.display_name(Language::En), "Andijan city");
    }

    #[test]
    fn test_display_name_falls_back_to_english() {
        let mut names = andijan_names();
        names.uz = String::new();
        let city = CityRef::Localized { shipox_id: 1, region_id: None, names };
        assert_eq!(display_name(&city, Language::Uz), "Andijan city");
    }

    #[test]
    fn test_named_city_ignores_language() {
        let city = CityRef::Named { id: 7, name: "Buxoro shahri".to_string() };
        for language in Language::ALL {
            assert_eq!(city.display_name(language), "Buxoro shahri");
        }
    }

    #[test]
    fn test_city_ref_tagged_json() {
        let json = serde_json::json!({
            "kind": "localized",
            "shipox_id": 263947049,
            "names": { "uz": "Buxoro shahri", "ru": "город Бухара", "en": "Bukhara city" }
        });
        let city: CityRef = serde_json::from_value(json).unwrap();
        assert_eq!(city.upstream_id(), 263947049);

        let named: CityRef = serde_json::from_value(serde_json::json!({
            "kind": "named", "id": 5, "name": "Nukus"
        }))
        .unwrap();
        assert_eq!(named, CityRef::Named { id: 5, name: "Nukus".to_string() });
    }

    #[test]
    fn test_directory_resolves_by_upstream_id() {
        let directory = CityDirectory::new(vec![ApiCity {
            id: 263947049,
            name: "Buxoro shahri".to_string(),
            center_latitude: Some(39.77),
            center_longitude: Some(64.42),
            country_id: Some(234),
            status: Some("active".to_string()),
        }]);
        let city = CityRef::Named { id: 263947049, name: "Buxoro shahri".to_string() };
        assert_eq!(directory.resolve(&city).map(|c| c.name.as_str()), Some("Buxoro shahri"));
        assert!(directory.find(1).is_none());
    }

    #[test]
    fn test_zero_coordinates_are_missing() {
        let city = ApiCity {
            id: 1,
            name: "Xiva".to_string(),
            center_latitude: Some(0.0),
            center_longitude: Some(60.36),
            country_id: None,
            status: None,
        };
        assert!(city.coordinates().is_none());
    }
}
