//! Comparación de nombres de ciudad
//!
//! Dos operaciones independientes que no deben mezclarse:
//!
//! - `city_match_key`: clave para comparar la ciudad seleccionada con el
//!   campo `city` de un punto de servicio. Solo recorta espacios; la
//!   comparación es exacta y sensible a mayúsculas.
//! - `search_city_variants`: búsqueda libre del selector de ciudades sobre
//!   las variantes uz/ru/en, sin distinguir mayúsculas y sin palabras
//!   administrativas ("shahri", "район", "district"...).

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::city::RegionCity;

lazy_static! {
    static ref NON_LETTERS: Regex = Regex::new(r"[^a-zA-Zа-яё\s]").expect("non-letter regex");
    static ref UZ_ADMIN_WORDS: Regex = Regex::new(r"(shahri|tumani|viloyati)").expect("uz regex");
    static ref RU_ADMIN_WORDS: Regex = Regex::new(r"(город|район|область|области)").expect("ru regex");
    static ref EN_ADMIN_WORDS: Regex = Regex::new(r"(city|district|region)").expect("en regex");
}

/// Clave de comparación estricta de un nombre de ciudad.
///
/// `None` significa que no es posible ningún match (nombre ausente o vacío).
pub fn city_match_key(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

/// Igualdad exacta tras recortar espacios
pub fn same_city(left: &str, right: &str) -> bool {
    match (city_match_key(Some(left)), city_match_key(Some(right))) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Nombre en minúsculas y solo con letras latinas/cirílicas y espacios
fn searchable(name: &str) -> String {
    NON_LETTERS.replace_all(&name.to_lowercase(), "").into_owned()
}

fn core_name(normalized: &str, admin_words: &Regex) -> String {
    admin_words.replace_all(normalized, "").trim().to_string()
}

fn variant_matches(normalized: &str, core: &str, term: &str) -> bool {
    normalized.contains(term)
        || core.contains(term)
        || normalized.split(' ').any(|word| word.starts_with(term))
}

/// Indica si una ciudad del listado coincide con la búsqueda libre
pub fn city_matches_query(city: &RegionCity, query: &str) -> bool {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }

    let uz = searchable(&city.names.uz);
    let ru = searchable(&city.names.ru);
    let en = searchable(&city.names.en);

    variant_matches(&uz, &core_name(&uz, &UZ_ADMIN_WORDS), &term)
        || variant_matches(&ru, &core_name(&ru, &RU_ADMIN_WORDS), &term)
        || variant_matches(&en, &core_name(&en, &EN_ADMIN_WORDS), &term)
}

/// Búsqueda multilingüe para el selector de ciudades
pub fn search_city_variants<'a>(query: &str, cities: &'a [RegionCity]) -> Vec<&'a RegionCity> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    cities
        .iter()
        .filter(|city| city_matches_query(city, query))
        .collect()
}
