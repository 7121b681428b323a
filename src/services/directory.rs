//! Directorio de oficinas y postamats
//!
//! Filtrado por tipo y búsqueda libre, más los datos para pintar el mapa.

use serde::{Deserialize, Serialize};

use crate::models::service_point::{Coordinates, ServicePoint, ServicePointKind};

/// Filtro por tipo del directorio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    #[serde(alias = "warehouse")]
    Office,
    Locker,
}

impl KindFilter {
    fn accepts(self, kind: ServicePointKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Office => kind == ServicePointKind::Office,
            KindFilter::Locker => kind == ServicePointKind::Locker,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DirectoryFilter {
    #[serde(default)]
    pub kind: KindFilter,
    #[serde(default)]
    pub search: Option<String>,
}

impl DirectoryFilter {
    pub fn matches(&self, point: &ServicePoint) -> bool {
        if !self.kind.accepts(point.kind) {
            return false;
        }

        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();

        point.city.to_lowercase().contains(&term)
            || point.name.to_lowercase().contains(&term)
            || point
                .address
                .as_deref()
                .map_or(false, |address| address.to_lowercase().contains(&term))
    }
}

pub fn filter_points<'a>(points: &'a [ServicePoint], filter: &DirectoryFilter) -> Vec<&'a ServicePoint> {
    points.iter().filter(|point| filter.matches(point)).collect()
}

/// Marcador del mapa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ServicePointKind,
    pub position: Coordinates,
}

/// Solo los puntos con coordenadas van al mapa
pub fn map_markers<'a, I>(points: I) -> Vec<MapMarker>
where
    I: IntoIterator<Item = &'a ServicePoint>,
{
    points
        .into_iter()
        .filter_map(|point| {
            point.coordinates.map(|position| MapMarker {
                id: point.id,
                name: point.name.clone(),
                kind: point.kind,
                position,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl MapBounds {
    pub fn center(&self) -> Coordinates {
        Coordinates {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lon: (self.south_west.lon + self.north_east.lon) / 2.0,
        }
    }
}

/// Caja que contiene todos los marcadores; `None` si no hay ninguno
pub fn map_bounds(markers: &[MapMarker]) -> Option<MapBounds> {
    let first = markers.first()?.position;
    let bounds = markers.iter().skip(1).fold(
        MapBounds { south_west: first, north_east: first },
        |mut bounds, marker| {
            let p = marker.position;
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lon = bounds.south_west.lon.min(p.lon);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lon = bounds.north_east.lon.max(p.lon);
            bounds
        },
    );
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::service_point_index::tests::point;

    fn sample() -> Vec<ServicePoint> {
        let mut office = point(1, "Toshkent shahri", ServicePointKind::Office);
        office.address = Some("Amir Temur ko'chasi 15".to_string());
        office.coordinates = Some(Coordinates { lat: 41.31, lon: 69.28 });

        let mut locker = point(2, "Buxoro shahri", ServicePointKind::Locker);
        locker.coordinates = Some(Coordinates { lat: 39.77, lon: 64.42 });

        let bare = point(3, "Nukus shahri", ServicePointKind::Office);
        vec![office, locker, bare]
    }

    #[test]
    fn test_filter_by_kind() {
        let points = sample();
        let filter = DirectoryFilter { kind: KindFilter::Office, search: None };
        let ids: Vec<i64> = filter_points(&points, &filter).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_city_name_and_address() {
        let points = sample();
        let by_city = DirectoryFilter { search: Some("BUXORO".to_string()), ..Default::default() };
        assert_eq!(filter_points(&points, &by_city).len(), 1);

        let by_address = DirectoryFilter { search: Some("temur".to_string()), ..Default::default() };
        assert_eq!(filter_points(&points, &by_address)[0].id, 1);

        let blank = DirectoryFilter { search: Some("  ".to_string()), ..Default::default() };
        assert_eq!(filter_points(&points, &blank).len(), 3);
    }

    #[test]
    fn test_markers_and_bounds() {
        let points = sample();
        let markers = map_markers(&points);
        assert_eq!(markers.len(), 2);

        let bounds = map_bounds(&markers).unwrap();
        assert_eq!(bounds.south_west, Coordinates { lat: 39.77, lon: 64.42 });
        assert_eq!(bounds.north_east, Coordinates { lat: 41.31, lon: 69.28 });
        assert!(map_bounds(&[]).is_none());
    }

    #[test]
    fn test_kind_filter_accepts_legacy_name() {
        let kind: KindFilter = serde_json::from_value(serde_json::json!("warehouse")).unwrap();
        assert_eq!(kind, KindFilter::Office);
    }
}
