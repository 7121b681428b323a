//! Utilidades compartidas por los tests de integración

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use delivery_tariffs::models::city::ApiCity;
use delivery_tariffs::models::service_point::{Coordinates, ServicePoint, ServicePointKind};
use delivery_tariffs::models::tariff::{PriceList, PriceRequest};
use delivery_tariffs::services::calculator::PricingProvider;
use delivery_tariffs::services::service_point_loader::{CatalogSource, Page, PageMeta};
use delivery_tariffs::utils::errors::{AppError, AppResult};
use delivery_tariffs::{create_app, AppState, EnvironmentConfig};

pub const TASHKENT_ID: i64 = 1;
pub const BUKHARA_ID: i64 = 2;
pub const NUKUS_ID: i64 = 3;
/// Id upstream de "Andijon shahri" en el listado de referencia
pub const ANDIJAN_ID: i64 = 1125210871;

/// Proveedor de precios que cuenta las llamadas
pub struct MockPricing {
    calls: AtomicUsize,
    fail: bool,
}

impl MockPricing {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), fail: false })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), fail: true })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PricingProvider for MockPricing {
    async fn fetch_prices(&self, request: &PriceRequest) -> AppResult<PriceList> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::ExternalApi("502 Bad Gateway".to_string()));
        }
        let list = serde_json::from_value(serde_json::json!({
            "total": 2,
            "list": [
                { "id": 1, "name": "Express", "courier_type": { "type": request.tariff_type.as_str() },
                  "price": { "total": 42000.0 } },
                { "id": 2, "name": "Economy", "courier_type": { "type": request.tariff_type.as_str() },
                  "price": { "total": 28000.0, "currency": "UZS" } }
            ]
        }))
        .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(list)
    }
}

/// Catálogo en memoria
pub struct MockSource {
    pub fail_lockers: bool,
}

fn api_city(id: i64, name: &str, lat: f64, lon: f64) -> ApiCity {
    ApiCity {
        id,
        name: name.to_string(),
        center_latitude: Some(lat),
        center_longitude: Some(lon),
        country_id: Some(234),
        status: Some("active".to_string()),
    }
}

fn point(id: i64, city: &str, kind: ServicePointKind, coordinates: Option<Coordinates>) -> ServicePoint {
    ServicePoint {
        id,
        name: format!("Fargo {}", id),
        city: city.to_string(),
        address: Some(format!("{} markaz", city)),
        coordinates,
        phone: None,
        kind,
        status: "active".to_string(),
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    async fn fetch_cities_page(&self, _page: u32, _size: u32) -> AppResult<Page<ApiCity>> {
        let cities = vec![
            api_city(TASHKENT_ID, "Toshkent shahri", 41.31, 69.28),
            api_city(BUKHARA_ID, "Buxoro shahri", 39.77, 64.42),
            api_city(NUKUS_ID, "Nukus shahri", 42.46, 59.61),
            api_city(ANDIJAN_ID, "Andijon shahri", 40.78, 72.34),
        ];
        let meta = PageMeta {
            total_elements: Some(cities.len() as u64),
            total_pages: Some(1),
            last: Some(true),
            ..PageMeta::default()
        };
        Ok(Page::new(cities, meta))
    }

    async fn fetch_service_points_page(
        &self,
        kind: ServicePointKind,
        _page: u32,
        _size: u32,
    ) -> AppResult<Page<ServicePoint>> {
        let items = match kind {
            ServicePointKind::Office => vec![
                point(10, "Toshkent shahri", kind, Some(Coordinates { lat: 41.30, lon: 69.25 })),
                point(11, "Buxoro shahri ", kind, Some(Coordinates { lat: 39.76, lon: 64.43 })),
                point(12, "andijon shahri", kind, None),
            ],
            ServicePointKind::Locker => {
                if self.fail_lockers {
                    return Err(AppError::ExternalApi("lockers: 503 Service Unavailable".to_string()));
                }
                vec![point(20, "Toshkent shahri", kind, Some(Coordinates { lat: 41.33, lon: 69.30 }))]
            }
        };
        Ok(Page::new(items, PageMeta::default()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub pricing: Arc<MockPricing>,
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}

async fn build(pricing: Arc<MockPricing>, source: MockSource, load: bool) -> TestApp {
    let state = AppState::with_providers(EnvironmentConfig::default(), pricing.clone(), Arc::new(source))
        .expect("test state");
    if load {
        state.reload_catalog().await;
    }
    TestApp {
        router: create_app(state.clone()),
        state,
        pricing,
    }
}

/// App con el catálogo ya cargado
pub async fn create_test_app() -> TestApp {
    build(MockPricing::new(), MockSource { fail_lockers: false }, true).await
}

/// App cuyo catálogo todavía no se ha cargado
pub async fn create_loading_app() -> TestApp {
    build(MockPricing::new(), MockSource { fail_lockers: false }, false).await
}

/// App en la que la carga de postamats falla
pub async fn create_unavailable_app() -> TestApp {
    build(MockPricing::new(), MockSource { fail_lockers: true }, true).await
}

pub async fn create_failing_pricing_app() -> TestApp {
    build(MockPricing::failing(), MockSource { fail_lockers: false }, true).await
}
