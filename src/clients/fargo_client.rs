//! Cliente HTTP para el gateway de Fargo
//!
//! Autenticación con token bearer cacheado, listados paginados de ciudades y
//! almacenes, y cálculo de precios. Los listados upstream llegan con
//! envoltorios distintos según el endpoint; todos se decodifican con
//! `ListEnvelope`.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::config::environment::FargoConfig;
use crate::models::city::ApiCity;
use crate::models::service_point::{ServicePoint, ServicePointKind, WarehouseRecord};
use crate::models::tariff::{PriceList, PriceRequest};
use crate::services::calculator::PricingProvider;
use crate::services::service_point_loader::{CatalogSource, Page, PageMeta};
use crate::state::AuthToken;
use crate::utils::errors::{upstream_status_error, AppError, AppResult};

/// Margen antes de la expiración a partir del cual se renueva el token
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Rutas posibles del token en la respuesta de autenticación
const TOKEN_PATHS: [&str; 5] = ["/data/data/id_token", "/data/id_token", "/id_token", "/access_token", "/token"];

/// Dimensiones fijas del paquete que se envían al calcular precios
const PACKAGE_WIDTH: &str = "32";
const PACKAGE_LENGTH: &str = "45";
const PACKAGE_HEIGHT: &str = "1";
const PRICE_PAGE_SIZE: &str = "50";

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Debug, Deserialize)]
struct ExpClaim {
    #[serde(default)]
    exp: Option<i64>,
}

/// Cuerpo de un listado: array directo o anidado una vez más
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Items(Vec<T>),
    Nested { data: Vec<T> },
    Listed { list: Vec<T> },
}

/// Envoltorio de listados upstream (`data[]`, `data.data[]`, `data.list[]`, `list[]`)
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ListEnvelope<T> {
    #[serde(default)]
    data: Option<ListBody<T>>,
    #[serde(default)]
    list: Option<Vec<T>>,
    #[serde(flatten)]
    meta: PageMeta,
}

impl<T> ListEnvelope<T> {
    fn into_page(self) -> Page<T> {
        let items = match (self.data, self.list) {
            (Some(ListBody::Items(items)), _)
            | (Some(ListBody::Nested { data: items }), _)
            | (Some(ListBody::Listed { list: items }), _) => items,
            (None, Some(items)) => items,
            (None, None) => Vec::new(),
        };
        Page::new(items, self.meta)
    }
}

/// Respuesta de precios: `{ data: {...} }` o el listado directamente
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceEnvelope {
    Wrapped { data: PriceList },
    Bare(PriceList),
}

impl PriceEnvelope {
    fn into_list(self) -> PriceList {
        match self {
            PriceEnvelope::Wrapped { data } | PriceEnvelope::Bare(data) => data,
        }
    }
}

/// Extrae el token de la respuesta de autenticación
fn extract_token(body: &Value) -> Option<String> {
    TOKEN_PATHS
        .iter()
        .filter_map(|path| body.pointer(path))
        .filter_map(Value::as_str)
        .find(|token| !token.trim().is_empty())
        .map(str::to_string)
}

/// Lee `exp` del JWT sin verificar la firma (el token no es nuestro)
fn token_expiry(token: &str) -> Option<chrono::DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpClaim>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}

fn decode_list<T: DeserializeOwned>(operation: &str, body: Value) -> AppResult<Page<T>> {
    serde_json::from_value::<ListEnvelope<T>>(body)
        .map(ListEnvelope::into_page)
        .map_err(|e| AppError::ExternalApi(format!("{}: unexpected response shape: {}", operation, e)))
}

/// Cliente del gateway de Fargo
pub struct FargoClient {
    client: Client,
    config: FargoConfig,
    token: RwLock<Option<AuthToken>>,
    /// Serializa las renovaciones: peticiones concurrentes esperan a la misma
    refresh_lock: Mutex<()>,
}

impl FargoClient {
    pub fn new(config: FargoConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &FargoConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn buffer() -> Duration {
        Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES)
    }

    /// Autenticar contra upstream y devolver un token nuevo
    pub async fn authenticate(&self) -> AppResult<AuthToken> {
        if !self.config.has_credentials() {
            return Err(AppError::UpstreamAuth("FARGO_USERNAME/FARGO_PASSWORD not configured".to_string()));
        }

        log::info!("🔐 Autenticando con Fargo como {}", self.config.username);

        let response = self
            .client
            .post(self.url("/api/v1/authenticate"))
            .json(&AuthRequest {
                username: &self.config.username,
                password: &self.config.password,
                remember_me: false,
            })
            .send()
            .await
            .map_err(|e| AppError::UpstreamAuth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Autenticación fallida: {} {}", status, body);
            return Err(AppError::UpstreamAuth(format!("{} {}", status, body.trim())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamAuth(e.to_string()))?;

        let token = extract_token(&body)
            .ok_or_else(|| AppError::UpstreamAuth("no token in authentication response".to_string()))?;

        let expires_at = token_expiry(&token)
            .unwrap_or_else(|| Utc::now() + Duration::hours(self.config.token_ttl_hours));

        log::info!("✅ Token de Fargo renovado, expira {}", expires_at);
        Ok(AuthToken::new(token, expires_at))
    }

    /// Token vigente; renueva si falta o está a punto de expirar
    pub async fn bearer_token(&self) -> AppResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid_for(Self::buffer()) {
                return Ok(token.token.clone());
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // otra petición pudo renovarlo mientras esperábamos
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid_for(Self::buffer()) {
                return Ok(token.token.clone());
            }
        }

        match self.authenticate().await {
            Ok(token) => {
                let value = token.token.clone();
                *self.token.write().await = Some(token);
                Ok(value)
            }
            Err(e) => {
                *self.token.write().await = None;
                Err(e)
            }
        }
    }

    pub async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    async fn send_json(&self, operation: &str, request: RequestBuilder) -> AppResult<Value> {
        let token = self.bearer_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("⚠️ {}: token rechazado por upstream, se descarta", operation);
            self.invalidate_token().await;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ {} falló: {} {}", operation, status, body);
            return Err(upstream_status_error(operation, status, &body));
        }

        Ok(response.json().await?)
    }

    /// Página de ciudades activas del país configurado
    pub async fn fetch_cities(&self, page: u32, size: u32) -> AppResult<Page<ApiCity>> {
        log::debug!("🏙️ Pidiendo ciudades (página {}, tamaño {})", page, size);
        let request = self.client.get(self.url("/api/v2/cities")).query(&[
            ("size", size.to_string()),
            ("country_id", self.config.country_id.to_string()),
            ("is_uae", "false".to_string()),
            ("page", page.to_string()),
            ("status", "active".to_string()),
        ]);
        let body = self.send_json("cities", request).await?;
        decode_list("cities", body)
    }

    /// Página de almacenes tal como los devuelve upstream
    pub async fn fetch_warehouses(
        &self,
        kind: ServicePointKind,
        page: u32,
        size: u32,
    ) -> AppResult<Page<WarehouseRecord>> {
        log::debug!("📦 Pidiendo {} (página {}, tamaño {})", kind.upstream_type(), page, size);
        let request = self.client.get(self.url("/api/v1/admin/warehouses")).query(&[
            ("size", size.to_string()),
            ("multi_marketplace", "false".to_string()),
            ("page", page.to_string()),
            ("status", "active".to_string()),
            ("type", kind.upstream_type().to_string()),
            ("show_all", "true".to_string()),
        ]);
        let body = self.send_json("warehouses", request).await?;
        decode_list("warehouses", body)
    }

    /// Precios para un envío
    pub async fn fetch_prices(&self, request: &PriceRequest) -> AppResult<PriceList> {
        let country = self.config.country_id.to_string();
        let query = [
            ("size", PRICE_PAGE_SIZE.to_string()),
            ("dimensions.width", PACKAGE_WIDTH.to_string()),
            ("dimensions.length", PACKAGE_LENGTH.to_string()),
            ("dimensions.height", PACKAGE_HEIGHT.to_string()),
            ("dimensions.unit", "METRIC".to_string()),
            ("dimensions.weight", request.weight_kg.to_string()),
            ("to_country_id", country.clone()),
            ("from_country_id", country),
            ("courier_type", request.tariff_type.as_str().to_string()),
            ("page", "0".to_string()),
            ("customerId", self.config.customer_id.to_string()),
            ("logistic_type", "REGULAR".to_string()),
            ("from_latitude", request.from.lat.to_string()),
            ("from_longitude", request.from.lon.to_string()),
            ("to_latitude", request.to.lat.to_string()),
            ("to_longitude", request.to.lon.to_string()),
        ];

        let builder = self
            .client
            .get(self.url("/api/v2/admin/packages/prices"))
            .header("accept", "application/json")
            .header("marketplace_id", self.config.marketplace_id.to_string())
            .query(&query);

        let body = self.send_json("prices", builder).await?;
        serde_json::from_value::<PriceEnvelope>(body)
            .map(PriceEnvelope::into_list)
            .map_err(|e| AppError::ExternalApi(format!("prices: unexpected response shape: {}", e)))
    }
}

#[async_trait]
impl PricingProvider for FargoClient {
    async fn fetch_prices(&self, request: &PriceRequest) -> AppResult<PriceList> {
        FargoClient::fetch_prices(self, request).await
    }
}

#[async_trait]
impl CatalogSource for FargoClient {
    async fn fetch_cities_page(&self, page: u32, size: u32) -> AppResult<Page<ApiCity>> {
        self.fetch_cities(page, size).await
    }

    async fn fetch_service_points_page(
        &self,
        kind: ServicePointKind,
        page: u32,
        size: u32,
    ) -> AppResult<Page<ServicePoint>> {
        let records = self.fetch_warehouses(kind, page, size).await?;
        let items = records
            .items
            .into_iter()
            .map(|record| record.into_service_point(kind))
            .collect();
        Ok(Page::new(items, records.meta))
    }
}
