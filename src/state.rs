//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::clients::FargoClient;
use crate::config::environment::EnvironmentConfig;
use crate::services::calculator::PricingProvider;
use crate::services::catalog::Catalog;
use crate::services::reference_data::ReferenceData;
use crate::services::service_point_loader::{load_catalog, CatalogSource};
use crate::utils::errors::{AppError, AppResult};

/// Token de autenticación upstream
#[derive(Clone, Debug)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Sigue siendo válido dentro de `buffer`
    pub fn is_valid_for(&self, buffer: Duration) -> bool {
        Utc::now() + buffer < self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub pricing: Arc<dyn PricingProvider>,
    pub source: Arc<dyn CatalogSource>,
    pub reference: Arc<ReferenceData>,
    /// Snapshot vigente; una recarga lo sustituye entero
    pub catalog: Arc<RwLock<Arc<Catalog>>>,
}

impl AppState {
    /// Estado de producción: el cliente de Fargo sirve precios y catálogo
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let fargo = Arc::new(FargoClient::new(config.fargo.clone())?);
        Self::with_providers(config, fargo.clone(), fargo)
    }

    pub fn with_providers(
        config: EnvironmentConfig,
        pricing: Arc<dyn PricingProvider>,
        source: Arc<dyn CatalogSource>,
    ) -> AppResult<Self> {
        let reference = ReferenceData::embedded()
            .map_err(|e| AppError::Internal(format!("reference data: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            pricing,
            source,
            reference: Arc::new(reference),
            catalog: Arc::new(RwLock::new(Arc::new(Catalog::loading()))),
        })
    }

    /// Snapshot actual del catálogo
    pub async fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().await.clone()
    }

    pub async fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = Arc::new(catalog);
    }

    /// Vuelve a cargar ciudades y puntos de servicio y publica el snapshot
    pub async fn reload_catalog(&self) -> Arc<Catalog> {
        let catalog = Arc::new(load_catalog(self.source.as_ref(), self.config.fargo.page_size).await);
        *self.catalog.write().await = catalog.clone();
        info!(
            "🔄 Catálogo publicado: {} ciudades, cobertura {}",
            catalog.cities.len(),
            catalog.coverage.status()
        );
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_buffer() {
        let token = AuthToken::new("t".to_string(), Utc::now() + Duration::minutes(3));
        assert!(!token.is_expired());
        assert!(!token.is_valid_for(Duration::minutes(5)));
        assert!(token.is_valid_for(Duration::minutes(1)));
    }
}
