//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto; un valor presente pero
//! inválido (por ejemplo un puerto no numérico) es un error de arranque.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::utils::i18n::Language;

/// Configuración del proveedor de tarifas upstream
#[derive(Debug, Clone)]
pub struct FargoConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub customer_id: i64,
    pub marketplace_id: i64,
    pub country_id: i64,
    /// Vida del token cuando no se puede leer su `exp`
    pub token_ttl_hours: i64,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for FargoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gateway.fargo.uz".to_string(),
            username: String::new(),
            password: String::new(),
            customer_id: 2484820352,
            marketplace_id: 307345429,
            country_id: 234,
            token_ttl_hours: 6,
            page_size: 500,
            timeout_secs: 30,
        }
    }
}

impl FargoConfig {
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub log_level: tracing::Level,
    pub default_language: Language,
    pub fargo: FargoConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
            log_level: tracing::Level::DEBUG,
            default_language: Language::Ru,
            fargo: FargoConfig::default(),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a valid value: {}", name, e)),
        _ => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let fargo_defaults = FargoConfig::default();

        let fargo = FargoConfig {
            base_url: var_or("FARGO_BASE_URL", &fargo_defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            username: var_or("FARGO_USERNAME", ""),
            password: env::var("FARGO_PASSWORD").unwrap_or_default(),
            customer_id: parse_var("FARGO_CUSTOMER_ID", fargo_defaults.customer_id)?,
            marketplace_id: parse_var("FARGO_MARKETPLACE_ID", fargo_defaults.marketplace_id)?,
            country_id: parse_var("FARGO_COUNTRY_ID", fargo_defaults.country_id)?,
            token_ttl_hours: parse_var("FARGO_TOKEN_TTL_HOURS", fargo_defaults.token_ttl_hours)?,
            page_size: parse_var("FARGO_PAGE_SIZE", fargo_defaults.page_size)?,
            timeout_secs: parse_var("HTTP_TIMEOUT_SECS", fargo_defaults.timeout_secs)?,
        };

        if fargo.page_size == 0 {
            anyhow::bail!("FARGO_PAGE_SIZE must be greater than zero");
        }

        let default_language = var_or("DEFAULT_LANGUAGE", defaults.default_language.code())
            .parse::<Language>()
            .map_err(anyhow::Error::msg)
            .context("DEFAULT_LANGUAGE")?;

        Ok(Self {
            environment: var_or("ENVIRONMENT", &defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: var_or("HOST", &defaults.host),
            cors_origins: var_or("CORS_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
            default_language,
            fargo,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
