//! Delivery tariffs
//!
//! Backend del calculador de tarifas de Fargo: elegibilidad de tarifas según
//! la cobertura de oficinas y postamats, directorio de puntos de servicio y
//! proxy hacia el gateway upstream.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use config::environment::EnvironmentConfig;
pub use routes::create_app;
pub use state::AppState;
