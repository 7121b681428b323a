//! Controllers
//!
//! Lógica de cada grupo de endpoints, independiente de axum.

pub mod calculator_controller;
pub mod catalog_controller;
pub mod region_controller;
pub mod tariff_controller;
