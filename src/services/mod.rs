//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: comparación
//! de nombres de ciudad, índice de puntos de servicio, resolvedor de
//! elegibilidad y el orquestador del calculador, más la carga del catálogo
//! y los diagnósticos que se construyen sobre él.

pub mod calculator;
pub mod catalog;
pub mod city_matching;
pub mod coverage_audit;
pub mod directory;
pub mod eligibility;
pub mod reference_data;
pub mod service_point_index;
pub mod service_point_loader;

pub use calculator::{CalculationError, CalculatorForm, FormError, PricingProvider, TariffCalculator};
pub use catalog::{Catalog, Coverage};
pub use eligibility::{EligibilityVerdict, EligibilityWarning, WarningKind, WarningView};
pub use reference_data::ReferenceData;
pub use service_point_index::{ServicePointIndex, ServicePointLookup};
pub use service_point_loader::{load_all, load_catalog, CatalogSource, Page, PageFetcher, PageMeta};
