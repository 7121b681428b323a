//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y los mensajes localizados.

pub mod errors;
pub mod i18n;
pub mod validation;

pub use errors::{AppError, AppResult};
pub use i18n::Language;
