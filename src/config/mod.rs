//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y la configuración del
//! proveedor de tarifas upstream.

pub mod environment;

pub use environment::*;
