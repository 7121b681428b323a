//! Modelos del sistema
//!
//! Ciudades, regiones, puntos de servicio y tarifas, tal como los usan
//! el resolvedor de elegibilidad y el proxy hacia el proveedor upstream.

pub mod city;
pub mod service_point;
pub mod tariff;

pub use city::*;
pub use service_point::*;
pub use tariff::*;
