//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use serde::Serialize;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS (simplificado)
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Peso en kg: finito y mayor que cero, sin tope
pub fn validate_weight_kg(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new("finite"));
    }
    validate_positive(value)
}

/// Convierte el peso introducido en el formulario a kg.
///
/// Acepta coma decimal ("2,5"); rechaza vacío, no numérico, cero y negativos.
pub fn parse_weight(raw: &str) -> Result<f64, ValidationError> {
    validate_not_empty(raw)?;

    let normalized = raw.trim().replace(',', ".");
    let weight: f64 = normalized.parse().map_err(|_| {
        let mut error = ValidationError::new("number");
        error.add_param("value".into(), &raw.to_string());
        error
    })?;

    validate_weight_kg(weight)?;
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(41.31, 69.24).is_ok());
        assert!(validate_coordinates(91.0, 69.24).is_err());
        assert!(validate_coordinates(41.31, -181.0).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
        assert!(validate_positive(0.5).is_ok());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("2.5").unwrap(), 2.5);
        assert_eq!(parse_weight(" 3 ").unwrap(), 3.0);
        assert_eq!(parse_weight("1,5").unwrap(), 1.5);
        assert!(parse_weight("").is_err());
        assert!(parse_weight("   ").is_err());
        assert!(parse_weight("abc").is_err());
        assert!(parse_weight("0").is_err());
        assert!(parse_weight("-1").is_err());
        assert!(parse_weight("NaN").is_err());
        assert!(parse_weight("inf").is_err());
    }

    #[test]
    fn test_heavy_weights_are_accepted() {
        assert_eq!(parse_weight("1500").unwrap(), 1500.0);
        assert_eq!(parse_weight("25000,5").unwrap(), 25000.5);
        assert!(validate_weight_kg(1.0e6).is_ok());
    }
}
