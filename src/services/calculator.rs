//! Orquestador del calculador de tarifas
//!
//! Mantiene el formulario (ciudades, tipo de tarifa, peso), el idioma activo
//! y el snapshot del catálogo. Cada consulta vuelve a llamar al resolvedor;
//! el veredicto nunca se guarda.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::city::{display_name, ApiCity, CityRef};
use crate::models::service_point::Coordinates;
use crate::models::tariff::{PriceList, PriceRequest, TariffType};
use crate::services::catalog::{Catalog, Coverage};
use crate::services::eligibility::{
    self, CityNames, EligibilityQuery, EligibilityVerdict, EligibilityWarning, WarningKind, WarningView,
};
use crate::utils::errors::AppResult;
use crate::utils::i18n::{self, Language, MessageKey};
use crate::utils::validation::parse_weight;

/// Proveedor de precios (upstream o un doble de pruebas)
#[async_trait]
pub trait PricingProvider: Send + Sync {
    async fn fetch_prices(&self, request: &PriceRequest) -> AppResult<PriceList>;
}

/// Estado del formulario tal como lo rellena el usuario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorForm {
    pub origin: Option<CityRef>,
    pub destination: Option<CityRef>,
    pub tariff_type: Option<TariffType>,
    /// Texto libre; se valida al calcular
    pub weight: String,
}

/// Errores al modificar el formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("origin and destination cities must be selected before the tariff type")]
    SelectCitiesFirst,
}

impl FormError {
    pub fn message(&self, language: Language) -> String {
        match self {
            FormError::SelectCitiesFirst => i18n::render(language, MessageKey::SelectCitiesFirst, &[]),
        }
    }
}

/// Motivos por los que no se emite (o falla) el cálculo
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("form is incomplete")]
    IncompleteForm,

    #[error("weight is not a positive number")]
    InvalidWeight,

    #[error("tariff is not available for the selected cities ({:?})", .0.kind)]
    Blocked(EligibilityWarning),

    #[error("selected city has no upstream counterpart with coordinates")]
    CityNotResolved,

    #[error("price calculation failed: {0}")]
    Pricing(String),
}

impl CalculationError {
    /// Texto para el usuario en el idioma indicado
    pub fn message(&self, language: Language) -> String {
        match self {
            CalculationError::IncompleteForm => i18n::render(language, MessageKey::FillAllFields, &[]),
            CalculationError::InvalidWeight => i18n::render(language, MessageKey::CorrectWeight, &[]),
            CalculationError::Blocked(warning) => warning.render(language),
            CalculationError::CityNotResolved => i18n::render(language, MessageKey::CityNotResolved, &[]),
            CalculationError::Pricing(_) => i18n::render(language, MessageKey::CalculationError, &[]),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CalculationError::IncompleteForm => "FILL_ALL_FIELDS",
            CalculationError::InvalidWeight => "CORRECT_WEIGHT",
            CalculationError::Blocked(_) => "TARIFF_NOT_AVAILABLE",
            CalculationError::CityNotResolved => "CITY_NOT_RESOLVED",
            CalculationError::Pricing(_) => "CALCULATION_ERROR",
        }
    }
}

pub struct TariffCalculator {
    form: CalculatorForm,
    language: Language,
    catalog: Arc<Catalog>,
}

impl TariffCalculator {
    pub fn new(catalog: Arc<Catalog>, language: Language) -> Self {
        Self {
            form: CalculatorForm::default(),
            language,
            catalog,
        }
    }

    /// Calculador con un formulario ya relleno (peticiones HTTP sin estado)
    pub fn with_form(form: CalculatorForm, catalog: Arc<Catalog>, language: Language) -> Self {
        Self { form, language, catalog }
    }

    pub fn form(&self) -> &CalculatorForm {
        &self.form
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn set_origin(&mut self, city: Option<CityRef>) {
        self.form.origin = city;
    }

    pub fn set_destination(&mut self, city: Option<CityRef>) {
        self.form.destination = city;
    }

    /// Rechaza elegir tarifa antes de tener ambas ciudades
    pub fn set_tariff_type(&mut self, tariff_type: Option<TariffType>) -> Result<(), FormError> {
        if tariff_type.is_some() && (self.form.origin.is_none() || self.form.destination.is_none()) {
            return Err(FormError::SelectCitiesFirst);
        }
        self.form.tariff_type = tariff_type;
        Ok(())
    }

    pub fn set_weight(&mut self, weight: impl Into<String>) {
        self.form.weight = weight.into();
    }

    pub fn swap_cities(&mut self) {
        std::mem::swap(&mut self.form.origin, &mut self.form.destination);
    }

    /// Vacía el formulario; idioma y catálogo se conservan
    pub fn reset(&mut self) {
        self.form = CalculatorForm::default();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;
    }

    /// Nombre con el que se busca la ciudad en el índice
    fn match_name<'a>(&'a self, city: &'a CityRef) -> Option<&'a str> {
        match city {
            CityRef::Named { name, .. } => Some(name.as_str()),
            CityRef::Localized { .. } => self.catalog.cities.resolve(city).map(|c| c.name.as_str()),
        }
    }

    fn upstream_city(&self, city: &CityRef) -> Option<&ApiCity> {
        self.catalog.cities.resolve(city)
    }

    /// Veredicto actual, recalculado en cada llamada
    pub fn evaluate(&self) -> EligibilityVerdict {
        let verdict = self.compute_verdict();
        debug!(
            tariff = ?self.form.tariff_type,
            coverage = self.catalog.coverage.status(),
            disabled = verdict.disabled,
            warning = ?verdict.warning_kind(),
            "🔍 Elegibilidad evaluada"
        );
        verdict
    }

    fn compute_verdict(&self) -> EligibilityVerdict {
        let (Some(tariff), Some(origin), Some(destination)) =
            (self.form.tariff_type, &self.form.origin, &self.form.destination)
        else {
            return EligibilityVerdict::allowed();
        };

        let origin_display = display_name(origin, self.language);
        let destination_display = display_name(destination, self.language);

        match &self.catalog.coverage {
            Coverage::Loading => return EligibilityVerdict::allowed(),
            Coverage::Unavailable { .. } => {
                if !tariff.requires_service_points() {
                    return EligibilityVerdict::allowed();
                }
                return EligibilityVerdict::advisory(EligibilityWarning::new(
                    WarningKind::CoverageUnverified,
                    Some(origin_display),
                    Some(destination_display),
                ));
            }
            Coverage::Ready(_) => {}
        }

        let (origin_match, destination_match) = match (self.match_name(origin), self.match_name(destination)) {
            (Some(o), Some(d)) => (o, d),
            _ if !tariff.requires_service_points() => return EligibilityVerdict::allowed(),
            _ => {
                return EligibilityVerdict::blocked(EligibilityWarning::new(
                    WarningKind::CityNotResolved,
                    Some(origin_display),
                    Some(destination_display),
                ))
            }
        };

        let query = EligibilityQuery {
            tariff_type: Some(tariff),
            origin: Some(CityNames::new(origin_match, origin_display)),
            destination: Some(CityNames::new(destination_match, destination_display)),
        };
        eligibility::resolve(&query, self.catalog.lookup())
    }

    pub fn is_calculation_disabled(&self) -> bool {
        self.evaluate().disabled
    }

    pub fn get_warning(&self) -> WarningView {
        WarningView::from_verdict(&self.evaluate(), self.language)
    }

    fn coordinates_of(&self, city: &CityRef) -> Result<Coordinates, CalculationError> {
        self.upstream_city(city)
            .and_then(ApiCity::coordinates)
            .ok_or(CalculationError::CityNotResolved)
    }

    /// Valida el formulario y construye la petición de precios
    pub fn prepare_request(&self) -> Result<PriceRequest, CalculationError> {
        let (Some(origin), Some(destination), Some(tariff_type)) =
            (&self.form.origin, &self.form.destination, self.form.tariff_type)
        else {
            return Err(CalculationError::IncompleteForm);
        };
        if self.form.weight.trim().is_empty() {
            return Err(CalculationError::IncompleteForm);
        }

        let weight_kg = parse_weight(&self.form.weight).map_err(|_| CalculationError::InvalidWeight)?;

        let verdict = self.evaluate();
        if verdict.disabled {
            let warning = verdict
                .warning
                .unwrap_or_else(|| EligibilityWarning::new(WarningKind::CityNotResolved, None, None));
            return Err(CalculationError::Blocked(warning));
        }

        Ok(PriceRequest {
            from: self.coordinates_of(origin)?,
            to: self.coordinates_of(destination)?,
            weight_kg,
            tariff_type,
        })
    }

    /// Pide precios a upstream solo si el formulario pasa todas las comprobaciones
    pub async fn calculate(&self, pricing: &dyn PricingProvider) -> Result<PriceList, CalculationError> {
        let request = match self.prepare_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(reason = e.code(), "⛔ Cálculo no emitido: {}", e);
                return Err(e);
            }
        };

        info!(
            tariff = %request.tariff_type,
            weight_kg = request.weight_kg,
            "💰 Calculando tarifa ({:.4},{:.4}) -> ({:.4},{:.4})",
            request.from.lat,
            request.from.lon,
            request.to.lat,
            request.to.lon
        );

        match pricing.fetch_prices(&request).await {
            Ok(prices) => {
                info!("✅ {} opciones de precio recibidas", prices.list.len());
                Ok(prices)
            }
            Err(e) => {
                warn!("❌ Error calculando tarifa: {}", e);
                Err(CalculationError::Pricing(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::city::{CityDirectory, LocalizedNames};
    use crate::models::service_point::ServicePointKind;
    use crate::services::service_point_index::tests::point;
    use crate::services::service_point_index::ServicePointIndex;
    use crate::utils::errors::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPricing {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingPricing {
        fn new(fail: bool) -> Self {
            Self { calls: AtomicUsize::new(0), fail }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PricingProvider for CountingPricing {
        async fn fetch_prices(&self, _request: &PriceRequest) -> AppResult<PriceList> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::ExternalApi("503 Service Unavailable".to_string()));
            }
            Ok(PriceList::default())
        }
    }

    fn api_city(id: i64, name: &str) -> ApiCity {
        ApiCity {
            id,
            name: name.to_string(),
            center_latitude: Some(41.0 + id as f64 / 100.0),
            center_longitude: Some(64.0 + id as f64 / 100.0),
            country_id: Some(234),
            status: Some("active".to_string()),
        }
    }

    fn named(id: i64, name: &str) -> CityRef {
        CityRef::Named { id, name: name.to_string() }
    }

    fn catalog() -> Arc<Catalog> {
        let cities = CityDirectory::new(vec![
            api_city(1, "Toshkent shahri"),
            api_city(2, "Buxoro shahri"),
            api_city(3, "Nukus shahri"),
        ]);
        let index = ServicePointIndex::new(vec![
            point(10, "Toshkent shahri", ServicePointKind::Office),
            point(11, "Toshkent shahri", ServicePointKind::Locker),
            point(12, "Buxoro shahri", ServicePointKind::Office),
        ]);
        Arc::new(Catalog::ready(cities, index))
    }

    fn filled(tariff: TariffType, origin: CityRef, destination: CityRef) -> TariffCalculator {
        let mut calculator = TariffCalculator::new(catalog(), Language::En);
        calculator.set_origin(Some(origin));
        calculator.set_destination(Some(destination));
        calculator.set_tariff_type(Some(tariff)).unwrap();
        calculator.set_weight("2.5");
        calculator
    }

    #[test]
    fn test_tariff_requires_cities_first() {
        let mut calculator = TariffCalculator::new(catalog(), Language::Ru);
        calculator.set_origin(Some(named(1, "Toshkent shahri")));
        assert_eq!(
            calculator.set_tariff_type(Some(TariffType::DoorDoor)),
            Err(FormError::SelectCitiesFirst)
        );
        assert!(calculator.form().tariff_type.is_none());
        assert!(calculator.set_tariff_type(None).is_ok());
    }

    #[test]
    fn test_incomplete_form_has_no_warning() {
        let mut calculator = TariffCalculator::new(catalog(), Language::En);
        calculator.set_origin(Some(named(3, "Nukus shahri")));
        assert!(!calculator.is_calculation_disabled());
        assert!(!calculator.get_warning().show);
    }

    #[test]
    fn test_destination_locker_missing_blocks() {
        let calculator = filled(TariffType::DoorPostamat, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        assert!(calculator.is_calculation_disabled());
        let view = calculator.get_warning();
        assert!(view.show);
        assert_eq!(view.kind, Some(WarningKind::NoDestinationLocker));
        assert!(view.message.contains("Nukus shahri"));
    }

    #[test]
    fn test_swap_cities_reevaluates() {
        let mut calculator = filled(TariffType::OfficeDoor, named(3, "Nukus shahri"), named(2, "Buxoro shahri"));
        assert_eq!(calculator.get_warning().kind, Some(WarningKind::NoOriginOffice));
        calculator.swap_cities();
        assert!(!calculator.is_calculation_disabled());
    }

    #[test]
    fn test_language_switch_rerenders_message() {
        let names = LocalizedNames {
            uz: "Nukus shahri".to_string(),
            ru: "город Нукус".to_string(),
            en: "Nukus city".to_string(),
        };
        let destination = CityRef::Localized { shipox_id: 3, region_id: None, names };
        let mut calculator = filled(TariffType::OfficeOffice, named(1, "Toshkent shahri"), destination);

        let english = calculator.get_warning();
        assert!(english.message.contains("Nukus city"));

        calculator.set_language(Language::Ru);
        let russian = calculator.get_warning();
        assert_eq!(russian.kind, english.kind);
        assert!(russian.message.contains("город Нукус"));
    }

    #[test]
    fn test_unresolved_localized_city_blocks_service_point_tariffs() {
        let names = LocalizedNames {
            uz: "Xiva shahri".to_string(),
            ru: "город Хива".to_string(),
            en: "Khiva city".to_string(),
        };
        let khiva = CityRef::Localized { shipox_id: 999, region_id: None, names };
        let calculator = filled(TariffType::OfficeOffice, named(1, "Toshkent shahri"), khiva.clone());
        assert!(calculator.is_calculation_disabled());
        assert_eq!(calculator.get_warning().kind, Some(WarningKind::CityNotResolved));

        let calculator = filled(TariffType::DoorDoor, named(1, "Toshkent shahri"), khiva);
        assert!(!calculator.is_calculation_disabled());
    }

    #[test]
    fn test_unavailable_coverage_is_advisory() {
        let catalog = Arc::new(Catalog::unavailable(
            CityDirectory::new(vec![api_city(1, "Toshkent shahri"), api_city(3, "Nukus shahri")]),
            "connection reset",
        ));
        let mut calculator = filled(TariffType::OfficeOffice, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        calculator.set_catalog(catalog);
        assert!(!calculator.is_calculation_disabled());
        assert_eq!(calculator.get_warning().kind, Some(WarningKind::CoverageUnverified));

        calculator.set_tariff_type(Some(TariffType::DoorDoor)).unwrap();
        assert!(!calculator.get_warning().show);
    }

    #[test]
    fn test_loading_catalog_defers() {
        let mut calculator = filled(TariffType::OfficeOffice, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        calculator.set_catalog(Arc::new(Catalog::loading()));
        assert!(!calculator.is_calculation_disabled());
        assert!(!calculator.get_warning().show);
    }

    #[test]
    fn test_reset_keeps_language() {
        let mut calculator = filled(TariffType::DoorDoor, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        calculator.set_language(Language::Uz);
        calculator.reset();
        assert_eq!(calculator.form(), &CalculatorForm::default());
        assert_eq!(calculator.language(), Language::Uz);
    }

    #[tokio::test]
    async fn test_blocked_selection_issues_no_request() {
        let pricing = CountingPricing::new(false);
        let calculator = filled(TariffType::OfficeOffice, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        let result = calculator.calculate(&pricing).await;
        assert!(matches!(result, Err(CalculationError::Blocked(_))));
        assert_eq!(pricing.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_weight_issues_no_request() {
        let pricing = CountingPricing::new(false);
        for weight in ["", "abc", "0", "-3"] {
            let mut calculator = filled(TariffType::DoorDoor, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
            calculator.set_weight(weight);
            assert!(calculator.calculate(&pricing).await.is_err());
        }
        assert_eq!(pricing.calls(), 0);
    }

    #[test]
    fn test_heavy_parcel_is_priced() {
        let mut calculator = filled(TariffType::DoorDoor, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        calculator.set_weight("1500");
        let request = calculator.prepare_request().unwrap();
        assert_eq!(request.weight_kg, 1500.0);
        assert_eq!(request.tariff_type, TariffType::DoorDoor);
    }

    #[tokio::test]
    async fn test_allowed_selection_issues_one_request() {
        let pricing = CountingPricing::new(false);
        let calculator = filled(TariffType::OfficeOffice, named(1, "Toshkent shahri"), named(2, "Buxoro shahri"));
        assert!(calculator.calculate(&pricing).await.is_ok());
        assert_eq!(pricing.calls(), 1);
    }

    #[tokio::test]
    async fn test_pricing_failure_is_not_an_eligibility_warning() {
        let pricing = CountingPricing::new(true);
        let calculator = filled(TariffType::DoorDoor, named(1, "Toshkent shahri"), named(3, "Nukus shahri"));
        let error = calculator.calculate(&pricing).await.unwrap_err();
        assert!(matches!(error, CalculationError::Pricing(_)));
        assert_eq!(error.message(Language::En), "An error occurred while calculating tariff");
        assert!(!calculator.is_calculation_disabled());
        assert!(calculator.calculate(&pricing).await.is_err());
        assert_eq!(pricing.calls(), 2);
    }

    #[tokio::test]
    async fn test_door_door_with_unknown_city_fails_at_gating() {
        let pricing = CountingPricing::new(false);
        let calculator = filled(TariffType::DoorDoor, named(1, "Toshkent shahri"), named(77, "Muynoq"));
        let error = calculator.calculate(&pricing).await.unwrap_err();
        assert_eq!(error, CalculationError::CityNotResolved);
        assert_eq!(pricing.calls(), 0);
    }
}
