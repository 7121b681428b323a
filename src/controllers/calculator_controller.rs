use std::sync::Arc;

use crate::dto::calculator_dto::{CalculatorRequest, EligibilityResponse};
use crate::dto::tariff_dto::TariffCalculationResponse;
use crate::services::calculator::{CalculationError, TariffCalculator};
use crate::services::catalog::Catalog;
use crate::services::eligibility::WarningView;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::i18n::Language;

/// Traduce un cálculo no emitido o fallido a error HTTP con texto localizado
fn calculation_error(error: CalculationError, language: Language) -> AppError {
    let message = error.message(language);
    match error {
        CalculationError::IncompleteForm | CalculationError::InvalidWeight => AppError::BadRequest(message),
        CalculationError::Blocked(_) | CalculationError::CityNotResolved => AppError::TariffNotAvailable(message),
        CalculationError::Pricing(detail) => AppError::ExternalApi(format!("{} ({})", message, detail)),
    }
}

/// Calculador sin estado: cada request trae la selección completa
pub struct CalculatorController {
    state: AppState,
}

impl CalculatorController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn build(&self, request: CalculatorRequest, catalog: Arc<Catalog>) -> AppResult<TariffCalculator> {
        let language = request.language.unwrap_or(self.state.config.default_language);
        let mut calculator = TariffCalculator::new(catalog, language);

        calculator.set_origin(request.origin);
        calculator.set_destination(request.destination);
        calculator
            .set_tariff_type(request.tariff_type)
            .map_err(|e| AppError::BadRequest(e.message(language)))?;
        if let Some(weight) = request.weight {
            calculator.set_weight(weight.as_text());
        }

        Ok(calculator)
    }

    pub async fn eligibility(&self, request: CalculatorRequest) -> AppResult<EligibilityResponse> {
        let catalog = self.state.catalog().await;
        let calculator = self.build(request, catalog)?;

        let verdict = calculator.evaluate();
        let warning = WarningView::from_verdict(&verdict, calculator.language());

        Ok(EligibilityResponse {
            disabled: verdict.disabled,
            warning,
            coverage: calculator.catalog().coverage.status(),
            language: calculator.language(),
        })
    }

    pub async fn quote(&self, request: CalculatorRequest) -> AppResult<TariffCalculationResponse> {
        let catalog = self.state.catalog().await;
        let calculator = self.build(request, catalog)?;
        let language = calculator.language();

        let prices = calculator
            .calculate(self.state.pricing.as_ref())
            .await
            .map_err(|e| calculation_error(e, language))?;
        Ok(prices.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::eligibility::{EligibilityWarning, WarningKind};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_calculation_error_statuses() {
        let blocked = CalculationError::Blocked(EligibilityWarning::new(
            WarningKind::NoOriginOffice,
            Some("Xiva"),
            None,
        ));
        let cases = [
            (CalculationError::IncompleteForm, StatusCode::BAD_REQUEST),
            (CalculationError::InvalidWeight, StatusCode::BAD_REQUEST),
            (blocked, StatusCode::UNPROCESSABLE_ENTITY),
            (CalculationError::CityNotResolved, StatusCode::UNPROCESSABLE_ENTITY),
            (CalculationError::Pricing("timeout".to_string()), StatusCode::BAD_GATEWAY),
        ];
        for (error, status) in cases {
            assert_eq!(calculation_error(error, Language::Ru).into_response().status(), status);
        }
    }
}
