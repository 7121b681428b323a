//! Resolvedor de elegibilidad de tarifas
//!
//! Función pura: (tipo de tarifa, ciudad de origen, ciudad de destino,
//! índice de puntos de servicio) -> veredicto. No guarda estado ni registra
//! nada; el orquestador es quien emite los eventos de diagnóstico.
//!
//! Orden de precedencia de los avisos (gana el primero que aplica):
//! 1. fallan origen y destino -> mensaje combinado
//! 2. falla solo el origen
//! 3. falla solo el destino
//! 4. todo cubierto -> sin aviso

use serde::{Deserialize, Serialize};

use crate::models::tariff::{DestinationRequirement, OriginRequirement, TariffType};
use crate::services::service_point_index::ServicePointLookup;
use crate::utils::i18n::{self, Language, MessageKey};

/// Ciudad ya resuelta por el llamador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityNames<'a> {
    /// Nombre que se compara con el campo `city` de los puntos
    pub match_name: &'a str,
    /// Nombre visible en el idioma activo, solo para interpolar mensajes
    pub display_name: &'a str,
}

impl<'a> CityNames<'a> {
    pub fn new(match_name: &'a str, display_name: &'a str) -> Self {
        Self { match_name, display_name }
    }

    /// Misma cadena para comparar y para mostrar
    pub fn same(name: &'a str) -> Self {
        Self::new(name, name)
    }
}

/// Selección actual sobre la que se decide
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityQuery<'a> {
    pub tariff_type: Option<TariffType>,
    pub origin: Option<CityNames<'a>>,
    pub destination: Option<CityNames<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    /// Ni origen ni destino tienen oficina
    NoOfficeInEitherCity,
    NoOriginOffice,
    NoDestinationOffice,
    NoDestinationLocker,
    /// Sin oficina en origen y sin postamat en destino
    NoOriginOfficeAndDestinationLocker,
    /// El índice no se pudo cargar; no se bloquea
    CoverageUnverified,
    /// La ciudad seleccionada no tiene equivalente upstream
    CityNotResolved,
}

impl WarningKind {
    fn message_key(self) -> MessageKey {
        match self {
            WarningKind::NoOfficeInEitherCity => MessageKey::NoWarehouses,
            WarningKind::NoOriginOffice => MessageKey::NoOriginWarehouse,
            WarningKind::NoDestinationOffice => MessageKey::NoDestinationWarehouse,
            WarningKind::NoDestinationLocker => MessageKey::NoDestinationLocker,
            WarningKind::NoOriginOfficeAndDestinationLocker => {
                MessageKey::NoOriginWarehouseAndDestinationLocker
            }
            WarningKind::CoverageUnverified => MessageKey::CoverageUnverified,
            WarningKind::CityNotResolved => MessageKey::CityNotResolved,
        }
    }
}

/// Aviso estructurado con las ciudades implicadas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityWarning {
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
}

impl EligibilityWarning {
    pub fn new(kind: WarningKind, origin_city: Option<&str>, destination_city: Option<&str>) -> Self {
        Self {
            kind,
            origin_city: origin_city.map(str::to_string),
            destination_city: destination_city.map(str::to_string),
        }
    }

    /// Texto del aviso en el idioma indicado
    pub fn render(&self, language: Language) -> String {
        let origin = self.origin_city.as_deref().unwrap_or("");
        let destination = self.destination_city.as_deref().unwrap_or("");

        let city = match self.kind {
            WarningKind::NoOriginOffice => origin,
            _ => destination,
        };

        i18n::render(
            language,
            self.kind.message_key(),
            &[
                ("city", city),
                ("originCity", origin),
                ("destinationCity", destination),
            ],
        )
    }
}

/// Resultado de la evaluación
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    /// Si se debe bloquear el cálculo
    pub disabled: bool,
    pub warning: Option<EligibilityWarning>,
}

impl EligibilityVerdict {
    /// Sin aviso y sin bloqueo
    pub fn allowed() -> Self {
        Self::default()
    }

    pub fn blocked(warning: EligibilityWarning) -> Self {
        Self {
            disabled: true,
            warning: Some(warning),
        }
    }

    /// Aviso informativo que no bloquea
    pub fn advisory(warning: EligibilityWarning) -> Self {
        Self {
            disabled: false,
            warning: Some(warning),
        }
    }

    pub fn warning_kind(&self) -> Option<WarningKind> {
        self.warning.as_ref().map(|w| w.kind)
    }
}

/// Forma `{show, kind, message}` que consume la capa de presentación
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningView {
    pub show: bool,
    pub kind: Option<WarningKind>,
    pub message: String,
}

impl WarningView {
    pub fn hidden() -> Self {
        Self {
            show: false,
            kind: None,
            message: String::new(),
        }
    }

    pub fn from_verdict(verdict: &EligibilityVerdict, language: Language) -> Self {
        match &verdict.warning {
            Some(warning) => Self {
                show: true,
                kind: Some(warning.kind),
                message: warning.render(language),
            },
            None => Self::hidden(),
        }
    }
}

fn origin_satisfied(requirement: OriginRequirement, city: &str, index: &dyn ServicePointLookup) -> bool {
    match requirement {
        OriginRequirement::None => true,
        OriginRequirement::Office => index.has_office(city),
    }
}

fn destination_satisfied(
    requirement: DestinationRequirement,
    city: &str,
    index: &dyn ServicePointLookup,
) -> bool {
    match requirement {
        DestinationRequirement::None => true,
        DestinationRequirement::Office => index.has_office(city),
        DestinationRequirement::Locker => index.has_locker(city),
    }
}

/// Decide si la selección está cubierta por la tarifa elegida.
///
/// `index == None` significa "todavía no cargado": igual que con datos
/// incompletos, se difiere el juicio (sin aviso, sin bloqueo).
pub fn resolve(query: &EligibilityQuery<'_>, index: Option<&dyn ServicePointLookup>) -> EligibilityVerdict {
    let (Some(tariff), Some(origin), Some(destination), Some(index)) =
        (query.tariff_type, query.origin, query.destination, index)
    else {
        return EligibilityVerdict::allowed();
    };

    let origin_requirement = tariff.origin_requirement();
    let destination_requirement = tariff.destination_requirement();

    let origin_ok = origin_satisfied(origin_requirement, origin.match_name, index);
    let destination_ok = destination_satisfied(destination_requirement, destination.match_name, index);

    let origin_name = Some(origin.display_name);
    let destination_name = Some(destination.display_name);

    let warning = match (origin_ok, destination_ok) {
        (true, true) => return EligibilityVerdict::allowed(),
        (false, false) => {
            let kind = match destination_requirement {
                DestinationRequirement::Locker => WarningKind::NoOriginOfficeAndDestinationLocker,
                DestinationRequirement::Office | DestinationRequirement::None => {
                    WarningKind::NoOfficeInEitherCity
                }
            };
            EligibilityWarning::new(kind, origin_name, destination_name)
        }
        (false, true) => EligibilityWarning::new(WarningKind::NoOriginOffice, origin_name, None),
        (true, false) => {
            let kind = match destination_requirement {
                DestinationRequirement::Locker => WarningKind::NoDestinationLocker,
                DestinationRequirement::Office | DestinationRequirement::None => {
                    WarningKind::NoDestinationOffice
                }
            };
            EligibilityWarning::new(kind, None, destination_name)
        }
    };

    EligibilityVerdict::blocked(warning)
}
