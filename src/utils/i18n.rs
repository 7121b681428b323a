//! Mensajes localizados
//!
//! Plantillas de los mensajes que el backend devuelve ya renderizados a la capa
//! de presentación, en los tres idiomas soportados. Las plantillas usan
//! marcadores `{nombre}` que se sustituyen con `format_message`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").expect("placeholder regex");
}

/// Idioma activo de la interfaz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
    Uz,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ru, Language::En, Language::Uz];

    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Uz => "uz",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            "uz" => Ok(Language::Uz),
            other => Err(format!("idioma no soportado: '{}'", other)),
        }
    }
}

/// Claves de los mensajes que produce el backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    NoOriginWarehouse,
    NoDestinationWarehouse,
    NoWarehouses,
    NoDestinationLocker,
    NoOriginWarehouseAndDestinationLocker,
    CoverageUnverified,
    CityNotResolved,
    FillAllFields,
    SelectCitiesFirst,
    CorrectWeight,
    CalculationError,
}

/// Plantilla de un mensaje en el idioma indicado
pub fn template(language: Language, key: MessageKey) -> &'static str {
    use MessageKey::*;

    match language {
        Language::Ru => match key {
            NoOriginWarehouse => "В городе отправки \"{city}\" нет пункта выдачи Fargo",
            NoDestinationWarehouse => "В городе доставки \"{city}\" нет пункта выдачи Fargo",
            NoWarehouses => "В городах отправки \"{originCity}\" и доставки \"{destinationCity}\" нет пунктов выдачи Fargo",
            NoDestinationLocker => "В городе доставки \"{city}\" нет постамата Fargo",
            NoOriginWarehouseAndDestinationLocker => "В городе отправки \"{originCity}\" нет пункта выдачи Fargo, а в городе доставки \"{destinationCity}\" нет постамата Fargo",
            CoverageUnverified => "Не удалось загрузить список пунктов выдачи Fargo. Доступность услуг в выбранных городах не проверена",
            CityNotResolved => "Невозможно проверить доступность услуг в выбранных городах. Попробуйте выбрать другие города.",
            FillAllFields => "Пожалуйста, заполните все поля",
            SelectCitiesFirst => "Сначала выберите города отправления и назначения",
            CorrectWeight => "Пожалуйста, введите корректный вес",
            CalculationError => "Произошла ошибка при расчете тарифов",
        },
        Language::En => match key {
            NoOriginWarehouse => "No Fargo pickup point in origin city \"{city}\"",
            NoDestinationWarehouse => "No Fargo pickup point in destination city \"{city}\"",
            NoWarehouses => "No Fargo pickup points in origin city \"{originCity}\" and destination city \"{destinationCity}\"",
            NoDestinationLocker => "No Fargo locker in destination city \"{city}\"",
            NoOriginWarehouseAndDestinationLocker => "No Fargo pickup point in origin city \"{originCity}\" and no locker in destination city \"{destinationCity}\"",
            CoverageUnverified => "Fargo pickup point list could not be loaded. Service availability in the selected cities was not verified",
            CityNotResolved => "Unable to verify service availability in the selected cities. Try selecting other cities.",
            FillAllFields => "Please fill in all fields",
            SelectCitiesFirst => "Please select origin and destination cities first",
            CorrectWeight => "Please enter a valid weight",
            CalculationError => "An error occurred while calculating tariff",
        },
        Language::Uz => match key {
            NoOriginWarehouse => "Jo'natish shahri \"{city}\"da Fargo yetkazib berish punkti yo'q",
            NoDestinationWarehouse => "Yetkazish shahri \"{city}\"da Fargo yetkazib berish punkti yo'q",
            NoWarehouses => "Jo'natish shahri \"{originCity}\" va yetkazish shahri \"{destinationCity}\"da Fargo yetkazib berish punktlari yo'q",
            NoDestinationLocker => "Yetkazish shahri \"{city}\"da Fargo postamati yo'q",
            NoOriginWarehouseAndDestinationLocker => "Jo'natish shahri \"{originCity}\"da Fargo yetkazib berish punkti yo'q va yetkazish shahri \"{destinationCity}\"da postamat yo'q",
            CoverageUnverified => "Fargo punktlari ro'yxatini yuklab bo'lmadi. Tanlangan shaharlarda xizmat mavjudligi tekshirilmadi",
            CityNotResolved => "Tanlangan shaharlarda xizmat mavjudligini tekshirib bo'lmadi. Boshqa shaharlarni tanlang.",
            FillAllFields => "Iltimos, barcha maydonlarni to'ldiring",
            SelectCitiesFirst => "Avval jo'natish va yetkazish shaharlarini tanlang",
            CorrectWeight => "Iltimos, to'g'ri og'irlikni kiriting",
            CalculationError => "Tarif hisoblashda xatolik yuz berdi",
        },
    }
}

/// Sustituye cada `{nombre}` por el valor indicado.
///
/// Los marcadores sin valor se dejan tal cual en el texto.
pub fn format_message(template: &str, variables: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            variables
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Atajo: plantilla localizada + sustitución
pub fn render(language: Language, key: MessageKey, variables: &[(&str, &str)]) -> String {
    format_message(template(language, key), variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_replaces_known_placeholders() {
        let text = format_message("В городе {city} нет офиса", &[("city", "Бухара")]);
        assert_eq!(text, "В городе Бухара нет офиса");
    }

    #[test]
    fn test_format_message_keeps_unknown_placeholders() {
        let text = format_message("{originCity} -> {destinationCity}", &[("originCity", "Nukus")]);
        assert_eq!(text, "Nukus -> {destinationCity}");
    }

    #[test]
    fn test_format_message_repeated_placeholder() {
        let text = format_message("{city}/{city}", &[("city", "Xiva")]);
        assert_eq!(text, "Xiva/Xiva");
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("RU".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!(" uz ".parse::<Language>().unwrap(), Language::Uz);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Ru);
    }

    #[test]
    fn test_every_language_has_city_placeholder() {
        for language in Language::ALL {
            assert!(template(language, MessageKey::NoDestinationLocker).contains("{city}"));
            let combined = template(language, MessageKey::NoOriginWarehouseAndDestinationLocker);
            assert!(combined.contains("{originCity}"));
            assert!(combined.contains("{destinationCity}"));
        }
    }
}
