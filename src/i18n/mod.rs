//! Locale lookup for the strings the core renders.
//!
//! [`Locale`] is the seam the host implements to plug in its own dictionary.
//! [`Translations`] is the bundled implementation: per-language override
//! tables from configuration, falling back to English and then to the
//! built-in strings.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source of user-facing strings.
pub trait Locale {
    /// Looks up `key`. Unknown keys come back as the key itself.
    fn t(&self, key: &str) -> String;

    /// Whether the layout runs right-to-left.
    fn is_rtl(&self) -> bool;

    /// Looks up `key` and substitutes `{name}` placeholders.
    fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.t(key), |text, (name, value)| text.replace(&format!("{{{name}}}"), value))
    }
}

/// Storefront languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }
}

/// Override tables keyed by language, as read from `[translations.<lang>]`.
pub type TranslationTables = BTreeMap<Language, BTreeMap<String, String>>;

/// Bundled [`Locale`].
///
/// ```
/// use storefront_core::i18n::{Language, Locale, Translations};
///
/// let locale = Translations::new(Language::Ar, Default::default());
/// assert!(locale.is_rtl());
/// assert_eq!(locale.t("cart.title"), "Your bag");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translations {
    language: Language,
    tables: TranslationTables,
}

impl Translations {
    #[must_use]
    pub const fn new(language: Language, tables: TranslationTables) -> Self {
        Self { language, tables }
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.tables.get(&language)?.get(key).map(String::as_str)
    }
}

impl Locale for Translations {
    fn t(&self, key: &str) -> String {
        self.lookup(self.language, key)
            .or_else(|| self.lookup(Language::En, key))
            .or_else(|| builtin::english(key))
            .map_or_else(
                || {
                    tracing::trace!(key, language = self.language.code(), "missing translation");
                    key.to_string()
                },
                str::to_string,
            )
    }

    fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> TranslationTables {
        let mut tables = TranslationTables::new();
        tables.insert(
            Language::Ar,
            [("cart.title".to_string(), "حقيبتك".to_string())].into_iter().collect(),
        );
        tables.insert(
            Language::En,
            [("cart.empty".to_string(), "Nothing here yet".to_string())].into_iter().collect(),
        );
        tables
    }

    #[test]
    fn falls_back_language_then_english_then_builtin() {
        let locale = Translations::new(Language::Ar, tables());
        assert_eq!(locale.t("cart.title"), "حقيبتك");
        assert_eq!(locale.t("cart.empty"), "Nothing here yet");
        assert_eq!(locale.t("cart.subtotal"), "Subtotal");
        assert_eq!(locale.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn placeholders_are_substituted() {
        let locale = Translations::default();
        assert_eq!(
            locale.t_with("search.no_results", &[("term", "zzz")]),
            "No results found for \"zzz\""
        );
    }

    #[test]
    fn only_arabic_is_rtl() {
        assert!(!Translations::default().is_rtl());
        assert!(Language::Ar.is_rtl());
    }
}
