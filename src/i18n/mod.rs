//! Locale selection and the key -> string lookup used by every projection.
//!
//! Lookups never fail: a key missing from the active locale degrades to the
//! raw key so untranslated strings stay visible instead of going blank.

mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Translation keys shared between the form, the presenter and the exporter.
pub mod keys {
    pub const BELOW_AVERAGE: &str = "below_average";
    pub const FAIR: &str = "fair";
    pub const GOOD: &str = "good";
    pub const EXCELLENT: &str = "excellent";
    pub const INVALID: &str = "invalid";

    pub const VALUE_OUT_OF_RANGE: &str = "value_out_of_range";
    pub const EXPORT_FAILED: &str = "export_failed";

    pub const MALE: &str = "male";
    pub const FEMALE: &str = "female";

    pub const RESULT_TITLE: &str = "result_title";
    pub const FULL_NAME: &str = "full_name";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const MOVEMENT_TEST: &str = "movement_test";
    pub const OUTCOME_TEST: &str = "outcome_test";
    pub const FINAL_TOTAL_SCORE: &str = "final_total_score";
    pub const MSG_AFFIRMATIVE: &str = "msg_affirmative";
    pub const MSG_ENCOURAGING: &str = "msg_encouraging";
    pub const THANK_YOU: &str = "thank_you";
    pub const DOWNLOAD_PDF: &str = "download_pdf";
    pub const GENERATING: &str = "generating";
    pub const SCORE_PLACEHOLDER: &str = "score_placeholder";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Id,
    En,
}

impl Locale {
    pub const fn ordered() -> [Self; 2] {
        [Self::Id, Self::En]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::En => "en",
        }
    }

    /// Name shown on the language toggle while this locale is active.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Id => "Indonesia",
            Self::En => "English",
        }
    }

    /// Next locale in toggle order, wrapping around.
    pub fn toggled(self) -> Self {
        let ordered = Self::ordered();
        let position = ordered
            .iter()
            .position(|locale| *locale == self)
            .unwrap_or_default();
        ordered[(position + 1) % ordered.len()]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}' (expected one of: id, en)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" | "id-id" | "indonesia" | "indonesian" => Ok(Self::Id),
            "en" | "en-us" | "en-gb" | "english" => Ok(Self::En),
            _ => Err(UnknownLocale(raw.to_string())),
        }
    }
}

/// Per-locale translation tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<Locale, HashMap<String, String>>,
}

impl Catalog {
    /// Catalog preloaded with the bundled Indonesian and English strings.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (locale, entries) in [(Locale::Id, catalog::ID), (Locale::En, catalog::EN)] {
            for &(key, value) in entries {
                catalog.insert(locale, key, value);
            }
        }
        catalog
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, value: impl Into<String>) {
        self.tables
            .entry(locale)
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn remove(&mut self, locale: Locale, key: &str) -> Option<String> {
        self.tables.get_mut(&locale)?.remove(key)
    }

    pub fn lookup<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.tables
            .get(&locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }
}
