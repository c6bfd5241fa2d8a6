//! Display languages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IrreversoError;

/// Language of every narrative and log string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Pt,
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Pt, Language::En, Language::Es];

    /// Map a locale tag (`pt-BR`, `es_ES.UTF-8`, `en`) to a language.
    /// Anything unrecognized falls back to English.
    pub fn from_locale(locale: &str) -> Self {
        let tag = locale.trim().to_ascii_lowercase();
        if tag.starts_with("pt") {
            Language::Pt
        } else if tag.starts_with("es") {
            Language::Es
        } else {
            Language::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Decimal separator used when formatting percentages for humans
    pub fn decimal_separator(self) -> char {
        match self {
            Language::En => '.',
            Language::Pt | Language::Es => ',',
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = IrreversoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(IrreversoError::UnknownLanguage(other.to_string())),
        }
    }
}
