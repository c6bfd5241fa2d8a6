//! Host locale and time zone
//!
//! Language comes from `LC_ALL`, then `LC_MESSAGES`, then `LANG`. The
//! `C`/`POSIX` locales carry no language and are skipped. The zone comes
//! from `TZ`.

use std::env;

use irreverso_core::Language;

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

pub fn detect() -> Language {
    detect_with(|name| env::var(name).ok())
}

/// Detection over an arbitrary variable lookup
pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Language {
    LOCALE_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .map(|value| Language::from_locale(&value))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// IANA name such as `America/Sao_Paulo`
    pub name: String,
    /// Upper-cased first path segment, `AMERICA`
    pub region: String,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim_start_matches(':').trim();
        let name = if name.is_empty() { "UTC" } else { name };
        let region = name.split('/').next().unwrap_or("UNKNOWN").to_uppercase();
        Zone {
            name: name.to_string(),
            region,
        }
    }

    pub fn detect() -> Self {
        Zone::new(env::var("TZ").unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_precedence() {
        let vars = lookup(&[("LC_ALL", "pt_BR.UTF-8"), ("LANG", "es_ES.UTF-8")]);
        assert_eq!(detect_with(vars), Language::Pt);

        let vars = lookup(&[("LC_MESSAGES", "es_AR"), ("LANG", "pt_PT")]);
        assert_eq!(detect_with(vars), Language::Es);
    }

    #[test]
    fn test_skips_c_locale() {
        let vars = lookup(&[("LC_ALL", "C"), ("LANG", "pt_BR.UTF-8")]);
        assert_eq!(detect_with(vars), Language::Pt);
    }

    #[test]
    fn test_falls_back_to_english() {
        assert_eq!(detect_with(lookup(&[])), Language::En);
        assert_eq!(detect_with(lookup(&[("LANG", "de_DE")])), Language::En);
    }

    #[test]
    fn test_zone() {
        let zone = Zone::new("America/Sao_Paulo");
        assert_eq!(zone.region, "AMERICA");
        assert_eq!(Zone::new(":Europe/Lisbon").name, "Europe/Lisbon");
        assert_eq!(Zone::new("").name, "UTC");
        assert_eq!(Zone::new("").region, "UTC");
    }
}
