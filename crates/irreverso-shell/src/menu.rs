//! Hidden menu entries

use irreverso_core::Language;

use crate::{Labels, Route};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub route: Route,
    pub label: &'static str,
    pub meta: &'static str,
}

impl MenuItem {
    pub fn href(&self) -> &'static str {
        self.route.path()
    }
}

/// Menu entries in display order
pub fn items(language: Language) -> Vec<MenuItem> {
    let labels = Labels::for_language(language);
    let meta = |pt: &'static str, en: &'static str, es: &'static str| match language {
        Language::Pt => pt,
        Language::En => en,
        Language::Es => es,
    };
    vec![
        MenuItem {
            route: Route::Archive,
            label: labels.archive,
            meta: meta("índice zeta", "zeta index", "índice zeta"),
        },
        MenuItem {
            route: Route::Summary,
            label: labels.summary,
            meta: meta("sem spoiler", "no spoilers", "sin spoilers"),
        },
        MenuItem {
            route: Route::FutureNews,
            label: labels.future_news,
            meta: "2060→2107",
        },
        MenuItem {
            route: Route::AiFeatures,
            label: labels.ai_features,
            meta: meta("instâncias", "instances", "instancias"),
        },
        MenuItem {
            route: Route::Protocols,
            label: labels.protocols,
            meta: meta("regras", "rules", "reglas"),
        },
        MenuItem {
            route: Route::Signals,
            label: labels.signals,
            meta: "2026",
        },
        MenuItem {
            route: Route::Members,
            label: labels.members,
            meta: meta("restrito", "restricted", "restringido"),
        },
    ]
}
