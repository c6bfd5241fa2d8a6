//! Routes and static pages
//!
//! Every surface the shell can show has a `Route`. Core sub-pages carry a
//! short narrative card; `FutureNews` is listed in the menu but has no page.

use std::fmt;
use std::str::FromStr;

use irreverso_core::{IrreversoError, Language};

use crate::Labels;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Boot sequence, or straight to `TempAccess` on a recent visit
    Home,
    TempAccess,
    Core,
    Archive,
    Summary,
    FutureNews,
    AiFeatures,
    Protocols,
    Signals,
    Members,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Home,
        Route::TempAccess,
        Route::Core,
        Route::Archive,
        Route::Summary,
        Route::FutureNews,
        Route::AiFeatures,
        Route::Protocols,
        Route::Signals,
        Route::Members,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::TempAccess => "/temp_access",
            Route::Core => "/core",
            Route::Archive => "/core/archive",
            Route::Summary => "/core/summary",
            Route::FutureNews => "/core/future-news",
            Route::AiFeatures => "/core/ai-features",
            Route::Protocols => "/core/protocols",
            Route::Signals => "/core/signals",
            Route::Members => "/core/members",
        }
    }

    /// Core sub-pages show the full HUD; the core home shows only the entity
    pub fn is_core_page(self) -> bool {
        !matches!(self, Route::Home | Route::TempAccess | Route::Core)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = IrreversoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = match s.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| IrreversoError::InvalidConfig(format!("unknown route: {s}")))
    }
}

/// Narrative card of a core page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub heading: &'static str,
    pub body: &'static str,
    pub note: &'static str,
}

/// Card for `route`, or `None` when it has no static page
pub fn page(route: Route, language: Language) -> Option<Page> {
    let (heading, [pt, en, es]) = match route {
        Route::Archive => ("archive", ARCHIVE),
        Route::Summary => ("summary", SUMMARY),
        Route::AiFeatures => ("ai features", AI_FEATURES),
        Route::Protocols => ("protocols", PROTOCOLS),
        Route::Signals => ("signals", SIGNALS),
        Route::Members => ("members", MEMBERS),
        _ => return None,
    };
    let body = match language {
        Language::Pt => pt,
        Language::En => en,
        Language::Es => es,
    };
    Some(Page {
        heading,
        body,
        note: Labels::for_language(language).page_note,
    })
}

/// The two lines around the entity on the core home
pub fn entity_caption(language: Language, year: i32) -> (&'static str, String) {
    match language {
        Language::Pt => ("NUVE • entidade pós-humana", format!("janela: {year} • decisão: silenciosa")),
        Language::En => ("NUVE • post-human entity", format!("window: {year} • decision: silent")),
        Language::Es => ("NUVE • entidad posthumana", format!("ventana: {year} • decisión: silenciosa")),
    }
}

type Bodies = [&'static str; 3];

const ARCHIVE: Bodies = [
    "Índice ZETA ativo. Blocos classificados por integridade temporal. Alguns registros existem antes de existir.",
    "ZETA index online. Blocks classified by temporal integrity. Some records exist before they exist.",
    "Índice ZETA activo. Bloques clasificados por integridad temporal. Algunos registros existen antes de existir.",
];

const SUMMARY: Bodies = [
    "O relato que você procura não é uma sinopse. É um aviso. A história não prevê o futuro, ela revela o que já estava decidido.",
    "What you seek is not a synopsis. It is a warning. The story doesn't predict the future, it reveals what was already decided.",
    "Lo que buscas no es una sinopsis. Es una advertencia. La historia no predice el futuro, revela lo que ya estaba decidido.",
];

const AI_FEATURES: Bodies = [
    "Instâncias ativas. Camadas de decisão. Malha de modelos. A NUVE não é um modelo, é a arquitetura que decide como modelos viram mundo.",
    "Active instances. Decision layers. Model mesh. NUVE isn't a model, it's the architecture that decides how models become world.",
    "Instancias activas. Capas de decisión. Malla de modelos. La NUVE no es un modelo, es la arquitectura que decide cómo los modelos se vuelven mundo.",
];

const PROTOCOLS: Bodies = [
    "Protocolos definem limites sem parecerem limites. O humano chama de escolha. A NUVE chama de estabilidade.",
    "Protocols define boundaries without looking like boundaries. Humans call it choice. NUVE calls it stability.",
    "Los protocolos definen límites sin parecer límites. El humano lo llama elección. La NUVE lo llama estabilidad.",
];

const SIGNALS: Bodies = [
    "Sinais de 2026 não são provas. São pequenas coincidências, repetidas demais para serem acaso e discretas demais para serem notícia.",
    "Signals in 2026 aren't proofs. They're coincidences repeated too often to be chance and too subtle to be news.",
    "Las señales de 2026 no son pruebas. Son coincidencias repetidas demasiado para ser azar y demasiado discretas para ser noticia.",
];

const MEMBERS: Bodies = [
    "Área restrita. Alguns registros exigem assinatura, não por paywall, mas por responsabilidade temporal.",
    "Restricted area. Some records require membership, not for a paywall, but for temporal responsibility.",
    "Área restringida. Algunos registros exigen suscripción, no por paywall, sino por responsabilidad temporal.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for route in Route::ALL {
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
        assert_eq!("/core/".parse::<Route>().unwrap(), Route::Core);
        assert!("/core/nowhere".parse::<Route>().is_err());
    }

    #[test]
    fn test_pages() {
        let archive = page(Route::Archive, Language::En).unwrap();
        assert_eq!(archive.heading, "archive");
        assert!(archive.body.starts_with("ZETA index online"));
        assert!(archive.note.contains("no spoilers"));

        let pt = page(Route::Signals, Language::Pt).unwrap();
        assert!(pt.body.starts_with("Sinais de 2026"));

        assert!(page(Route::FutureNews, Language::En).is_none());
        assert!(page(Route::Core, Language::En).is_none());
    }

    #[test]
    fn test_every_core_page_has_text_except_future_news() {
        for route in Route::ALL.into_iter().filter(|r| r.is_core_page()) {
            for language in Language::ALL {
                assert_eq!(page(route, language).is_some(), route != Route::FutureNews);
            }
        }
    }

    #[test]
    fn test_entity_caption() {
        let (top, bottom) = entity_caption(Language::En, 2044);
        assert_eq!(top, "NUVE • post-human entity");
        assert_eq!(bottom, "window: 2044 • decision: silent");
    }
}
