//! UI labels for the core surface

use irreverso_core::Language;

#[derive(Debug)]
pub struct Labels {
    pub core_title: &'static str,
    pub subtitle: &'static str,
    pub canon_search: &'static str,
    pub canon_response: &'static str,
    pub menu: &'static str,
    pub archive: &'static str,
    pub summary: &'static str,
    pub future_news: &'static str,
    pub ai_features: &'static str,
    pub protocols: &'static str,
    pub signals: &'static str,
    pub members: &'static str,
    pub instance: &'static str,
    pub region: &'static str,
    pub tz: &'static str,
    pub build: &'static str,
    pub uptime: &'static str,
    pub access: &'static str,
    pub mesh: &'static str,
    pub timeline: &'static str,
    pub hint: &'static str,
    pub restricted: &'static str,
    pub member_lock: &'static str,
    /// Note under every static page
    pub page_note: &'static str,
}

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::Pt => &PT,
            Language::En => &EN,
            Language::Es => &ES,
        }
    }
}

static EN: Labels = Labels {
    core_title: "IRREVERSO OS",
    subtitle: "AUTHORIZED RECORD • CORE SURFACE",
    canon_search: "canonical search",
    canon_response: "canonical response",
    menu: "MENU",
    archive: "ARCHIVE",
    summary: "SUMMARY",
    future_news: "FUTURE NEWS",
    ai_features: "AI FEATURES",
    protocols: "PROTOCOLS",
    signals: "SIGNALS",
    members: "MEMBERS",
    instance: "instance",
    region: "region",
    tz: "tz",
    build: "build",
    uptime: "stability",
    access: "access",
    mesh: "mesh",
    timeline: "timeline",
    hint: "hover • touch • NUVE is watching",
    restricted: "restricted access",
    member_lock: "membership required",
    page_note: "note: canonical content • partial reading • no spoilers",
};

static PT: Labels = Labels {
    core_title: "IRREVERSO OS",
    subtitle: "REGISTRO AUTORIZADO • SUPERFÍCIE CORE",
    canon_search: "busca canônica",
    canon_response: "resposta canônica",
    menu: "MENU",
    archive: "ARCHIVE",
    summary: "SUMMARY",
    future_news: "FUTURE NEWS",
    ai_features: "AI FEATURES",
    protocols: "PROTOCOLS",
    signals: "SIGNALS",
    members: "MEMBERS",
    instance: "instância",
    region: "região",
    tz: "tz",
    build: "build",
    uptime: "estabilidade",
    access: "acesso",
    mesh: "malha",
    timeline: "linha temporal",
    hint: "passe o cursor • toque • a NUVE observa",
    restricted: "acesso restrito",
    member_lock: "assinatura exigida",
    page_note: "nota: conteúdo canônico • leitura parcial • sem spoilers",
};

static ES: Labels = Labels {
    core_title: "IRREVERSO OS",
    subtitle: "REGISTRO AUTORIZADO • SUPERFICIE CORE",
    canon_search: "búsqueda canónica",
    canon_response: "respuesta canónica",
    menu: "MENÚ",
    archive: "ARCHIVE",
    summary: "SUMMARY",
    future_news: "FUTURE NEWS",
    ai_features: "AI FEATURES",
    protocols: "PROTOCOLS",
    signals: "SIGNALS",
    members: "MEMBERS",
    instance: "instancia",
    region: "región",
    tz: "tz",
    build: "build",
    uptime: "estabilidad",
    access: "acceso",
    mesh: "malla",
    timeline: "línea temporal",
    hint: "pasa el cursor • toca • la NUVE observa",
    restricted: "acceso restringido",
    member_lock: "suscripción requerida",
    page_note: "nota: contenido canónico • lectura parcial • sin spoilers",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_labels() {
        for language in Language::ALL {
            let labels = Labels::for_language(language);
            assert_eq!(labels.core_title, "IRREVERSO OS");
            assert!(!labels.timeline.is_empty());
            assert!(!labels.page_note.is_empty());
        }
    }

    #[test]
    fn test_localized() {
        assert_eq!(Labels::for_language(Language::Pt).timeline, "linha temporal");
        assert_eq!(Labels::for_language(Language::En).uptime, "stability");
        assert_eq!(Labels::for_language(Language::Es).instance, "instancia");
    }
}
