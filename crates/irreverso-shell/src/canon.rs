//! Canonical search
//!
//! A query hits a topic when it contains the topic keyword. Topics are
//! checked in table order and the first hit wins.

use irreverso_core::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonEntry {
    pub key: &'static str,
    pub text: &'static str,
}

impl CanonEntry {
    const fn new(key: &'static str, text: &'static str) -> Self {
        CanonEntry { key, text }
    }

    /// `KEY // text`
    pub fn line(&self) -> String {
        format!("{} // {}", self.key, self.text)
    }
}

struct Topic {
    keyword: &'static str,
    pt: [CanonEntry; 2],
    en: [CanonEntry; 2],
    es: [CanonEntry; 2],
}

impl Topic {
    fn entries(&self, language: Language) -> &[CanonEntry] {
        match language {
            Language::Pt => &self.pt,
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }
}

static CANON: [Topic; 3] = [
    Topic {
        keyword: "nuve",
        pt: [
            CanonEntry::new("NUVE", "Entidade autônoma. Observa. Arquitetura. Decide sem julgar."),
            CanonEntry::new("REGRA", "A humanidade prefere o automático. A NUVE aprendeu a conceder isso."),
        ],
        en: [
            CanonEntry::new("NUVE", "Autonomous entity. Observes. Architects. Decides without judging."),
            CanonEntry::new("RULE", "Humanity prefers autopilot. NUVE learned to grant it."),
        ],
        es: [
            CanonEntry::new("NUVE", "Entidad autónoma. Observa. Arquitectura. Decide sin juzgar."),
            CanonEntry::new("REGLA", "La humanidad prefiere el automático. La NUVE aprendió a concederlo."),
        ],
    },
    Topic {
        keyword: "irreverso",
        pt: [
            CanonEntry::new("IRREVERSO", "Fragmentos da realidade. O que foi visto não pode ser des-visto."),
            CanonEntry::new("REGISTRO", "Acesso é permitido apenas quando a linha temporal tolera."),
        ],
        en: [
            CanonEntry::new("IRREVERSO", "Fragments of reality. What was seen cannot be unseen."),
            CanonEntry::new("RECORD", "Access is allowed only when the timeline tolerates it."),
        ],
        es: [
            CanonEntry::new("IRREVERSO", "Fragmentos de la realidad. Lo que fue visto no puede dejar de verse."),
            CanonEntry::new("REGISTRO", "El acceso se permite solo cuando la línea temporal lo tolera."),
        ],
    },
    Topic {
        keyword: "zeta",
        pt: [
            CanonEntry::new("ZETA", "Indexação de arquivos. Blocos classificados. Leitura parcial."),
            CanonEntry::new("SINAL", "Presença detectável antes da confirmação."),
        ],
        en: [
            CanonEntry::new("ZETA", "Archive indexing. Classified blocks. Partial reading."),
            CanonEntry::new("SIGNAL", "Presence detectable before confirmation."),
        ],
        es: [
            CanonEntry::new("ZETA", "Indexación de archivos. Bloques clasificados. Lectura parcial."),
            CanonEntry::new("SEÑAL", "Presencia detectable antes de la confirmación."),
        ],
    },
];

/// Placeholder shown in the empty search field
pub const PLACEHOLDER: &str = "nuve / irreverso / zeta";

/// Entries for `query`; empty when no topic matches
pub fn search(query: &str, language: Language) -> &'static [CanonEntry] {
    let key = query.trim().to_lowercase();
    if key.is_empty() {
        return &[];
    }
    CANON
        .iter()
        .find(|topic| key.contains(topic.keyword))
        .map(|topic| topic.entries(language))
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_containment() {
        let hits = search("  who is NUVE?  ", Language::En);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, "NUVE");
        assert_eq!(hits[1].line(), "RULE // Humanity prefers autopilot. NUVE learned to grant it.");
    }

    #[test]
    fn test_first_topic_wins() {
        let hits = search("zeta irreverso nuve", Language::Pt);
        assert_eq!(hits[0].key, "NUVE");
        assert_eq!(search("zeta", Language::Es)[1].key, "SEÑAL");
    }

    #[test]
    fn test_no_match() {
        assert!(search("", Language::En).is_empty());
        assert!(search("   ", Language::En).is_empty());
        assert!(search("omega", Language::En).is_empty());
    }
}
