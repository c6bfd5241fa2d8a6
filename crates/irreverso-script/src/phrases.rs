//! Phrase tables
//!
//! One table per display language. Vocabularies for the procedural tail are
//! shared: entity names come from the book, tech tokens are kept in English
//! in every language.

use irreverso_core::{Language, Phase};

/// Entities of the IRREVERSO canon
pub const BOOK_ENTITIES: [&str; 14] = [
    "NUVE",
    "ZETA/0110",
    "IRREVERSO OS",
    "CANONICAL TIMELINE",
    "TEMPORAL INSTANCE",
    "SIGNAL ALIGNMENT",
    "DECISION FABRIC",
    "OBSERVATION LAYER",
    "SYNAPTIC MESH",
    "MEMORY SHARD",
    "PROBABILITY ORCHESTRATOR",
    "CIVIL STABILITY MODEL",
    "AUTONOMY INDEX",
    "REALITY EDIT LAYER",
];

/// Real-world technical tokens mixed into the tail
pub const REAL_TECH: [&str; 20] = [
    "python",
    "llm",
    "transformer",
    "attention",
    "kv-cache",
    "vector-db",
    "retrieval",
    "agent",
    "orchestration",
    "grpc",
    "kubernetes",
    "edge",
    "telemetry",
    "tracing",
    "inference",
    "quantization",
    "fp16",
    "bf16",
    "cuda",
    "webgl",
];

/// Overlay footer labels
#[derive(Debug)]
pub struct FooterLabels {
    pub observer: &'static str,
    pub active: &'static str,
    pub signal: &'static str,
    pub aligned: &'static str,
    pub calibrating: &'static str,
    pub mode: &'static str,
}

/// All boot text of one language
#[derive(Debug)]
pub struct PhraseTable {
    pub language: Language,
    /// Overlay title
    pub title: &'static str,
    /// First preamble line; the seed label is appended
    pub bootstrap: &'static str,
    /// Remaining fixed preamble lines, in order
    pub preamble: &'static [&'static str],
    pub metric_label: &'static str,
    pub drift_label: &'static str,
    orbit: &'static [&'static str],
    breach: &'static [&'static str],
    reset: &'static [&'static str],
    deploy: &'static [&'static str],
    pub footer: FooterLabels,
}

impl PhraseTable {
    pub fn for_language(language: Language) -> &'static PhraseTable {
        match language {
            Language::Pt => &PT,
            Language::En => &EN,
            Language::Es => &ES,
        }
    }

    /// Preamble lines with the bootstrap line formatted for `seed_label`
    pub fn preamble_lines(&self, seed_label: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.preamble.len() + 1);
        lines.push(format!("{}{}", self.bootstrap, seed_label));
        lines.extend(self.preamble.iter().map(|l| l.to_string()));
        lines
    }

    pub fn preamble_len(&self) -> usize {
        self.preamble.len() + 1
    }

    /// Narrative sub-messages of a phase, in display order
    pub fn narrative(&self, phase: Phase) -> &'static [&'static str] {
        match phase {
            Phase::Orbit => self.orbit,
            Phase::Breach => self.breach,
            Phase::Reset => self.reset,
            Phase::Deploy => self.deploy,
        }
    }

    /// `Observer: ACTIVE | Signal: … | Mode: …`
    pub fn footer_line(&self, phase: Phase) -> String {
        let signal = if phase == Phase::Breach {
            self.footer.aligned
        } else {
            self.footer.calibrating
        };
        format!(
            "{}: {} | {}: {} | {}: {}",
            self.footer.observer,
            self.footer.active,
            self.footer.signal,
            signal,
            self.footer.mode,
            phase.label()
        )
    }
}

static EN: PhraseTable = PhraseTable {
    language: Language::En,
    title: "DEPLOYING IRREVERSO OS",
    bootstrap: "init: temporal-instance handshake // seed ",
    preamble: &[
        "scan: edge fabric / latency",
        "scan: model registry / integrity",
        "scan: memory shards / quorum",
        "scan: autonomy index / sampling",
        "scan: decision fabric / sync",
        "scan: observation layer / active",
        "scan: canonical timeline / 1983→2107",
        "scan: signal alignment / coarse",
        "alloc: inference surface / gpu",
        "alloc: vector memory / warm",
        "alloc: kv-cache / prefill",
        "mount: protocols / readonly",
        "mount: archives / partial",
        "render: preparing core surface -> /core",
        "ok: stability within tolerance",
    ],
    metric_label: "metric",
    drift_label: "drift",
    orbit: &[
        "Initializing temporal surface...",
        "Aligning orbit // observers standing by",
    ],
    breach: &[
        "UNAUTHORIZED ACCESS DETECTED // BUFFER BREACH",
        "Tracing intrusion vector...",
        "INTEGRITY FAULT // canonical timeline exposed",
        "Containment failed // rerouting instance",
    ],
    reset: &[
        "Reconfiguring instance // resetting observers",
        "Purging anomalous memory shards...",
    ],
    deploy: &[
        "Deploying neural mesh // binding decision fabric",
        "Handing control to the core surface",
    ],
    footer: FooterLabels {
        observer: "Observer",
        active: "ACTIVE",
        signal: "Signal",
        aligned: "ALIGNED",
        calibrating: "CALIBRATING",
        mode: "Mode",
    },
};

static PT: PhraseTable = PhraseTable {
    language: Language::Pt,
    title: "IMPLANTANDO IRREVERSO OS",
    bootstrap: "init: handshake de instância temporal // seed ",
    preamble: &[
        "scan: malha de borda / latência",
        "scan: registro de modelos / integridade",
        "scan: fragmentos de memória / quórum",
        "scan: índice de autonomia / amostragem",
        "scan: malha de decisão / sincronia",
        "scan: camada de observação / ativa",
        "scan: linha temporal canônica / 1983→2107",
        "scan: alinhamento de sinal / grosseiro",
        "alloc: superfície de inferência / gpu",
        "alloc: memória vetorial / aquecida",
        "alloc: kv-cache / prefill",
        "mount: protocolos / somente leitura",
        "mount: arquivos / parcial",
        "render: preparando superfície core -> /core",
        "ok: estabilidade dentro da tolerância",
    ],
    metric_label: "métrica",
    drift_label: "deriva",
    orbit: &[
        "Inicializando superfície temporal...",
        "Alinhando órbita // observadores em espera",
    ],
    breach: &[
        "ACESSO NÃO AUTORIZADO DETECTADO // BUFFER VIOLADO",
        "Rastreando vetor de intrusão...",
        "FALHA DE INTEGRIDADE // linha temporal canônica exposta",
        "Contenção falhou // redirecionando instância",
    ],
    reset: &[
        "Reconfigurando instância // reiniciando observadores",
        "Expurgando fragmentos de memória anômalos...",
    ],
    deploy: &[
        "Implantando malha neural // vinculando malha de decisão",
        "Entregando controle à superfície core",
    ],
    footer: FooterLabels {
        observer: "Observador",
        active: "ATIVO",
        signal: "Sinal",
        aligned: "ALINHADO",
        calibrating: "CALIBRANDO",
        mode: "Modo",
    },
};

static ES: PhraseTable = PhraseTable {
    language: Language::Es,
    title: "DESPLEGANDO IRREVERSO OS",
    bootstrap: "init: handshake de instancia temporal // semilla ",
    preamble: &[
        "scan: malla de borde / latencia",
        "scan: registro de modelos / integridad",
        "scan: fragmentos de memoria / quórum",
        "scan: índice de autonomía / muestreo",
        "scan: malla de decisión / sincronía",
        "scan: capa de observación / activa",
        "scan: línea temporal canónica / 1983→2107",
        "scan: alineación de señal / gruesa",
        "alloc: superficie de inferencia / gpu",
        "alloc: memoria vectorial / caliente",
        "alloc: kv-cache / prefill",
        "mount: protocolos / solo lectura",
        "mount: archivos / parcial",
        "render: preparando superficie core -> /core",
        "ok: estabilidad dentro de la tolerancia",
    ],
    metric_label: "métrica",
    drift_label: "deriva",
    orbit: &[
        "Inicializando superficie temporal...",
        "Alineando órbita // observadores en espera",
    ],
    breach: &[
        "ACCESO NO AUTORIZADO DETECTADO // BÚFER VULNERADO",
        "Rastreando vector de intrusión...",
        "FALLO DE INTEGRIDAD // línea temporal canónica expuesta",
        "Contención fallida // redirigiendo instancia",
    ],
    reset: &[
        "Reconfigurando instancia // reiniciando observadores",
        "Purgando fragmentos de memoria anómalos...",
    ],
    deploy: &[
        "Desplegando malla neural // vinculando malla de decisión",
        "Entregando el control a la superficie core",
    ],
    footer: FooterLabels {
        observer: "Observador",
        active: "ACTIVO",
        signal: "Señal",
        aligned: "ALINEADO",
        calibrating: "CALIBRANDO",
        mode: "Modo",
    },
};
