//! Error types for IRREVERSO
//!
//! Nothing here crosses the `on_finish` boundary: the boot sequencer absorbs
//! every failure and degrades. These errors exist for logging, for the
//! renderer's degrade reason and for the hosting shell's I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrreversoError {
    // Render errors
    #[error("Rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Shader compile failed ({stage}): {reason}")]
    ShaderCompile { stage: &'static str, reason: String },

    #[error("Program link failed: {0}")]
    ProgramLink(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    // Host errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for IRREVERSO operations
pub type IrreversoResult<T> = Result<T, IrreversoError>;
