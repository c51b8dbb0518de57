//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `MissingDependency`: ffmpeg non disponibile (errore fatale, blocca tutto il batch)
//! - `Probe`: Errori di lettura metadata con ffprobe (mai mostrati nel report)
//! - `Transcode`: ffmpeg fallito su un singolo file (il batch continua)
//! - `Prompt`: Errori di lettura risposta dell'operatore
//! - `Validation`: Errori di validazione configurazione
//!
//! ## Esempio:
//! ```rust,ignore
//! if !output.success() {
//!     return Err(ConvertError::MissingDependency(FFMPEG_GUIDANCE.to_string()));
//! }
//! ```

/// Message shown to the operator when the transcoder cannot be invoked
pub const FFMPEG_GUIDANCE: &str = "FFmpeg is not installed or not in PATH. Please download FFmpeg from https://ffmpeg.org/download.html, extract it, and add the bin folder to your PATH environment variable.";

/// Custom error types for video conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    MissingDependency(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Transcode error: {0}")]
    Transcode(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Validation(String),
}

impl ConvertError {
    /// True for the only failure that aborts the whole batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingDependency(_))
    }

    /// Process exit code when a run stops on this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingDependency(_) => 1,
            Self::Validation(_) => 2,
            _ => 1,
        }
    }
}
