//! # Video Resolution Converter Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test di integrazione
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione, preset di risoluzione e validazione
//! - `error`: Tipi di errore custom
//! - `file_manager`: Discovery dei video e output esistenti
//! - `tools`: Esecuzione dei processi esterni (trait `ToolRunner`)
//! - `probe`: Timestamp di ripresa via ffprobe
//! - `prompt`: Scelta interattiva della risoluzione (trait `Prompt`)
//! - `transcoder`: Conversione con ffmpeg
//! - `report`: Record di conversione, tabella console e file TSV
//! - `converter`: Orchestratore della pipeline
//! - `progress`: Spinner durante la conversione
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use video_resolution_converter::{Config, StdinPrompt, SystemRunner, VideoConverter};
//!
//! let mut converter = VideoConverter::new(Config::default(), SystemRunner, StdinPrompt::new());
//! converter.run().await?;
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod probe;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod tools;
pub mod transcoder;

pub use config::{Config, ResolutionPreset};
pub use converter::VideoConverter;
pub use error::ConvertError;
pub use prompt::{Prompt, ScriptedPrompt, StdinPrompt};
pub use report::{ConversionRecord, ConversionStatus, Report};
pub use tools::{SystemRunner, ToolOutput, ToolRunner};
