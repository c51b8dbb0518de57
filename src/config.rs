//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con la directory sorgente, i preset di risoluzione e i tool esterni
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento configurazione da file JSON
//! - I valori di default riproducono il comportamento storico (HD poi 2K, libx264 + aac)
//!
//! ## Parametri di configurazione:
//! - `source_dir`: Directory con i video da convertire
//! - `report_path`: Percorso del report TSV (default: accanto all'eseguibile)
//! - `ffmpeg_command` / `ffprobe_command`: Comandi dei tool esterni
//! - `video_codec` / `audio_codec`: Codec di output (default: libx264 / aac)
//! - `video_extensions`: Estensioni riconosciute come video
//! - `presets`: Risoluzioni disponibili, in ordine di priorità per il controllo output esistenti
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     source_dir: PathBuf::from("/media/videos"),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// Source directory used when nothing else is configured
pub const DEFAULT_SOURCE_DIR: &str = "/mnt/d/media/google drive space cleanup/";

/// Token reserved for the "skip this file" answer
pub const SKIP_TOKEN: &str = "SKIP";

/// A target resolution. `name` is both the prompt token and the output folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPreset {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ResolutionPreset {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }

    /// `W:H` form used by the scale and pad filters
    pub fn dimensions(&self) -> String {
        format!("{}:{}", self.width, self.height)
    }

    /// Short label shown in the prompt, e.g. `1080p`
    pub fn label(&self) -> String {
        format!("{}p", self.height)
    }
}

/// Configuration for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing the videos to convert
    pub source_dir: PathBuf,
    /// Where to write the TSV report (None = next to the executable)
    pub report_path: Option<PathBuf>,
    /// Transcoder executable
    pub ffmpeg_command: String,
    /// Metadata probe executable
    pub ffprobe_command: String,
    /// Output video codec
    pub video_codec: String,
    /// Output audio codec
    pub audio_codec: String,
    /// Recognised video extensions (without dot, case-insensitive)
    pub video_extensions: Vec<String>,
    /// Target resolutions; order is the lookup priority for existing outputs
    pub presets: Vec<ResolutionPreset>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            report_path: None,
            ffmpeg_command: "ffmpeg".to_string(),
            ffprobe_command: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_extensions: ["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            presets: vec![
                ResolutionPreset::new("HD", 1920, 1080),
                ResolutionPreset::new("2K", 2560, 1440),
            ],
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.presets.is_empty() {
            return Err(ConvertError::Validation(
                "At least one resolution preset is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for preset in &self.presets {
            if preset.name.trim().is_empty() {
                return Err(ConvertError::Validation(
                    "Preset name must not be empty".to_string(),
                ));
            }
            if preset.width == 0 || preset.height == 0 {
                return Err(ConvertError::Validation(format!(
                    "Preset {} must have non-zero width and height",
                    preset.name
                )));
            }
            let key = preset.name.to_uppercase();
            if key == SKIP_TOKEN {
                return Err(ConvertError::Validation(format!(
                    "{} is reserved and cannot be used as a preset name",
                    SKIP_TOKEN
                )));
            }
            if !seen.insert(key) {
                return Err(ConvertError::Validation(format!(
                    "Duplicate preset name: {}",
                    preset.name
                )));
            }
        }

        if self.video_extensions.is_empty() {
            return Err(ConvertError::Validation(
                "At least one video extension is required".to_string(),
            ));
        }

        for (field, value) in [
            ("ffmpeg_command", &self.ffmpeg_command),
            ("ffprobe_command", &self.ffprobe_command),
            ("video_codec", &self.video_codec),
            ("audio_codec", &self.audio_codec),
        ] {
            if value.trim().is_empty() {
                return Err(ConvertError::Validation(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("video-converter").join("config.json"))
    }

    /// Folder in the source directory holding outputs for `preset`
    pub fn output_dir(&self, preset: &ResolutionPreset) -> PathBuf {
        self.source_dir.join(&preset.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.source_dir, PathBuf::from(DEFAULT_SOURCE_DIR));
        assert_eq!(config.video_codec, "libx264");
        assert_eq!(config.audio_codec, "aac");
        assert_eq!(config.video_extensions.len(), 7);
        assert_eq!(config.presets[0], ResolutionPreset::new("HD", 1920, 1080));
        assert_eq!(config.presets[1], ResolutionPreset::new("2K", 2560, 1440));
        assert!(config.report_path.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.presets.push(ResolutionPreset::new("hd", 1280, 720));
        assert!(config.validate().is_err());

        config = Config::default();
        config.presets.push(ResolutionPreset::new("skip", 1280, 720));
        assert!(config.validate().is_err());

        config = Config::default();
        config.presets[0].width = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.presets.clear();
        assert!(config.validate().is_err());

        config = Config::default();
        config.ffmpeg_command = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_formatting() {
        let preset = ResolutionPreset::new("2K", 2560, 1440);
        assert_eq!(preset.dimensions(), "2560:1440");
        assert_eq!(preset.label(), "1440p");
    }

    #[tokio::test]
    async fn test_missing_file_gives_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(config.presets.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{ "source_dir": "/videos", "video_codec": "libx265" }"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/videos"));
        assert_eq!(config.video_codec, "libx265");
        assert_eq!(config.audio_codec, "aac");
        assert_eq!(config.presets.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "presets": [] }"#).unwrap();

        assert!(Config::from_file(&config_path).await.is_err());
    }
}
