//! # Transcoder Module
//!
//! Questo modulo gestisce la conversione dei video con FFmpeg.
//!
//! ## Pipeline di conversione:
//! 1. Crea la cartella del preset se non esiste (`HD/`, `2K/`)
//! 2. Riscala il video per stare dentro la risoluzione target mantenendo l'aspect ratio
//! 3. Aggiunge bande nere per arrivare alle dimensioni esatte, con il video centrato
//! 4. Ricodifica video e audio con i codec configurati (default libx264 + aac)
//! 5. Copia i metadata globali dell'input (`-map_metadata 0`)
//! 6. Riporta il modification time dell'output a quello dell'input originale
//!
//! ## Gestione errori:
//! Un fallimento di ffmpeg riguarda solo il file corrente. Un eventuale output
//! parziale resta sul disco così com'è.

use filetime::FileTime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};
use tracing::{debug, info};

use crate::config::{Config, ResolutionPreset};
use crate::error::ConvertError;
use crate::progress;
use crate::tools::ToolRunner;

/// Lines of ffmpeg stderr kept in the error message
const STDERR_TAIL_LINES: usize = 5;

/// Scale to fit inside the preset, then pad to its exact size, centred
pub fn scale_filter(preset: &ResolutionPreset) -> String {
    let dims = preset.dimensions();
    format!(
        "scale={dims}:force_original_aspect_ratio=decrease,pad={dims}:(ow-iw)/2:(oh-ih)/2"
    )
}

/// Full ffmpeg argument list for one conversion
pub fn transcode_args(
    input: &Path,
    output: &Path,
    preset: &ResolutionPreset,
    config: &Config,
) -> Vec<OsString> {
    vec![
        OsString::from("-i"),
        input.as_os_str().to_os_string(),
        OsString::from("-map_metadata"),
        OsString::from("0"),
        OsString::from("-vf"),
        OsString::from(scale_filter(preset)),
        OsString::from("-c:v"),
        OsString::from(&config.video_codec),
        OsString::from("-c:a"),
        OsString::from(&config.audio_codec),
        output.as_os_str().to_os_string(),
    ]
}

/// A finished conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOutcome {
    pub output_path: PathBuf,
    pub output_size: u64,
}

/// Convert `input` into the preset folder, keeping its file name.
pub async fn transcode<R: ToolRunner>(
    runner: &R,
    config: &Config,
    input: &Path,
    preset: &ResolutionPreset,
    input_mtime: SystemTime,
) -> Result<TranscodeOutcome, ConvertError> {
    let file_name = input
        .file_name()
        .ok_or_else(|| ConvertError::Transcode(format!("Invalid file name: {}", input.display())))?;

    let output_dir = config.output_dir(preset);
    if !output_dir.exists() {
        tokio::fs::create_dir_all(&output_dir).await?;
        info!("Created output directory: {}", output_dir.display());
    }
    let output_path = output_dir.join(file_name);

    let args = transcode_args(input, &output_path, preset, config);
    debug!("{} {:?}", config.ffmpeg_command, args);

    let spinner = progress::spinner(&format!(
        "Converting {} to {}...",
        file_name.to_string_lossy(),
        preset.name
    ));
    let start_time = Instant::now();
    let result = runner.run(&config.ffmpeg_command, &args).await;
    spinner.finish_and_clear();

    let output = result.map_err(|e| {
        ConvertError::Transcode(format!("failed to execute {}: {}", config.ffmpeg_command, e))
    })?;

    if !output.success() {
        let exit = output
            .code
            .map(|code| format!("exit status {}", code))
            .unwrap_or_else(|| "terminated by signal".to_string());
        let tail = output.stderr_tail(STDERR_TAIL_LINES);
        let message = if tail.is_empty() {
            format!("{} returned {}", config.ffmpeg_command, exit)
        } else {
            format!("{} returned {}\n{}", config.ffmpeg_command, exit, tail)
        };
        return Err(ConvertError::Transcode(message));
    }

    debug!(
        "Conversion of {} completed in {:.1}s",
        input.display(),
        start_time.elapsed().as_secs_f64()
    );

    filetime::set_file_mtime(&output_path, FileTime::from_system_time(input_mtime))?;
    let output_size = tokio::fs::metadata(&output_path).await?.len();

    Ok(TranscodeOutcome {
        output_path,
        output_size,
    })
}
