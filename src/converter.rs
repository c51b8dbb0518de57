//! # Video Converter Orchestrator
//!
//! Orchestratore della conversione: un solo passaggio sequenziale sui file della directory.
//!
//! ## Flusso di esecuzione:
//! 1. **Validazione**: controlla la configurazione
//! 2. **Dependency check**: verifica che ffmpeg sia invocabile, altrimenti interrompe tutto
//! 3. **File discovery**: trova i video nella directory sorgente
//! 4. **Per ogni file**:
//!    - legge dimensione e modification time
//!    - ricava il timestamp (metadata embedded o mtime)
//!    - se esiste già in `HD/` o `2K/` → `exists`
//!    - altrimenti chiede la risoluzione all'operatore
//!    - `SKIP` o risposta non valida → `skipped`
//!    - conversione riuscita → `converted`, fallita → `error`
//! 5. **Reporting**: tabella in console e file TSV
//!
//! ## Error handling:
//! Solo l'assenza di ffmpeg blocca il batch. Ogni altro errore resta confinato al singolo file.
//!
//! ## Esempio:
//! ```rust,ignore
//! let mut converter = VideoConverter::new(config, SystemRunner, StdinPrompt::new());
//! converter.run().await?;
//! converter.write_report(&default_report_path()).await?;
//! ```

use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    error::ConvertError,
    file_manager::FileManager,
    probe,
    prompt::{resolution_question, Choice, Prompt},
    report::{ConversionRecord, ConversionStatus, Report},
    tools::{self, ToolRunner},
    transcoder,
};

/// Timestamp used when the input could not even be read
const UNKNOWN_TIMESTAMP: &str = "unknown";

/// Pipeline context: configuration, external collaborators and the report
pub struct VideoConverter<R, P> {
    config: Config,
    runner: R,
    prompt: P,
    report: Report,
}

impl<R: ToolRunner, P: Prompt> VideoConverter<R, P> {
    pub fn new(config: Config, runner: R, prompt: P) -> Self {
        Self {
            config,
            runner,
            prompt,
            report: Report::new(),
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Process every video in the source directory.
    ///
    /// Fails only before any file is touched: invalid configuration, missing
    /// transcoder, or unreadable source directory.
    pub async fn run(&mut self) -> Result<(), ConvertError> {
        self.config.validate()?;
        tools::check_transcoder(&self.runner, &self.config).await?;

        let source_dir = self.config.source_dir.clone();
        if !source_dir.is_dir() {
            return Err(ConvertError::Validation(format!(
                "Source directory does not exist: {}",
                source_dir.display()
            )));
        }

        let files = FileManager::find_video_files(&source_dir, &self.config.video_extensions)?;
        info!("Found {} video files in {}", files.len(), source_dir.display());

        self.report = Report::new();
        for path in files {
            let record = self.process_file(&path).await;
            debug!("{} -> {}", record.file_name, record.status);
            self.report.push(record);
        }

        info!("{}", self.report.summary().format_summary());
        Ok(())
    }

    /// Take one file to a terminal state
    pub async fn process_file(&mut self, path: &Path) -> ConversionRecord {
        // Lookups and tool arguments use the raw name, display uses the lossy one
        let raw_name = path.file_name().unwrap_or(path.as_os_str());
        let file_name = raw_name.to_string_lossy().to_string();

        let (input_size, input_mtime) = match FileManager::get_file_info(path).await {
            Ok(info) => info,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                println!("Error reading {}: {}", file_name, e);
                return ConversionRecord {
                    file_name,
                    input_size: 0,
                    output_size: 0,
                    status: ConversionStatus::Error,
                    timestamp: UNKNOWN_TIMESTAMP.to_string(),
                };
            }
        };

        let timestamp = probe::probe_timestamp(&self.runner, &self.config, path, input_mtime).await;

        let record = |output_size: u64, status: ConversionStatus| ConversionRecord {
            file_name: file_name.clone(),
            input_size,
            output_size,
            status,
            timestamp: timestamp.clone(),
        };

        if let Some(existing) =
            FileManager::find_existing_output(&self.config.source_dir, raw_name, &self.config.presets)
                .await
        {
            debug!("Existing output: {}", existing.path.display());
            println!(
                "Skipping {}, output already exists in {}.",
                file_name, existing.folder
            );
            return record(existing.size, ConversionStatus::Exists);
        }

        println!(
            "Processing {} ({})",
            file_name,
            FileManager::format_size(input_size)
        );
        let question = resolution_question(&self.config.presets);
        let answer = match self.prompt.ask(&question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Could not read answer for {}: {}", file_name, e);
                None
            }
        };

        let preset = match Choice::parse(answer.as_deref().unwrap_or_default(), &self.config.presets) {
            Choice::Convert(preset) => preset.clone(),
            Choice::Skip => {
                println!("Skipping {}.", file_name);
                return record(0, ConversionStatus::Skipped);
            }
            Choice::Invalid => {
                println!("Invalid choice for {}, skipping.", file_name);
                return record(0, ConversionStatus::Skipped);
            }
        };

        match transcoder::transcode(&self.runner, &self.config, path, &preset, input_mtime).await {
            Ok(outcome) => {
                println!(
                    "Converted {} to {}",
                    file_name,
                    outcome.output_path.display()
                );
                record(outcome.output_size, ConversionStatus::Converted)
            }
            Err(e) => {
                warn!("Conversion of {} to {} failed", file_name, preset.name);
                println!("Error converting {}: {}", file_name, e);
                record(0, ConversionStatus::Error)
            }
        }
    }

    /// Print the table and write the TSV report to `path`
    pub async fn write_report(&self, path: &Path) -> Result<(), ConvertError> {
        print!("{}", self.report.render_table());
        self.report.write_tsv(path).await?;
        println!("\nReport saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use crate::tools::ToolOutput;
    use std::cell::Cell;
    use std::ffi::OsString;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingRunner {
        calls: Cell<usize>,
    }

    impl ToolRunner for CountingRunner {
        async fn run(&self, _program: &str, _args: &[OsString]) -> Result<ToolOutput, ConvertError> {
            self.calls.set(self.calls.get() + 1);
            Ok(ToolOutput {
                code: Some(0),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_vanished_input_is_recorded_as_error() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            source_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut converter =
            VideoConverter::new(config, CountingRunner::default(), ScriptedPrompt::new(["HD"]));

        let record = converter.process_file(&dir.path().join("gone.mp4")).await;

        assert_eq!(record.file_name, "gone.mp4");
        assert_eq!(record.status, ConversionStatus::Error);
        assert_eq!(record.input_size, 0);
        assert_eq!(record.output_size, 0);
        assert_eq!(record.timestamp, UNKNOWN_TIMESTAMP);
        assert_eq!(record.timestamp, "unknown");
        assert_eq!(converter.runner().calls.get(), 0);
        assert!(converter.prompt().asked().is_empty());
        assert!(!dir.path().join("HD").exists());
    }
}
