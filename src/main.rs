//! # Video Converter - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione (file JSON + override da CLI)
//! - Avvio della conversione e scrittura del report
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, `RUST_LOG` ha la precedenza)
//! 3. Carica la configurazione e applica gli override (la validazione avviene in `run`)
//! 4. Esegue il `VideoConverter`; se ffmpeg manca stampa le istruzioni ed esce con codice 1
//! 5. Stampa la tabella e salva `conversion_report.tsv`
//!
//! ## Esempio di utilizzo:
//! ```bash
//! video-converter /path/to/videos --report ./report.tsv --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use video_resolution_converter::{
    report::default_report_path, Config, StdinPrompt, SystemRunner, VideoConverter,
};

#[derive(Parser)]
#[command(name = "video-converter")]
#[command(about = "Convert the videos of a directory to HD or 2K, asking for each file")]
struct Args {
    /// Directory containing the videos to convert
    source_dir: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the TSV report (default: next to the executable)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Transcoder executable
    #[arg(long)]
    ffmpeg: Option<String>,

    /// Metadata probe executable
    #[arg(long)]
    ffprobe: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::from_file(&path).await?
        }
        None => Config::default(),
    };

    if let Some(source_dir) = args.source_dir {
        config.source_dir = source_dir;
    }
    if let Some(report) = args.report {
        config.report_path = Some(report);
    }
    if let Some(ffmpeg) = args.ffmpeg {
        config.ffmpeg_command = ffmpeg;
    }
    if let Some(ffprobe) = args.ffprobe {
        config.ffprobe_command = ffprobe;
    }

    let report_path = config
        .report_path
        .clone()
        .unwrap_or_else(default_report_path);

    let mut converter = VideoConverter::new(config, SystemRunner, StdinPrompt::new());
    if let Err(e) = converter.run().await {
        if e.is_fatal() {
            println!("{}", e);
        } else {
            error!("{}", e);
        }
        std::process::exit(e.exit_code());
    }

    converter.write_report(&report_path).await?;

    Ok(())
}
