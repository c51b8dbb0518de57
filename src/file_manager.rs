//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file e la discovery dei video.
//!
//! ## Responsabilità:
//! - Discovery dei video nella directory sorgente (solo primo livello, niente ricorsione)
//! - Determinazione formato file tramite estensione (case-insensitive)
//! - Ricerca di output già esistenti nelle cartelle dei preset
//! - Formattazione delle dimensioni in MB
//!
//! ## Ordine dei file:
//! L'ordine segue il listing del filesystem e non viene ordinato.
//! Su filesystem diversi l'ordine può cambiare tra un'esecuzione e l'altra.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use walkdir::WalkDir;

use crate::config::ResolutionPreset;

/// An output already present in one of the preset folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingOutput {
    pub folder: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Get size and modification time of a file
    pub async fn get_file_info(path: &Path) -> std::io::Result<(u64, SystemTime)> {
        let metadata = fs::metadata(path).await?;
        Ok((metadata.len(), metadata.modified()?))
    }

    /// Find the video files directly inside `source_dir`
    pub fn find_video_files(source_dir: &Path, extensions: &[String]) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            // Symlinked files count as files, like a plain stat would report them
            let is_file = if entry.path_is_symlink() {
                entry.path().is_file()
            } else {
                entry.file_type().is_file()
            };
            if is_file && Self::is_video(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Check if a file has one of the recognised video extensions
    pub fn is_video(path: &Path, extensions: &[String]) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext_lower = ext.to_string_lossy().to_lowercase();
                extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext_lower))
            }
            None => false,
        }
    }

    /// Look for `file_name` in each preset folder, first match wins
    pub async fn find_existing_output(
        source_dir: &Path,
        file_name: &OsStr,
        presets: &[ResolutionPreset],
    ) -> Option<ExistingOutput> {
        for preset in presets {
            let candidate = source_dir.join(&preset.name).join(file_name);
            if let Ok(metadata) = fs::metadata(&candidate).await {
                return Some(ExistingOutput {
                    folder: preset.name.clone(),
                    path: candidate,
                    size: metadata.len(),
                });
            }
        }
        None
    }

    /// Size in megabytes with two decimals, e.g. `2.00 MB`
    pub fn format_size(size: u64) -> String {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    }
}
