//! # Progress Feedback Module
//!
//! Spinner `indicatif` mostrato mentre ffmpeg lavora.
//! L'output di ffmpeg viene catturato, quindi lo spinner è l'unico segnale di attività.
//!
//! ```text
//! ⠋ [00:02:15] Converting clip.mp4 to HD...
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();

    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);

    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner
}
