//! # Conversion Report Module
//!
//! Questo modulo raccoglie un record per ogni video trovato e produce il report finale.
//!
//! ## Responsabilità:
//! - `ConversionRecord`: esito di un singolo file (dimensioni, stato, timestamp)
//! - `Report`: lista ordinata, solo append, nell'ordine di elaborazione
//! - Tabella a larghezza fissa per la console
//! - File TSV `conversion_report.tsv` con le dimensioni già formattate in MB
//!
//! ## Esempio tabella:
//! ```text
//! Timestamp            Input Size      Output Size     Status     File
//! --------------------------------------------------------------------------------------------------------------
//! 2023-05-01 10:00:00  47.68 MB        12.31 MB        converted  clip.mp4
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::file_manager::FileManager;

/// Default report file name
pub const REPORT_FILE_NAME: &str = "conversion_report.tsv";

const TSV_HEADER: &str = "Timestamp\tInput Size\tOutput Size\tStatus\tFile";

/// Final state of one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Converted,
    Exists,
    Skipped,
    Error,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::Exists => "exists",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers in the table apply
        f.pad(self.as_str())
    }
}

/// Outcome of one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub file_name: String,
    pub input_size: u64,
    /// 0 when nothing was produced
    pub output_size: u64,
    pub status: ConversionStatus,
    pub timestamp: String,
}

/// Counts per status, logged at the end of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub converted: usize,
    pub exists: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_input_size: u64,
    pub total_output_size: u64,
}

impl ReportSummary {
    pub fn format_summary(&self) -> String {
        format!(
            "Converted: {} | Already existing: {} | Skipped: {} | Errors: {} | Input: {} | Output: {}",
            self.converted,
            self.exists,
            self.skipped,
            self.errors,
            FileManager::format_size(self.total_input_size),
            FileManager::format_size(self.total_output_size)
        )
    }
}

/// Records of a run, in processing order
#[derive(Debug, Default, Clone)]
pub struct Report {
    records: Vec<ConversionRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ConversionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for `file_name`, if that file was processed
    pub fn get(&self, file_name: &str) -> Option<&ConversionRecord> {
        self.records.iter().find(|r| r.file_name == file_name)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for record in &self.records {
            match record.status {
                ConversionStatus::Converted => summary.converted += 1,
                ConversionStatus::Exists => summary.exists += 1,
                ConversionStatus::Skipped => summary.skipped += 1,
                ConversionStatus::Error => summary.errors += 1,
            }
            summary.total_input_size += record.input_size;
            summary.total_output_size += record.output_size;
        }
        summary
    }

    /// Fixed-width table for the console
    pub fn render_table(&self) -> String {
        let mut out = String::from("\nConversion Report:\n");
        out.push_str(&format!(
            "{:<20} {:<15} {:<15} {:<10} {}\n",
            "Timestamp", "Input Size", "Output Size", "Status", "File"
        ));
        out.push_str(&"-".repeat(110));
        out.push('\n');

        for record in &self.records {
            out.push_str(&format!(
                "{:<20} {:<15} {:<15} {:<10} {}\n",
                record.timestamp,
                FileManager::format_size(record.input_size),
                FileManager::format_size(record.output_size),
                record.status,
                record.file_name
            ));
        }
        out
    }

    /// Tab-separated report, sizes formatted as in the console
    pub fn to_tsv(&self) -> String {
        let mut out = String::from(TSV_HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                record.timestamp,
                FileManager::format_size(record.input_size),
                FileManager::format_size(record.output_size),
                record.status,
                record.file_name
            ));
        }
        out
    }

    /// Write the TSV report, replacing any previous one
    pub async fn write_tsv(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.to_tsv()).await
    }
}

/// `conversion_report.tsv` in the executable's directory
pub fn default_report_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(REPORT_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, input: u64, output: u64, status: ConversionStatus) -> ConversionRecord {
        ConversionRecord {
            file_name: name.to_string(),
            input_size: input,
            output_size: output,
            status,
            timestamp: "2023-05-01 10:00:00".to_string(),
        }
    }

    fn sample() -> Report {
        let mut report = Report::new();
        report.push(record("clip.mp4", 50_000_000, 2_097_152, ConversionStatus::Converted));
        report.push(record("old.mkv", 2_097_152, 1_048_576, ConversionStatus::Exists));
        report.push(record("nope.avi", 1024, 0, ConversionStatus::Skipped));
        report
    }

    #[test]
    fn test_tsv_layout() {
        let tsv = sample().to_tsv();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Timestamp\tInput Size\tOutput Size\tStatus\tFile");
        assert_eq!(
            lines[1],
            "2023-05-01 10:00:00\t47.68 MB\t2.00 MB\tconverted\tclip.mp4"
        );
        assert_eq!(
            lines[3],
            "2023-05-01 10:00:00\t0.00 MB\t0.00 MB\tskipped\tnope.avi"
        );
        assert!(tsv.ends_with('\n'));
    }

    #[test]
    fn test_table_layout() {
        let table = sample().render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Conversion Report:");
        assert_eq!(
            lines[2],
            "Timestamp            Input Size      Output Size     Status     File"
        );
        assert_eq!(lines[3], "-".repeat(110));
        assert_eq!(
            lines[5],
            "2023-05-01 10:00:00  2.00 MB         1.00 MB         exists     old.mkv"
        );
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample().summary();
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.exists, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.total_output_size, 3_145_728);
        assert!(summary.format_summary().contains("Converted: 1"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ConversionStatus::Exists).unwrap(),
            "\"exists\""
        );
        assert_eq!(format!("{:<10}|", ConversionStatus::Error), "error     |");
    }

    #[tokio::test]
    async fn test_write_tsv_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        std::fs::write(&path, "stale content that is longer than the header\n".repeat(100)).unwrap();

        let empty = Report::new();
        empty.write_tsv(&path).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Timestamp\tInput Size\tOutput Size\tStatus\tFile\n"
        );
    }

    #[test]
    fn test_default_report_path_name() {
        assert_eq!(
            default_report_path().file_name().unwrap(),
            REPORT_FILE_NAME
        );
    }
}
