//! # Metadata Probe Module
//!
//! Estrae il timestamp di ripresa dai metadata del video con ffprobe.
//!
//! ## Strategia:
//! 1. `ffprobe -v quiet -print_format json -show_format <file>`
//! 2. Legge `format.tags.creation_time` se presente
//! 3. Converte in `YYYY-MM-DD HH:MM:SS`
//!
//! Qualsiasi errore (tool mancante, exit code non zero, JSON invalido, tag assente,
//! formato data non riconosciuto) ripiega silenziosamente sul modification time del file.

use chrono::{DateTime, Local, NaiveDateTime};
use std::ffi::OsString;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

use crate::config::Config;
use crate::error::ConvertError;
use crate::tools::ToolRunner;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Arguments asking ffprobe for the container format as JSON
pub fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "quiet", "-print_format", "json", "-show_format"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_os_string());
    args
}

/// Parse an embedded `creation_time` value into display form.
///
/// With a zone designator the wall clock of that zone is kept, so
/// `2023-05-01T10:00:00Z` renders as `2023-05-01 10:00:00`.
pub fn parse_creation_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format(DISPLAY_FORMAT).to_string());
    }

    // Offsets without a colon, e.g. +0200
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.format(DISPLAY_FORMAT).to_string());
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.format(DISPLAY_FORMAT).to_string());
        }
    }

    None
}

/// Extract `format.tags.creation_time` from ffprobe JSON output
pub fn creation_time_from_json(json: &str) -> Result<Option<String>, ConvertError> {
    let info: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ConvertError::Probe(e.to_string()))?;

    Ok(info["format"]["tags"]["creation_time"]
        .as_str()
        .map(|s| s.to_string()))
}

/// Filesystem modification time in local time
pub fn format_mtime(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime)
        .format(DISPLAY_FORMAT)
        .to_string()
}

async fn embedded_timestamp<R: ToolRunner>(
    runner: &R,
    config: &Config,
    path: &Path,
) -> Result<String, ConvertError> {
    let output = runner
        .run(&config.ffprobe_command, &probe_args(path))
        .await?;

    if !output.success() {
        return Err(ConvertError::Probe(format!(
            "{} exited with {:?}",
            config.ffprobe_command, output.code
        )));
    }

    let raw = creation_time_from_json(&output.stdout)?
        .ok_or_else(|| ConvertError::Probe("no creation_time tag".to_string()))?;

    parse_creation_time(&raw)
        .ok_or_else(|| ConvertError::Probe(format!("unrecognised creation_time: {}", raw)))
}

/// Timestamp shown in the report for `path`. Never fails.
pub async fn probe_timestamp<R: ToolRunner>(
    runner: &R,
    config: &Config,
    path: &Path,
    mtime: SystemTime,
) -> String {
    match embedded_timestamp(runner, config, path).await {
        Ok(timestamp) => timestamp,
        Err(e) => {
            debug!(
                "Using modification time for {}: {}",
                path.display(),
                e
            );
            format_mtime(mtime)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolOutput;
    use std::time::Duration;

    struct ProbeStub(Result<ToolOutput, ()>);

    impl ToolRunner for ProbeStub {
        async fn run(&self, _program: &str, _args: &[OsString]) -> Result<ToolOutput, ConvertError> {
            self.0
                .clone()
                .map_err(|_| std::io::Error::from(std::io::ErrorKind::NotFound).into())
        }
    }

    fn ok_json(json: &str) -> ProbeStub {
        ProbeStub(Ok(ToolOutput {
            code: Some(0),
            stdout: json.to_string(),
            stderr: String::new(),
        }))
    }

    #[test]
    fn test_parse_creation_time_variants() {
        assert_eq!(
            parse_creation_time("2023-05-01T10:00:00Z").as_deref(),
            Some("2023-05-01 10:00:00")
        );
        assert_eq!(
            parse_creation_time("2023-05-01T10:00:00.000000Z").as_deref(),
            Some("2023-05-01 10:00:00")
        );
        assert_eq!(
            parse_creation_time("2021-12-24T18:30:15+02:00").as_deref(),
            Some("2021-12-24 18:30:15")
        );
        assert_eq!(
            parse_creation_time("2021-12-24T18:30:15+0200").as_deref(),
            Some("2021-12-24 18:30:15")
        );
        assert_eq!(
            parse_creation_time("2020-01-02 03:04:05").as_deref(),
            Some("2020-01-02 03:04:05")
        );
        assert_eq!(parse_creation_time("yesterday"), None);
        assert_eq!(parse_creation_time(""), None);
    }

    #[test]
    fn test_creation_time_from_json() {
        let json = r#"{"format":{"filename":"a.mp4","tags":{"creation_time":"2023-05-01T10:00:00.000000Z"}}}"#;
        assert_eq!(
            creation_time_from_json(json).unwrap().as_deref(),
            Some("2023-05-01T10:00:00.000000Z")
        );
        assert_eq!(creation_time_from_json(r#"{"format":{}}"#).unwrap(), None);
        assert!(creation_time_from_json("not json").is_err());
    }

    #[tokio::test]
    async fn test_probe_timestamp_uses_embedded_time() {
        let config = Config::default();
        let runner = ok_json(r#"{"format":{"tags":{"creation_time":"2023-05-01T10:00:00Z"}}}"#);
        let ts = probe_timestamp(&runner, &config, Path::new("clip.mp4"), SystemTime::UNIX_EPOCH).await;
        assert_eq!(ts, "2023-05-01 10:00:00");
    }

    #[tokio::test]
    async fn test_probe_timestamp_falls_back_to_mtime() {
        let config = Config::default();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let expected = format_mtime(mtime);

        let cases = vec![
            ok_json(r#"{"format":{"tags":{}}}"#),
            ok_json(r#"{"format":{"tags":{"creation_time":"garbage"}}}"#),
            ok_json("{{{"),
            ProbeStub(Ok(ToolOutput {
                code: Some(1),
                ..Default::default()
            })),
            ProbeStub(Err(())),
        ];

        for runner in cases {
            let ts = probe_timestamp(&runner, &config, Path::new("clip.mp4"), mtime).await;
            assert_eq!(ts, expected);
        }
    }

    #[test]
    fn test_probe_args() {
        let args = probe_args(Path::new("/videos/clip.mp4"));
        assert_eq!(
            args,
            vec!["-v", "quiet", "-print_format", "json", "-show_format", "/videos/clip.mp4"]
        );
    }
}
