//! # External Tools Module
//!
//! Punto unico di contatto con i processi esterni (ffmpeg, ffprobe).
//! Il trait `ToolRunner` permette ai test di sostituire i tool reali con fake deterministici.

use std::ffi::OsString;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ConvertError, FFMPEG_GUIDANCE};

/// Output captured from a finished tool process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code (None when terminated by a signal)
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last non-empty stderr lines, for console diagnostics
    pub fn stderr_tail(&self, lines: usize) -> String {
        let tail: Vec<&str> = self
            .stderr
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let start = tail.len().saturating_sub(lines);
        tail[start..].join("\n")
    }
}

/// Runs an external program to completion.
///
/// Arguments are passed through as `OsString` so paths reach the child
/// process byte for byte. `Err` means the program could not be started at all; a program that ran
/// and failed is reported through [`ToolOutput::code`].
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolOutput, ConvertError>;
}

/// Runs tools as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolOutput, ConvertError> {
        debug!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Verify that the transcoder can be invoked
pub async fn check_transcoder<R: ToolRunner>(runner: &R, config: &Config) -> Result<(), ConvertError> {
    let args = vec![OsString::from("-version")];
    match runner.run(&config.ffmpeg_command, &args).await {
        Ok(output) if output.success() => {
            debug!(
                "Found {}: {}",
                config.ffmpeg_command,
                output.stdout.lines().next().unwrap_or_default()
            );
            Ok(())
        }
        Ok(output) => {
            warn!("{} -version exited with {:?}", config.ffmpeg_command, output.code);
            Err(ConvertError::MissingDependency(FFMPEG_GUIDANCE.to_string()))
        }
        Err(e) => {
            warn!("Could not start {}: {}", config.ffmpeg_command, e);
            Err(ConvertError::MissingDependency(FFMPEG_GUIDANCE.to_string()))
        }
    }
}
