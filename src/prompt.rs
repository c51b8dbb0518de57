//! Operator interaction: the per-file resolution question.

use std::collections::VecDeque;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::config::{ResolutionPreset, SKIP_TOKEN};
use crate::error::ConvertError;

/// Asks the operator a question and returns the raw answer.
///
/// `Ok(None)` means the input was closed.
#[allow(async_fn_in_trait)]
pub trait Prompt {
    async fn ask(&mut self, question: &str) -> Result<Option<String>, ConvertError>;
}

/// Reads answers from the terminal
pub struct StdinPrompt {
    reader: BufReader<Stdin>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> Result<Option<String>, ConvertError> {
        print!("{}", question);
        std::io::stdout()
            .flush()
            .map_err(|e| ConvertError::Prompt(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| ConvertError::Prompt(e.to_string()))?;

        if read == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Answers from a fixed script, in order
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions received so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, question: &str) -> Result<Option<String>, ConvertError> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front())
    }
}

/// The operator's decision for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<'a> {
    Convert(&'a ResolutionPreset),
    Skip,
    Invalid,
}

impl<'a> Choice<'a> {
    pub fn parse(answer: &str, presets: &'a [ResolutionPreset]) -> Self {
        let token = answer.trim();
        if token.eq_ignore_ascii_case(SKIP_TOKEN) {
            return Self::Skip;
        }
        presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(token))
            .map(Self::Convert)
            .unwrap_or(Self::Invalid)
    }
}

/// `Choose resolution: HD (1080p), 2K (1440p), or SKIP? `
pub fn resolution_question(presets: &[ResolutionPreset]) -> String {
    let options: Vec<String> = presets
        .iter()
        .map(|preset| format!("{} ({})", preset.name, preset.label()))
        .collect();
    format!("Choose resolution: {}, or {}? ", options.join(", "), SKIP_TOKEN)
}
