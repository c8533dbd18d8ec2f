//! Line-based prompts for interactive mode. Enter keeps the shown default.

use anyhow::{bail, Context};
use std::io::{BufRead, Write};

pub const INTERACTIVE_ENV: &str = "HEXFORGE_INTERACTIVE";

/// Prompt when a command got no flags at all, or when forced through the env.
pub fn interactive(no_flags: bool) -> bool {
    no_flags || std::env::var(INTERACTIVE_ENV).is_ok_and(|v| v == "1")
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, label: &str, hint: &str) -> anyhow::Result<String> {
        if hint.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{hint}]: ")?;
        }
        self.output.flush()?;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("failed to read answer from stdin")?;
        Ok(line.trim().to_string())
    }

    pub fn string(&mut self, label: &str, default: Option<&str>) -> anyhow::Result<String> {
        let default = default.unwrap_or_default();
        let answer = self.ask(label, default)?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    /// Empty answer with no default gives `None`.
    pub fn optional(&mut self, label: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        let answer = self.string(label, default)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    pub fn boolean(&mut self, label: &str, default: bool) -> anyhow::Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.ask(label, hint)?;
        Ok(parse_bool(&answer)?.unwrap_or(default))
    }

    /// Yes, no, or Enter to leave the value undecided.
    pub fn tristate(&mut self, label: &str, default: Option<bool>) -> anyhow::Result<Option<bool>> {
        let hint = match default {
            Some(true) => "Y/n/auto",
            Some(false) => "y/N/auto",
            None => "y/n/AUTO",
        };
        let answer = self.ask(label, hint)?;
        if answer.eq_ignore_ascii_case("auto") {
            return Ok(None);
        }
        Ok(parse_bool(&answer)?.or(default))
    }
}

fn parse_bool(answer: &str) -> anyhow::Result<Option<bool>> {
    match answer.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "y" | "yes" | "true" => Ok(Some(true)),
        "n" | "no" | "false" => Ok(Some(false)),
        other => bail!("expected yes or no, got '{other}'"),
    }
}
