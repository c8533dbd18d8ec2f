//! Durable writer: normalize with `gofmt` when available, then persist atomically.

use crate::config::FormatMode;
use crate::error::Result;
use crate::io::atomic_write;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Result of persisting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persisted {
    /// Set when formatting was requested but the raw text had to be written.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurableWriter {
    pub format: FormatMode,
}

impl DurableWriter {
    pub fn new(format: FormatMode) -> Self {
        Self { format }
    }

    /// Write `text` to `path`, creating parent directories.
    ///
    /// Formatting failures never block the write; they come back as a warning.
    pub fn persist(&self, path: &Path, text: &str) -> Result<Persisted> {
        let (data, warning) = match self.format {
            FormatMode::None => (text.to_string(), None),
            FormatMode::Gofmt => match gofmt(text) {
                Ok(formatted) => (formatted, None),
                Err(reason) => {
                    let warning = format!("{}: written unformatted ({reason})", path.display());
                    tracing::warn!("{warning}");
                    (text.to_string(), Some(warning))
                }
            },
        };
        atomic_write(path, data.as_bytes())?;
        tracing::info!(file = %path.display(), "wrote");
        Ok(Persisted { warning })
    }
}

/// Run `gofmt` over `text`. The error string says why the raw text is kept.
fn gofmt(text: &str) -> std::result::Result<String, String> {
    let bin = which::which("gofmt").map_err(|_| "gofmt not found on PATH".to_string())?;
    let mut child = Command::new(bin)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("failed to spawn gofmt: {e}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| format!("failed to write to gofmt: {e}"))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("gofmt did not finish: {e}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let first = stderr.lines().next().unwrap_or("no diagnostics").trim();
        return Err(format!("gofmt rejected the source: {first}"));
    }
    String::from_utf8(output.stdout).map_err(|_| "gofmt produced non-UTF-8 output".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn raw_mode_writes_text_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("internal/usecase/user/port.go");
        let text = "package user\n\ntype UseCase interface {\n}\n";
        let out = DurableWriter::new(FormatMode::None).persist(&path, text).unwrap();
        assert_eq!(out.warning, None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn unparsable_source_falls_back_to_raw_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.go");
        let text = "package user\n\nfunc (\n";
        let out = DurableWriter::new(FormatMode::Gofmt).persist(&path, text).unwrap();
        // Either gofmt is missing or it rejects the input: both keep the raw text.
        assert!(out.warning.is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn formats_when_gofmt_is_available() {
        if which::which("gofmt").is_err() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dto.go");
        let text = "package user\ntype A struct {\nLongName string\nB int\n}\n";
        let out = DurableWriter::new(FormatMode::Gofmt).persist(&path, text).unwrap();
        assert_eq!(out.warning, None);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\tLongName string\n\tB        int\n"), "{written}");
    }
}
