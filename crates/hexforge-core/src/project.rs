//! The project a command operates on: an explicit root, its Go module path
//! and the writer every file goes through.

use crate::config::{Config, FormatMode};
use crate::error::Result;
use crate::io::{read_optional, read_required};
use crate::report::{FileAction, Report};
use crate::writer::DurableWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub module: String,
    pub writer: DurableWriter,
}

impl Project {
    /// Load `hexforge.yaml` (if any) and resolve the module path.
    pub fn open(root: &Path, no_format: bool) -> Result<Self> {
        let config = Config::load(root)?;
        let module = config.resolve_module(root)?;
        let format = if no_format {
            FormatMode::None
        } else {
            config.format
        };
        tracing::debug!(root = %root.display(), %module, %format, "opened project");
        Ok(Self::new(root, module, DurableWriter::new(format)))
    }

    pub fn new(root: &Path, module: impl Into<String>, writer: DurableWriter) -> Self {
        Self {
            root: root.to_path_buf(),
            module: module.into(),
            writer,
        }
    }

    pub fn path(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    pub fn exists(&self, rel: &Path) -> bool {
        self.path(rel).exists()
    }

    /// Go import spec of a package directory, e.g. `"example.com/app/internal/usecase/user"`.
    pub fn import_of(&self, dir: &Path) -> String {
        format!("\"{}\"", crate::paths::import_path(&self.module, dir))
    }

    /// Patch a file that must already exist. Nothing is written when the
    /// edit fails or leaves the text unchanged.
    pub fn edit<F>(&self, report: &mut Report, rel: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut String) -> Result<()>,
    {
        let original = read_required(&self.path(rel))?;
        self.apply(report, rel, original, f)
    }

    /// Like [`Project::edit`], but a missing file starts from `initial()`.
    pub fn upsert<I, F>(&self, report: &mut Report, rel: &Path, initial: I, f: F) -> Result<()>
    where
        I: FnOnce() -> String,
        F: FnOnce(&mut String) -> Result<()>,
    {
        let Some(original) = read_optional(&self.path(rel))? else {
            let mut text = initial();
            f(&mut text)?;
            self.persist(report, rel, &text)?;
            report.record(rel, FileAction::Created);
            return Ok(());
        };
        self.apply(report, rel, original, f)
    }

    fn apply<F>(&self, report: &mut Report, rel: &Path, original: String, f: F) -> Result<()>
    where
        F: FnOnce(&mut String) -> Result<()>,
    {
        let mut text = original.clone();
        f(&mut text)?;
        let action = if text == original {
            FileAction::Unchanged
        } else {
            self.persist(report, rel, &text)?;
            FileAction::Updated
        };
        report.record(rel, action);
        Ok(())
    }

    fn persist(&self, report: &mut Report, rel: &Path, text: &str) -> Result<()> {
        let persisted = self.writer.persist(&self.path(rel), text)?;
        if let Some(warning) = persisted.warning {
            report.warn(warning);
        }
        Ok(())
    }
}
