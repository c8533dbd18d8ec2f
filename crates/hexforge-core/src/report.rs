use crate::types::ArtifactKind;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    Created,
    Updated,
    Unchanged,
}

impl FileAction {
    pub fn as_str(self) -> &'static str {
        match self {
            FileAction::Created => "created",
            FileAction::Updated => "updated",
            FileAction::Unchanged => "exists",
        }
    }

    /// Strongest of two actions on the same file within one run.
    fn merge(self, other: FileAction) -> FileAction {
        match (self, other) {
            (FileAction::Created, _) | (_, FileAction::Created) => FileAction::Created,
            (FileAction::Updated, _) | (_, FileAction::Updated) => FileAction::Updated,
            _ => FileAction::Unchanged,
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Relative to the project root.
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub action: FileAction,
}

/// What one command did: touched files in first-touch order, plus warnings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub files: Vec<FileChange>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &Path, action: FileAction) {
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(existing) => existing.action = existing.action.merge(action),
            None => self.files.push(FileChange {
                path: path.to_path_buf(),
                kind: ArtifactKind::of(path),
                action,
            }),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }

    pub fn action_for(&self, path: &Path) -> Option<FileAction> {
        self.files.iter().find(|f| f.path == path).map(|f| f.action)
    }

    /// True when any file was created or modified.
    pub fn changed(&self) -> bool {
        self.files.iter().any(|f| f.action != FileAction::Unchanged)
    }
}
