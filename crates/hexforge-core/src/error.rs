use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("invalid package '{0}': must be a lowercase Go identifier")]
    InvalidPackage(String),

    #[error("invalid method '{0}': must be PascalCase (exported)")]
    InvalidMethod(String),

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("invalid verb '{0}': must be one of GET|POST|PUT|DELETE")]
    InvalidVerb(String),

    #[error("invalid endpoint type '{0}': must be one of public|internal|private")]
    InvalidVisibility(String),

    #[error("unsupported repository type '{0}': only 'postgres' is supported")]
    UnsupportedBackend(String),

    #[error("missing required value: {0}")]
    MissingArgument(String),

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("package '{package}' not found under {}", path.display())]
    PackageNotFound { package: String, path: PathBuf },

    #[error("'{anchor}' not found in {}", path.display())]
    AnchorNotFound { anchor: String, path: PathBuf },

    #[error("'{anchor}' in {} has no closing terminator", path.display())]
    UnclosedBlock { anchor: String, path: PathBuf },

    #[error("'{anchor}' in {} contains a nested block; refusing to guess its end", path.display())]
    NestedBlock { anchor: String, path: PathBuf },

    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: &'static str,
        #[source]
        source: Box<ForgeError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ForgeError {
    /// Tag an error with the pipeline step it aborted.
    pub fn in_step(self, step: &'static str) -> Self {
        match self {
            // Keep the innermost step; nested pipelines already named it.
            e @ ForgeError::StepFailed { .. } => e,
            other => ForgeError::StepFailed {
                step,
                source: Box::new(other),
            },
        }
    }

    /// True for errors raised before any file is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForgeError::InvalidPackage(_)
                | ForgeError::InvalidMethod(_)
                | ForgeError::InvalidIdentifier(_)
                | ForgeError::InvalidVerb(_)
                | ForgeError::InvalidVisibility(_)
                | ForgeError::UnsupportedBackend(_)
                | ForgeError::MissingArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_wrapping_keeps_innermost_step() {
        let inner = ForgeError::FileNotFound {
            path: PathBuf::from("internal/usecase/di.go"),
        };
        let wrapped = inner.in_step("wire usecase").in_step("create handler");
        let msg = wrapped.to_string();
        assert!(msg.starts_with("step 'wire usecase' failed"), "{msg}");
        assert!(msg.contains("internal/usecase/di.go"));
    }

    #[test]
    fn validation_family() {
        assert!(ForgeError::InvalidMethod("send".into()).is_validation());
        assert!(!ForgeError::FileNotFound {
            path: PathBuf::from("x")
        }
        .is_validation());
    }
}
