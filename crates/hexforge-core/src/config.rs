use crate::error::Result;
use crate::io::read_optional;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Module path used when neither the config nor `go.mod` names one.
pub const DEFAULT_MODULE: &str = "go-template-hexagonal";

// ---------------------------------------------------------------------------
// FormatMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    /// Pipe every written file through `gofmt`.
    #[default]
    Gofmt,
    /// Write text exactly as generated.
    None,
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatMode::Gofmt => f.write_str("gofmt"),
            FormatMode::None => f.write_str("none"),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Contents of the optional `hexforge.yaml` at the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Go module path override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub format: FormatMode,
}

impl Config {
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(paths::CONFIG_FILE);
        match read_optional(&path)? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Config::default()),
        }
    }

    /// Module path: config override, then `go.mod`, then [`DEFAULT_MODULE`].
    pub fn resolve_module(&self, root: &Path) -> Result<String> {
        if let Some(m) = self.module.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            return Ok(m.to_string());
        }
        let go_mod = read_optional(&root.join(paths::GO_MOD))?;
        Ok(go_mod
            .as_deref()
            .and_then(module_from_go_mod)
            .unwrap_or_else(|| DEFAULT_MODULE.to_string()))
    }
}

/// First `module` directive of a `go.mod` file.
pub fn module_from_go_mod(data: &str) -> Option<String> {
    data.lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix("module "))
        .map(|m| m.trim().trim_matches('"').to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.format, FormatMode::Gofmt);
    }

    #[test]
    fn parses_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("hexforge.yaml"),
            "module: example.com/payments\nformat: none\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.module.as_deref(), Some("example.com/payments"));
        assert_eq!(cfg.format, FormatMode::None);
    }

    #[test]
    fn malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hexforge.yaml"), "format: [gofmt\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn module_resolution_order() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::default();
        assert_eq!(cfg.resolve_module(dir.path()).unwrap(), DEFAULT_MODULE);

        std::fs::write(dir.path().join("go.mod"), "// header\nmodule example.com/app\n\ngo 1.22\n").unwrap();
        assert_eq!(cfg.resolve_module(dir.path()).unwrap(), "example.com/app");

        let cfg = Config {
            module: Some("example.com/override".into()),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_module(dir.path()).unwrap(), "example.com/override");
    }
}
