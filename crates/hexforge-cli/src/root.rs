use hexforge_core::paths::GO_MOD;
use std::path::{Path, PathBuf};

/// Resolve the Go project root.
///
/// Priority:
/// 1. `--root` flag / `HEXFORGE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `go.mod`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(explicit, &cwd)
}

fn resolve_from(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    cwd.ancestors()
        .find(|dir| dir.join(GO_MOD).is_file())
        .unwrap_or(cwd)
        .to_path_buf()
}
