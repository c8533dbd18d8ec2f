use crate::error::{ForgeError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const USECASE_DIR: &str = "internal/usecase";
pub const USECASE_REGISTRY: &str = "internal/usecase/di.go";
pub const INFRA_USECASE_INIT: &str = "internal/infrastructure/di/usecase.go";

pub const HANDLER_DIR: &str = "internal/adapters/inbound/http";
pub const INFRA_HANDLER_INIT: &str = "internal/infrastructure/di/handler.go";

pub const DB_DIR: &str = "internal/adapters/outbound/db";
pub const POSTGRES_DIR: &str = "internal/adapters/outbound/db/postgres";
pub const REPOSITORY_REGISTRY: &str = "internal/adapters/outbound/db/di.go";
pub const INFRA_REPOSITORY_INIT: &str = "internal/infrastructure/di/repository.go";

pub const OUTBOUND_DIR: &str = "internal/adapters/outbound";

pub const GO_MOD: &str = "go.mod";
pub const CONFIG_FILE: &str = "hexforge.yaml";

pub const PORT_FILE: &str = "port.go";
pub const DTO_FILE: &str = "dto.go";
pub const USECASE_IMPL_FILE: &str = "usecase.go";
pub const OUTBOUND_IMPL_FILE: &str = "impl.go";
pub const REPOSITORY_IMPL_FILE: &str = "repository.go";
pub const HANDLER_FILE: &str = "handler.go";

// ---------------------------------------------------------------------------
// Path helpers (relative to the project root)
// ---------------------------------------------------------------------------

pub fn usecase_dir(pkg: &str) -> PathBuf {
    Path::new(USECASE_DIR).join(pkg)
}

pub fn handler_dir(pkg: &str) -> PathBuf {
    Path::new(HANDLER_DIR).join(pkg)
}

pub fn repository_dir(pkg: &str) -> PathBuf {
    Path::new(POSTGRES_DIR).join(pkg)
}

pub fn outbound_dir(pkg: &str) -> PathBuf {
    Path::new(OUTBOUND_DIR).join(pkg)
}

/// Go import path of a package directory inside `module`.
pub fn import_path(module: &str, dir: &Path) -> String {
    let rel = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{module}/{rel}")
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

static PACKAGE_RE: OnceLock<Regex> = OnceLock::new();
static IDENT_RE: OnceLock<Regex> = OnceLock::new();

fn package_re() -> &'static Regex {
    PACKAGE_RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap())
}

fn ident_re() -> &'static Regex {
    IDENT_RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

pub fn validate_package(pkg: &str) -> Result<()> {
    if pkg.len() > 64 || !package_re().is_match(pkg) {
        return Err(ForgeError::InvalidPackage(pkg.to_string()));
    }
    Ok(())
}

/// Operation names are exported Go identifiers.
pub fn validate_method(method: &str) -> Result<()> {
    let exported = method.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if !exported || !ident_re().is_match(method) {
        return Err(ForgeError::InvalidMethod(method.to_string()));
    }
    Ok(())
}

pub fn validate_identifier(name: &str) -> Result<()> {
    if !ident_re().is_match(name) {
        return Err(ForgeError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
