use crate::error::{ForgeError, Result};
use crate::paths::{self, validate_method, validate_package};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ArtifactKind / Layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Port,
    Implementation,
    DataShape,
    WiringRegistry,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Port => "port",
            ArtifactKind::Implementation => "implementation",
            ArtifactKind::DataShape => "data_shape",
            ArtifactKind::WiringRegistry => "wiring_registry",
        }
    }

    /// Kind of a managed file, from its project-relative path.
    pub fn of(rel: &Path) -> Self {
        let registries = [
            paths::USECASE_REGISTRY,
            paths::INFRA_USECASE_INIT,
            paths::INFRA_HANDLER_INIT,
            paths::REPOSITORY_REGISTRY,
            paths::INFRA_REPOSITORY_INIT,
        ];
        if registries.iter().any(|r| rel == Path::new(r)) {
            return ArtifactKind::WiringRegistry;
        }
        match rel.file_name().and_then(|n| n.to_str()) {
            Some(paths::PORT_FILE) => ArtifactKind::Port,
            Some(paths::DTO_FILE) => ArtifactKind::DataShape,
            _ => ArtifactKind::Implementation,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which directory tree and naming conventions an artifact follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Usecase,
    Handler,
    Repository,
    Outbound,
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Usecase => "usecase",
            Layer::Handler => "handler",
            Layer::Repository => "repository",
            Layer::Outbound => "outbound",
        }
    }

    /// Name of the request-side data shape suffix for this layer.
    pub fn request_suffix(self) -> &'static str {
        match self {
            Layer::Repository => "Param",
            _ => "Request",
        }
    }

    /// Receiver variable and type of generated implementations.
    pub fn receiver(self) -> (&'static str, &'static str) {
        match self {
            Layer::Usecase => ("u", "useCase"),
            Layer::Repository => ("r", "Repository"),
            Layer::Outbound => ("i", "impl"),
            Layer::Handler => ("h", "handler"),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CapabilityTriple / Operation
// ---------------------------------------------------------------------------

/// The three signature-shaping booleans of an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityTriple {
    pub has_request: bool,
    pub has_response: bool,
    pub has_transactional_context: bool,
}

impl CapabilityTriple {
    pub fn new(has_request: bool, has_response: bool, has_transactional_context: bool) -> Self {
        Self {
            has_request,
            has_response,
            has_transactional_context,
        }
    }

    /// Explicit flags win, one by one; unset flags come from `inferred`.
    pub fn resolve(
        request: Option<bool>,
        response: Option<bool>,
        tx: Option<bool>,
        inferred: CapabilityTriple,
    ) -> Self {
        Self {
            has_request: request.unwrap_or(inferred.has_request),
            has_response: response.unwrap_or(inferred.has_response),
            has_transactional_context: tx.unwrap_or(inferred.has_transactional_context),
        }
    }
}

impl fmt::Display for CapabilityTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request={} response={} tx={}",
            self.has_request, self.has_response, self.has_transactional_context
        )
    }
}

/// A named operation on a package-level port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub package: String,
    pub method: String,
    pub triple: CapabilityTriple,
}

impl Operation {
    /// Validates the package and method names before anything else happens.
    pub fn new(package: &str, method: &str, triple: CapabilityTriple) -> Result<Self> {
        validate_package(package)?;
        validate_method(method)?;
        Ok(Self {
            package: package.to_string(),
            method: method.to_string(),
            triple,
        })
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        }
    }

    /// Route group variable declared in every handler's `Handle()`.
    pub fn group(self) -> &'static str {
        match self {
            Visibility::Public => "groupPublic",
            Visibility::Internal => "groupInternal",
            Visibility::Private => "groupPrivate",
        }
    }

    pub fn security(self) -> Option<&'static str> {
        match self {
            Visibility::Public => None,
            Visibility::Internal => Some("BasicAuth"),
            Visibility::Private => Some("BearerAuth"),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "internal" => Ok(Visibility::Internal),
            "private" => Ok(Visibility::Private),
            _ => Err(ForgeError::InvalidVisibility(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpVerb
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpVerb::Get),
            "POST" => Ok(HttpVerb::Post),
            "PUT" => Ok(HttpVerb::Put),
            "DELETE" => Ok(HttpVerb::Delete),
            _ => Err(ForgeError::InvalidVerb(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RepositoryBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryBackend {
    #[default]
    Postgres,
}

impl RepositoryBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            RepositoryBackend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for RepositoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryBackend {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(RepositoryBackend::Postgres),
            _ => Err(ForgeError::UnsupportedBackend(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_kind_from_path() {
        assert_eq!(ArtifactKind::of(Path::new("internal/usecase/user/port.go")), ArtifactKind::Port);
        assert_eq!(ArtifactKind::of(Path::new("internal/usecase/user/dto.go")), ArtifactKind::DataShape);
        assert_eq!(
            ArtifactKind::of(Path::new("internal/adapters/outbound/db/postgres/customer/repository.go")),
            ArtifactKind::Implementation
        );
        assert_eq!(
            ArtifactKind::of(Path::new("internal/infrastructure/di/repository.go")),
            ArtifactKind::WiringRegistry
        );
        assert_eq!(ArtifactKind::of(Path::new("internal/usecase/di.go")), ArtifactKind::WiringRegistry);
    }

    #[test]
    fn verbs_parse_case_insensitively() {
        assert_eq!(" get ".parse::<HttpVerb>().unwrap(), HttpVerb::Get);
        assert_eq!("Delete".parse::<HttpVerb>().unwrap(), HttpVerb::Delete);
        assert!(matches!(
            "PATCH".parse::<HttpVerb>(),
            Err(ForgeError::InvalidVerb(_))
        ));
    }

    #[test]
    fn visibility_groups() {
        assert_eq!("INTERNAL".parse::<Visibility>().unwrap().group(), "groupInternal");
        assert_eq!(Visibility::Private.security(), Some("BearerAuth"));
        assert!("secret".parse::<Visibility>().is_err());
    }

    #[test]
    fn only_postgres_backend() {
        assert_eq!(
            "Postgres".parse::<RepositoryBackend>().unwrap(),
            RepositoryBackend::Postgres
        );
        assert!(matches!(
            "mysql".parse::<RepositoryBackend>(),
            Err(ForgeError::UnsupportedBackend(_))
        ));
    }

    #[test]
    fn explicit_flags_override_inferred_individually() {
        let inferred = CapabilityTriple::new(true, true, false);
        let t = CapabilityTriple::resolve(None, Some(false), Some(true), inferred);
        assert_eq!(t, CapabilityTriple::new(true, false, true));
    }

    #[test]
    fn operation_validates_names() {
        assert!(Operation::new("user", "GetUserByID", CapabilityTriple::default()).is_ok());
        assert!(matches!(
            Operation::new("user", "getUser", CapabilityTriple::default()),
            Err(ForgeError::InvalidMethod(_))
        ));
        assert!(matches!(
            Operation::new("User", "Get", CapabilityTriple::default()),
            Err(ForgeError::InvalidPackage(_))
        ));
    }
}
