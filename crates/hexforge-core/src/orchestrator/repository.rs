use super::{attach, ensure_impl_method, ensure_shapes, step, wiring};
use crate::error::Result;
use crate::paths::{self, validate_package};
use crate::project::Project;
use crate::report::Report;
use crate::templates::{self, Signature};
use crate::types::{CapabilityTriple, Layer, Operation, RepositoryBackend};

#[derive(Debug, Clone, Default)]
pub struct CreateRepository {
    pub pkg: String,
    pub method: String,
    pub backend: RepositoryBackend,
    pub with_request: bool,
    pub with_response: bool,
    pub with_tx: bool,
    /// Consumer use case to attach the new operation to.
    pub add_to: Option<String>,
}

pub fn create_repository(project: &Project, req: &CreateRepository) -> Result<Report> {
    let op = Operation::new(
        &req.pkg,
        &req.method,
        CapabilityTriple::new(req.with_request, req.with_response, req.with_tx),
    )?;
    if let Some(consumer) = &req.add_to {
        validate_package(consumer)?;
    }
    let mut report = Report::new();
    ensure_operation(project, &mut report, req.backend, &op)?;

    if let Some(consumer) = &req.add_to {
        let dir = paths::usecase_dir(consumer);
        if project.path(&dir).is_dir() {
            attach::wire_dependency(project, &mut report, consumer, &op)?;
        } else {
            report.warn(format!(
                "use case '{consumer}' not found under {}; repository not attached",
                dir.display()
            ));
        }
    }
    tracing::info!(pkg = %op.package, method = %op.method, backend = %req.backend, "repository ready");
    Ok(report)
}

/// Implementation, data shapes and registry entries of one repository operation.
pub(crate) fn ensure_operation(
    project: &Project,
    report: &mut Report,
    backend: RepositoryBackend,
    op: &Operation,
) -> Result<()> {
    let pkg = op.package.as_str();
    let dir = match backend {
        RepositoryBackend::Postgres => paths::repository_dir(pkg),
    };
    let sig = Signature::new(Layer::Repository, op);

    step("repository implementation", || {
        ensure_impl_method(
            project,
            report,
            &dir.join(paths::REPOSITORY_IMPL_FILE),
            || templates::repository_impl(pkg, &project.module),
            pkg,
            &sig,
        )
    })?;
    step("repository data shapes", || {
        ensure_shapes(project, report, &dir.join(paths::DTO_FILE), pkg, &sig)
    })?;
    for entry in wiring::repository_entries(project, pkg) {
        step("register repository", || entry.apply(project, report))?;
    }
    Ok(())
}
