use super::{ensure_impl_method, ensure_port_member, ensure_shapes, step, wiring};
use crate::error::Result;
use crate::paths;
use crate::project::Project;
use crate::report::Report;
use crate::templates::{self, Signature};
use crate::types::{CapabilityTriple, Layer, Operation};

#[derive(Debug, Clone, Default)]
pub struct CreateUsecase {
    pub pkg: String,
    pub method: String,
    pub with_request: bool,
    pub with_response: bool,
}

/// Add an operation to a use-case port, its data shapes and implementation,
/// then wire the package into both use-case registries.
pub fn create_usecase(project: &Project, req: &CreateUsecase) -> Result<Report> {
    let op = Operation::new(
        &req.pkg,
        &req.method,
        CapabilityTriple::new(req.with_request, req.with_response, false),
    )?;
    let mut report = Report::new();
    ensure_operation(project, &mut report, &op)?;
    wire(project, &mut report, &op.package)?;
    tracing::info!(pkg = %op.package, method = %op.method, "use case ready");
    Ok(report)
}

pub(crate) fn ensure_operation(project: &Project, report: &mut Report, op: &Operation) -> Result<()> {
    let pkg = op.package.as_str();
    let dir = paths::usecase_dir(pkg);
    let sig = Signature::new(Layer::Usecase, op);

    step("usecase port", || {
        ensure_port_member(
            project,
            report,
            &dir.join(paths::PORT_FILE),
            "UseCase",
            || templates::usecase_port(pkg),
            &sig,
        )
    })?;
    step("usecase data shapes", || {
        ensure_shapes(project, report, &dir.join(paths::DTO_FILE), pkg, &sig)
    })?;
    step("usecase implementation", || {
        ensure_impl_method(
            project,
            report,
            &dir.join(paths::USECASE_IMPL_FILE),
            || templates::usecase_impl(pkg, &project.module),
            pkg,
            &sig,
        )
    })
}

pub(crate) fn wire(project: &Project, report: &mut Report, pkg: &str) -> Result<()> {
    for entry in wiring::usecase_entries(project, pkg) {
        step("wire usecase", || entry.apply(project, report))?;
    }
    Ok(())
}
