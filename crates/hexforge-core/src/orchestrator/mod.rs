//! One pipeline per command. Every step re-reads its file, patches it and
//! writes only when the text changed. The first failing step aborts the
//! pipeline as [`ForgeError::StepFailed`]; files written by earlier steps stay.

pub mod attach;
pub mod handler;
pub mod outbound;
pub mod repository;
pub mod usecase;
pub mod wiring;

pub use attach::{add_repo_to_usecase, AttachRepository};
pub use handler::{create_handler, CreateHandler, HandlerRoute};
pub use outbound::{create_outbound, CreateOutbound};
pub use repository::{create_repository, CreateRepository};
pub use usecase::{create_usecase, CreateUsecase};

use crate::error::{ForgeError, Result};
use crate::imports::ensure_import;
use crate::patch::{ensure_block_member, ensure_declared, BlockPatch, Outcome};
use crate::project::Project;
use crate::report::Report;
use crate::templates::{self, Signature, TRACER_IMPORT};
use std::path::Path;

/// Run one named pipeline step.
fn step<T>(name: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    f().map_err(|e: ForgeError| e.in_step(name))
}

/// Ensure `sig` is a member of `type <iface> interface` in `rel`.
fn ensure_port_member(
    project: &Project,
    report: &mut Report,
    rel: &Path,
    iface: &str,
    initial: impl FnOnce() -> String,
    sig: &Signature<'_>,
) -> Result<()> {
    let anchor = format!("type {iface} interface {{");
    let member = sig.member();
    project.upsert(report, rel, initial, |src| {
        let patch = BlockPatch::lines(&anchor, member.as_str())
            .needle(sig.member_needle())
            .or_synthesize(templates::interface_block(iface, &[member.clone()]));
        if ensure_block_member(src, &patch, rel)? != Outcome::AlreadyPresent {
            for import in sig.imports() {
                *src = ensure_import(src, import);
            }
        }
        Ok(())
    })
}

/// Ensure the data shapes `sig` refers to exist in `rel`.
fn ensure_shapes(
    project: &Project,
    report: &mut Report,
    rel: &Path,
    pkg: &str,
    sig: &Signature<'_>,
) -> Result<()> {
    let names = templates::shapes(sig);
    if names.is_empty() {
        return Ok(());
    }
    project.upsert(report, rel, || templates::dto_file(pkg), |src| {
        for name in &names {
            ensure_declared(src, &templates::type_needle(name), &templates::shape_struct(name));
        }
        Ok(())
    })
}

/// Ensure the implementing method of `sig` exists in `rel`.
fn ensure_impl_method(
    project: &Project,
    report: &mut Report,
    rel: &Path,
    initial: impl FnOnce() -> String,
    pkg: &str,
    sig: &Signature<'_>,
) -> Result<()> {
    project.upsert(report, rel, initial, |src| {
        let method = templates::impl_method(pkg, sig);
        if ensure_declared(src, &sig.method_needle(), &method) == Outcome::Inserted {
            for import in sig.imports().into_iter().chain([TRACER_IMPORT]) {
                *src = ensure_import(src, import);
            }
        }
        Ok(())
    })
}
