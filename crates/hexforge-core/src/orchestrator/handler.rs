use super::{step, usecase, wiring};
use crate::error::{ForgeError, Result};
use crate::imports::ensure_import;
use crate::naming::to_pascal;
use crate::patch::{ensure_block_member, ensure_declared, BlockPatch, Outcome};
use crate::paths::{self, validate_identifier, validate_method, validate_package};
use crate::project::Project;
use crate::report::Report;
use crate::route::{normalize_endpoint, normalize_path_params, route_line};
use crate::templates::{self, Endpoint, ROUTES_MARKER};
use crate::types::{CapabilityTriple, HttpVerb, Operation, Visibility};

#[derive(Debug, Clone, Default)]
pub struct CreateHandler {
    pub pkg: String,
    /// `None` creates and registers the skeleton only.
    pub route: Option<HandlerRoute>,
}

#[derive(Debug, Clone, Default)]
pub struct HandlerRoute {
    pub uc_pkg: String,
    pub uc_method: String,
    /// Handler method name, e.g. `getUserByID`.
    pub method: String,
    pub endpoint: String,
    pub visibility: Visibility,
    pub verb: HttpVerb,
    /// Swagger tag; defaults to the PascalCase handler package.
    pub tag: Option<String>,
    pub with_request: bool,
    pub with_response: bool,
}

pub fn create_handler(project: &Project, req: &CreateHandler) -> Result<Report> {
    validate_package(&req.pkg)?;
    let mut report = Report::new();

    let Some(route) = &req.route else {
        ensure_skeleton(project, &mut report, &req.pkg)?;
        step("register handler", || {
            wiring::handler_entry(project, &req.pkg).apply(project, &mut report)
        })?;
        tracing::info!(pkg = %req.pkg, "handler skeleton ready");
        return Ok(report);
    };

    validate_identifier(&route.method)?;
    validate_package(&route.uc_pkg)?;
    validate_method(&route.uc_method)?;
    let path = normalize_endpoint(&route.endpoint);
    if path.is_empty() {
        return Err(ForgeError::MissingArgument("endpoint".into()));
    }
    let triple = CapabilityTriple::new(route.with_request, route.with_response, false);
    let op = Operation::new(&route.uc_pkg, &route.uc_method, triple)?;
    let tag = route.tag.clone().unwrap_or_else(|| to_pascal(&req.pkg));
    let endpoint = Endpoint {
        handler_pkg: &req.pkg,
        method: &route.method,
        uc_pkg: &route.uc_pkg,
        uc_method: &route.uc_method,
        triple,
        visibility: route.visibility,
        verb: route.verb,
        path: &path,
        tag: &tag,
    };

    usecase::ensure_operation(project, &mut report, &op)?;
    usecase::wire(project, &mut report, &op.package)?;
    ensure_skeleton(project, &mut report, &req.pkg)?;

    let rel = paths::handler_dir(&req.pkg).join(paths::HANDLER_FILE);
    step("handler route", || {
        let line = route_line(route.visibility, route.verb, &path, &route.method);
        project.edit(&mut report, &rel, |src| {
            let patch = BlockPatch::function_body(Some("handler"), "Handle", line.as_str())
                .marker(ROUTES_MARKER);
            ensure_block_member(src, &patch, &rel)?;
            Ok(())
        })
    })?;
    step("handler method", || {
        project.edit(&mut report, &rel, |src| {
            let method = templates::handler_method(&endpoint);
            if ensure_declared(src, &endpoint.method_needle(), &method) == Outcome::Inserted {
                for import in endpoint.imports(&project.module) {
                    *src = ensure_import(src, &import);
                }
            }
            Ok(())
        })
    })?;

    let (_, params) = normalize_path_params(&path);
    if triple.has_request && !params.is_empty() {
        step("request path parameters", || {
            add_path_params(project, &mut report, &route.uc_pkg, &route.uc_method, &params)
        })?;
    }

    step("register handler", || {
        wiring::handler_entry(project, &req.pkg).apply(project, &mut report)
    })?;
    tracing::info!(
        pkg = %req.pkg,
        method = %route.method,
        verb = %route.verb,
        path = %path,
        "handler ready"
    );
    Ok(report)
}

fn ensure_skeleton(project: &Project, report: &mut Report, pkg: &str) -> Result<()> {
    let rel = paths::handler_dir(pkg).join(paths::HANDLER_FILE);
    step("handler skeleton", || {
        project.upsert(
            report,
            &rel,
            || templates::handler_skeleton(pkg, &project.module),
            |_| Ok(()),
        )
    })
}

/// Retrofit one `param:"<name>"` field per path parameter into the use
/// case's request shape. A missing or non-flat shape only produces a warning.
fn add_path_params(
    project: &Project,
    report: &mut Report,
    uc_pkg: &str,
    uc_method: &str,
    params: &[String],
) -> Result<()> {
    let rel = paths::usecase_dir(uc_pkg).join(paths::DTO_FILE);
    let ty = format!("{uc_method}Request");
    let anchor = format!("type {ty} struct {{");
    let skipped = |reason: &str| {
        format!(
            "{}: {ty} {reason}; path parameters {} not added",
            rel.display(),
            params.join(", ")
        )
    };
    if !project.exists(&rel) {
        report.warn(skipped("not found"));
        return Ok(());
    }
    let result = project.edit(report, &rel, |src| {
        for param in params {
            let (field, needle) = templates::path_param_field(param);
            let patch = BlockPatch::lines(&anchor, field).needle(needle);
            ensure_block_member(src, &patch, &rel)?;
        }
        Ok(())
    });
    match result {
        Err(ForgeError::AnchorNotFound { .. }) => {
            report.warn(skipped("not found"));
            Ok(())
        }
        Err(ForgeError::NestedBlock { .. } | ForgeError::UnclosedBlock { .. }) => {
            report.warn(skipped("is not a flat struct"));
            Ok(())
        }
        other => other,
    }
}
