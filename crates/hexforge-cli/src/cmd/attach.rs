use super::required;
use crate::output::print_report;
use crate::prompt::{interactive, Prompter};
use anyhow::Context;
use clap::Args;
use hexforge_core::orchestrator::{add_repo_to_usecase, AttachRepository};
use hexforge_core::project::Project;
use std::io::{BufRead, Write};

/// Unset capability flags are read from the repository's existing method.
#[derive(Args, Debug, Default)]
pub struct AttachArgs {
    #[arg(long)]
    pub repo_pkg: Option<String>,
    /// Consumer use-case package
    #[arg(long)]
    pub uc_pkg: Option<String>,
    /// Repository operation, e.g. `GetCustomerByID`
    #[arg(long)]
    pub method: Option<String>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub with_request: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub with_response: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub with_tx: Option<bool>,
}

impl AttachArgs {
    fn is_empty(&self) -> bool {
        self.repo_pkg.is_none()
            && self.uc_pkg.is_none()
            && self.method.is_none()
            && self.with_request.is_none()
            && self.with_response.is_none()
            && self.with_tx.is_none()
    }

    fn prompt(mut self, p: &mut Prompter<impl BufRead, impl Write>) -> anyhow::Result<Self> {
        self.repo_pkg = Some(p.string("Repository package", self.repo_pkg.as_deref())?);
        self.uc_pkg = Some(p.string("Use-case package", self.uc_pkg.as_deref())?);
        self.method = Some(p.string("Method", self.method.as_deref())?);
        self.with_request = p.tristate("With request", self.with_request)?;
        self.with_response = p.tristate("With response", self.with_response)?;
        self.with_tx = p.tristate("With transaction", self.with_tx)?;
        Ok(self)
    }

    fn into_request(self) -> anyhow::Result<AttachRepository> {
        Ok(AttachRepository {
            repo_pkg: required(self.repo_pkg, "--repo-pkg")?,
            uc_pkg: required(self.uc_pkg, "--uc-pkg")?,
            method: required(self.method, "--method")?,
            with_request: self.with_request,
            with_response: self.with_response,
            with_tx: self.with_tx,
        })
    }
}

pub fn run(project: &Project, mut args: AttachArgs, json: bool) -> anyhow::Result<()> {
    if interactive(args.is_empty()) {
        args = args.prompt(&mut Prompter::stdio())?;
    }
    let req = args.into_request()?;
    let report = add_repo_to_usecase(project, &req).with_context(|| {
        format!(
            "failed to attach repository {}.{} to use case '{}'",
            req.repo_pkg, req.method, req.uc_pkg
        )
    })?;
    print_report(&report, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AttachArgs,
    }

    #[test]
    fn bare_flag_means_true_and_absent_means_infer() {
        let w = Wrapper::parse_from([
            "hexforge",
            "--repo-pkg",
            "customer",
            "--uc-pkg",
            "send",
            "--method",
            "Save",
            "--with-request",
            "--with-tx=false",
        ]);
        assert_eq!(w.args.with_request, Some(true));
        assert_eq!(w.args.with_response, None);
        assert_eq!(w.args.with_tx, Some(false));
    }

    #[test]
    fn missing_method_is_reported_by_flag_name() {
        let args = AttachArgs {
            repo_pkg: Some("customer".into()),
            uc_pkg: Some("send".into()),
            ..AttachArgs::default()
        };
        let err = args.into_request().unwrap_err();
        assert!(err.to_string().contains("--method"));
    }
}
