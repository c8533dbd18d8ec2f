use super::required;
use crate::output::print_report;
use crate::prompt::{interactive, Prompter};
use anyhow::Context;
use clap::Args;
use hexforge_core::orchestrator::{create_usecase, CreateUsecase};
use hexforge_core::project::Project;
use std::io::{BufRead, Write};

#[derive(Args, Debug, Default)]
pub struct UsecaseArgs {
    /// Use-case package, e.g. `user`
    #[arg(long)]
    pub pkg: Option<String>,
    /// Exported operation name, e.g. `GetUserByID`
    #[arg(long)]
    pub method: Option<String>,
    /// The operation takes a `<Method>Request`
    #[arg(long)]
    pub with_request: bool,
    /// The operation returns a `<Method>Response`
    #[arg(long)]
    pub with_response: bool,
}

impl UsecaseArgs {
    fn is_empty(&self) -> bool {
        self.pkg.is_none() && self.method.is_none() && !self.with_request && !self.with_response
    }

    fn prompt(mut self, p: &mut Prompter<impl BufRead, impl Write>) -> anyhow::Result<Self> {
        self.pkg = Some(p.string("Use-case package", self.pkg.as_deref())?);
        self.method = Some(p.string("Method", self.method.as_deref())?);
        self.with_request = p.boolean("With request", self.with_request)?;
        self.with_response = p.boolean("With response", self.with_response)?;
        Ok(self)
    }

    fn into_request(self) -> anyhow::Result<CreateUsecase> {
        Ok(CreateUsecase {
            pkg: required(self.pkg, "--pkg")?,
            method: required(self.method, "--method")?,
            with_request: self.with_request,
            with_response: self.with_response,
        })
    }
}

pub fn run(project: &Project, mut args: UsecaseArgs, json: bool) -> anyhow::Result<()> {
    if interactive(args.is_empty()) {
        args = args.prompt(&mut Prompter::stdio())?;
    }
    let req = args.into_request()?;
    let report = create_usecase(project, &req)
        .with_context(|| format!("failed to create use case {}.{}", req.pkg, req.method))?;
    print_report(&report, json)
}
