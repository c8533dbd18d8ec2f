use super::required;
use crate::output::print_report;
use crate::prompt::{interactive, Prompter};
use anyhow::Context;
use clap::Args;
use hexforge_core::orchestrator::{create_repository, CreateRepository};
use hexforge_core::project::Project;
use hexforge_core::types::RepositoryBackend;
use std::io::{BufRead, Write};

#[derive(Args, Debug, Default)]
pub struct RepositoryArgs {
    /// Repository package, e.g. `customer`
    #[arg(long)]
    pub pkg: Option<String>,
    /// Exported operation name, e.g. `GetCustomerByID`
    #[arg(long)]
    pub method: Option<String>,
    /// Storage backend (only `postgres`)
    #[arg(long = "type")]
    pub backend: Option<String>,
    /// The operation takes a `<Method>Param`
    #[arg(long)]
    pub with_request: bool,
    #[arg(long)]
    pub with_response: bool,
    /// The operation accepts an optional `pgx.Tx`
    #[arg(long)]
    pub with_tx: bool,
    /// Also attach the operation to this use case
    #[arg(long)]
    pub add_to: Option<String>,
}

impl RepositoryArgs {
    fn is_empty(&self) -> bool {
        self.pkg.is_none()
            && self.method.is_none()
            && self.backend.is_none()
            && self.add_to.is_none()
            && !self.with_request
            && !self.with_response
            && !self.with_tx
    }

    fn prompt(mut self, p: &mut Prompter<impl BufRead, impl Write>) -> anyhow::Result<Self> {
        self.pkg = Some(p.string("Repository package", self.pkg.as_deref())?);
        self.method = Some(p.string("Method", self.method.as_deref())?);
        self.backend = Some(p.string("Type", Some(self.backend.as_deref().unwrap_or("postgres")))?);
        self.with_request = p.boolean("With request", self.with_request)?;
        self.with_response = p.boolean("With response", self.with_response)?;
        self.with_tx = p.boolean("With transaction", self.with_tx)?;
        self.add_to = p.optional("Attach to use case", self.add_to.as_deref())?;
        Ok(self)
    }

    fn into_request(self) -> anyhow::Result<CreateRepository> {
        let backend = match self.backend.as_deref() {
            Some(b) => b.parse::<RepositoryBackend>()?,
            None => RepositoryBackend::default(),
        };
        Ok(CreateRepository {
            pkg: required(self.pkg, "--pkg")?,
            method: required(self.method, "--method")?,
            backend,
            with_request: self.with_request,
            with_response: self.with_response,
            with_tx: self.with_tx,
            add_to: self.add_to,
        })
    }
}

pub fn run(project: &Project, mut args: RepositoryArgs, json: bool) -> anyhow::Result<()> {
    if interactive(args.is_empty()) {
        args = args.prompt(&mut Prompter::stdio())?;
    }
    let req = args.into_request()?;
    let report = create_repository(project, &req)
        .with_context(|| format!("failed to create repository {}.{}", req.pkg, req.method))?;
    print_report(&report, json)
}
