use super::required;
use crate::output::print_report;
use crate::prompt::{interactive, Prompter};
use anyhow::Context;
use clap::Args;
use hexforge_core::orchestrator::{create_outbound, CreateOutbound};
use hexforge_core::project::Project;
use std::io::{BufRead, Write};

#[derive(Args, Debug, Default)]
pub struct OutboundArgs {
    /// Adapter package, e.g. `payment`
    #[arg(long)]
    pub pkg: Option<String>,
    /// Operation to add; omit for the skeleton only
    #[arg(long)]
    pub method: Option<String>,
    #[arg(long)]
    pub with_request: bool,
    #[arg(long)]
    pub with_response: bool,
}

impl OutboundArgs {
    fn is_empty(&self) -> bool {
        self.pkg.is_none() && self.method.is_none() && !self.with_request && !self.with_response
    }

    fn prompt(mut self, p: &mut Prompter<impl BufRead, impl Write>) -> anyhow::Result<Self> {
        self.pkg = Some(p.string("Adapter package", self.pkg.as_deref())?);
        self.method = p.optional("Method (empty for skeleton only)", self.method.as_deref())?;
        if self.method.is_some() {
            self.with_request = p.boolean("With request", self.with_request)?;
            self.with_response = p.boolean("With response", self.with_response)?;
        }
        Ok(self)
    }
}

pub fn run(project: &Project, mut args: OutboundArgs, json: bool) -> anyhow::Result<()> {
    if interactive(args.is_empty()) {
        args = args.prompt(&mut Prompter::stdio())?;
    }
    let req = CreateOutbound {
        pkg: required(args.pkg, "--pkg")?,
        method: args.method,
        with_request: args.with_request,
        with_response: args.with_response,
    };
    let report = create_outbound(project, &req)
        .with_context(|| format!("failed to create outbound adapter '{}'", req.pkg))?;
    print_report(&report, json)
}
