use super::required;
use crate::output::print_report;
use crate::prompt::{interactive, Prompter};
use anyhow::Context;
use clap::Args;
use hexforge_core::naming::lower_first;
use hexforge_core::orchestrator::{create_handler, CreateHandler, HandlerRoute};
use hexforge_core::project::Project;
use hexforge_core::types::{HttpVerb, Visibility};
use std::io::{BufRead, Write};

#[derive(Args, Debug, Default)]
pub struct HandlerArgs {
    /// Handler package, e.g. `send`
    #[arg(long)]
    pub pkg: Option<String>,
    /// Use-case package to call (default: the handler package)
    #[arg(long)]
    pub uc_pkg: Option<String>,
    /// Use-case operation to call, e.g. `GetTransaction`
    #[arg(long)]
    pub uc_method: Option<String>,
    /// Handler method name (default: the use-case method, lower-cased first letter)
    #[arg(long)]
    pub method: Option<String>,
    /// Route path; `:name` and `{name}` parameters are accepted
    #[arg(long)]
    pub endpoint: Option<String>,
    /// public, internal or private
    #[arg(long)]
    pub endpoint_type: Option<String>,
    /// GET, POST, PUT or DELETE
    #[arg(long)]
    pub verb: Option<String>,
    /// Swagger tag (default: the handler package in PascalCase)
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long)]
    pub with_request: bool,
    #[arg(long)]
    pub with_response: bool,
}

impl HandlerArgs {
    fn has_route(&self) -> bool {
        self.uc_pkg.is_some()
            || self.uc_method.is_some()
            || self.method.is_some()
            || self.endpoint.is_some()
            || self.endpoint_type.is_some()
            || self.verb.is_some()
            || self.tag.is_some()
            || self.with_request
            || self.with_response
    }

    fn is_empty(&self) -> bool {
        self.pkg.is_none() && !self.has_route()
    }

    fn prompt(mut self, p: &mut Prompter<impl BufRead, impl Write>) -> anyhow::Result<Self> {
        let pkg = p.string("Handler package", self.pkg.as_deref())?;
        if p.boolean("Add a route", true)? {
            let uc_pkg = p.string("Use-case package", Some(self.uc_pkg.as_deref().unwrap_or(&pkg)))?;
            let uc_method = p.string("Use-case method", self.uc_method.as_deref())?;
            let method = self.method.clone().unwrap_or_else(|| lower_first(&uc_method));
            self.method = Some(p.string("Handler method", Some(&method))?);
            self.endpoint = Some(p.string("Endpoint", self.endpoint.as_deref())?);
            self.endpoint_type =
                Some(p.string("Endpoint type", Some(self.endpoint_type.as_deref().unwrap_or("public")))?);
            self.verb = Some(p.string("Verb", Some(self.verb.as_deref().unwrap_or("POST")))?);
            self.tag = p.optional("Swagger tag", self.tag.as_deref())?;
            self.with_request = p.boolean("With request", self.with_request)?;
            self.with_response = p.boolean("With response", self.with_response)?;
            self.uc_pkg = Some(uc_pkg);
            self.uc_method = Some(uc_method);
        }
        self.pkg = Some(pkg);
        Ok(self)
    }

    fn into_request(self) -> anyhow::Result<CreateHandler> {
        let route = if self.has_route() {
            Some(self.route()?)
        } else {
            None
        };
        Ok(CreateHandler {
            pkg: required(self.pkg, "--pkg")?,
            route,
        })
    }

    fn route(&self) -> anyhow::Result<HandlerRoute> {
        let uc_method = required(self.uc_method.clone(), "--uc-method")?;
        let uc_pkg = self
            .uc_pkg
            .clone()
            .or_else(|| self.pkg.clone())
            .unwrap_or_default();
        let visibility = match self.endpoint_type.as_deref() {
            Some(v) => v.parse::<Visibility>()?,
            None => Visibility::default(),
        };
        let verb = match self.verb.as_deref() {
            Some(v) => v.parse::<HttpVerb>()?,
            None => HttpVerb::default(),
        };
        Ok(HandlerRoute {
            uc_pkg,
            method: self.method.clone().unwrap_or_else(|| lower_first(&uc_method)),
            uc_method,
            endpoint: required(self.endpoint.clone(), "--endpoint")?,
            visibility,
            verb,
            tag: self.tag.clone(),
            with_request: self.with_request,
            with_response: self.with_response,
        })
    }
}

pub fn run(project: &Project, mut args: HandlerArgs, json: bool) -> anyhow::Result<()> {
    if interactive(args.is_empty()) {
        args = args.prompt(&mut Prompter::stdio())?;
    }
    let req = args.into_request()?;
    let report = create_handler(project, &req)
        .with_context(|| format!("failed to create handler '{}'", req.pkg))?;
    print_report(&report, json)
}
