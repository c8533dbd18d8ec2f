//! Wiring registries: hand-maintained Go files listing every package. They
//! are never synthesized; a missing registry file or anchor is an error.

use crate::error::Result;
use crate::imports::ensure_import;
use crate::naming::to_pascal;
use crate::patch::{ensure_block_member, BlockPatch, Layout, Outcome};
use crate::paths;
use crate::project::Project;
use crate::report::Report;
use std::path::Path;

/// One package's entry in one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringEntry {
    pub file: &'static str,
    pub anchor: String,
    pub close: char,
    pub layout: Layout,
    pub member: String,
    pub needle: String,
    /// Import spec the member needs, added together with it.
    pub import: Option<String>,
}

impl WiringEntry {
    fn field(file: &'static str, anchor: &str, member: String, needle: String, import: String) -> Self {
        Self {
            file,
            anchor: anchor.to_string(),
            close: '}',
            layout: Layout::Lines,
            member,
            needle,
            import: Some(import),
        }
    }

    pub fn apply(&self, project: &Project, report: &mut Report) -> Result<()> {
        let rel = Path::new(self.file);
        project.edit(report, rel, |src| {
            let patch = match self.layout {
                Layout::Lines => BlockPatch::lines(&self.anchor, self.member.as_str()),
                Layout::Inline => BlockPatch::inline(&self.anchor, self.close, self.member.as_str()),
            }
            .needle(self.needle.as_str());
            if ensure_block_member(src, &patch, rel)? == Outcome::Inserted {
                if let Some(import) = &self.import {
                    *src = ensure_import(src, import);
                }
            }
            Ok(())
        })
    }
}

/// `internal/usecase/di.go` field and the infrastructure constructor call.
pub fn usecase_entries(project: &Project, pkg: &str) -> [WiringEntry; 2] {
    let name = to_pascal(pkg);
    let import = project.import_of(&paths::usecase_dir(pkg));
    [
        WiringEntry::field(
            paths::USECASE_REGISTRY,
            "type UseCase struct {",
            format!("{name}Uc {pkg}.UseCase"),
            format!("{name}Uc "),
            import.clone(),
        ),
        WiringEntry::field(
            paths::INFRA_USECASE_INIT,
            "&usecase.UseCase{",
            format!("{name}Uc: {pkg}.NewUseCase(s.cfg, s.log, s.txManager),"),
            format!("{name}Uc:"),
            import,
        ),
    ]
}

pub fn handler_entry(project: &Project, pkg: &str) -> WiringEntry {
    let ctor = format!("{pkg}.New{}Handler(", to_pascal(pkg));
    WiringEntry::field(
        paths::INFRA_HANDLER_INIT,
        "var handlers = []http.Handler{",
        format!("{ctor}s.cfg, groupV1, s.uc),"),
        ctor,
        project.import_of(&paths::handler_dir(pkg)),
    )
}

/// `internal/adapters/outbound/db/di.go` field and the infrastructure constructor call.
pub fn repository_entries(project: &Project, pkg: &str) -> [WiringEntry; 2] {
    let name = to_pascal(pkg);
    let import = project.import_of(&paths::repository_dir(pkg));
    [
        WiringEntry::field(
            paths::REPOSITORY_REGISTRY,
            "type Repository struct {",
            format!("{name}Repo *{pkg}.Repository"),
            format!("{name}Repo "),
            import.clone(),
        ),
        WiringEntry::field(
            paths::INFRA_REPOSITORY_INIT,
            "&db.Repository{",
            format!("{name}Repo: {pkg}.New{name}Repository(s.pool),"),
            format!("{name}Repo:"),
            import,
        ),
    ]
}

/// Extra argument in a use case's constructor call for an attached repository.
pub fn usecase_dependency_arg(uc_pkg: &str, repo_pkg: &str) -> WiringEntry {
    let arg = format!("s.repo.{}Repo", to_pascal(repo_pkg));
    WiringEntry {
        file: paths::INFRA_USECASE_INIT,
        anchor: format!("{uc_pkg}.NewUseCase("),
        close: ')',
        layout: Layout::Inline,
        needle: arg.clone(),
        member: arg,
        import: None,
    }
}
