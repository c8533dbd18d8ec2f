use super::{repository, step, usecase, wiring};
use crate::error::{ForgeError, Result};
use crate::imports::ensure_import;
use crate::introspect::introspect;
use crate::naming::{to_camel, to_pascal};
use crate::patch::{ensure_block_member, BlockPatch, Outcome};
use crate::paths::{self, validate_method, validate_package};
use crate::project::Project;
use crate::report::Report;
use crate::templates::{self, Signature};
use crate::types::{CapabilityTriple, Layer, Operation, RepositoryBackend};

/// Attach a repository operation to a consumer use case. Unset flags are
/// inferred from the repository's existing implementation.
#[derive(Debug, Clone, Default)]
pub struct AttachRepository {
    pub repo_pkg: String,
    pub uc_pkg: String,
    pub method: String,
    pub with_request: Option<bool>,
    pub with_response: Option<bool>,
    pub with_tx: Option<bool>,
}

pub fn add_repo_to_usecase(project: &Project, req: &AttachRepository) -> Result<Report> {
    validate_package(&req.repo_pkg)?;
    validate_package(&req.uc_pkg)?;
    validate_method(&req.method)?;

    let consumer_dir = paths::usecase_dir(&req.uc_pkg);
    if !project.path(&consumer_dir).is_dir() {
        return Err(ForgeError::PackageNotFound {
            package: req.uc_pkg.clone(),
            path: consumer_dir,
        });
    }

    let explicit = [req.with_request, req.with_response, req.with_tx];
    let inferred = if explicit.iter().all(Option::is_some) {
        CapabilityTriple::default()
    } else {
        let file = paths::repository_dir(&req.repo_pkg).join(paths::REPOSITORY_IMPL_FILE);
        introspect(&project.path(&file), Layer::Repository.receiver().1, &req.method)
    };
    let triple = CapabilityTriple::resolve(req.with_request, req.with_response, req.with_tx, inferred);
    let op = Operation::new(&req.repo_pkg, &req.method, triple)?;

    let mut report = Report::new();
    repository::ensure_operation(project, &mut report, RepositoryBackend::Postgres, &op)?;
    wire_dependency(project, &mut report, &req.uc_pkg, &op)?;
    tracing::info!(
        repo = %op.package,
        consumer = %req.uc_pkg,
        method = %op.method,
        %triple,
        "repository attached"
    );
    Ok(report)
}

/// Declare, hold and inject the repository in `consumer`, then pass it from
/// the infrastructure registry.
pub(crate) fn wire_dependency(
    project: &Project,
    report: &mut Report,
    consumer: &str,
    op: &Operation,
) -> Result<()> {
    let repo = op.package.as_str();
    let iface = format!("{}Repository", to_pascal(repo));
    let field = format!("{}Repo", to_camel(repo));
    let sig = Signature::new(Layer::Repository, op).qualified(repo);
    let rel = paths::usecase_dir(consumer).join(paths::USECASE_IMPL_FILE);

    step("consumer dependency port", || {
        let anchor = format!("type {iface} interface {{");
        let member = sig.member();
        project.edit(report, &rel, |src| {
            let patch = BlockPatch::lines(&anchor, member.as_str())
                .needle(sig.member_needle())
                .or_synthesize(templates::interface_block(&iface, &[member.clone()]));
            if ensure_block_member(src, &patch, &rel)? != Outcome::AlreadyPresent {
                let mut imports: Vec<String> = sig.imports().iter().map(|i| i.to_string()).collect();
                if op.triple.has_request || op.triple.has_response {
                    imports.push(project.import_of(&paths::repository_dir(repo)));
                }
                for import in imports {
                    *src = ensure_import(src, &import);
                }
            }
            Ok(())
        })
    })?;

    step("consumer dependency injection", || {
        let declared = format!("{field} {iface}");
        let assigned = format!("{field}: {field}");
        let field_needle = format!("{field} ");
        let assign_needle = format!("{field}:");
        project.edit(report, &rel, |src| {
            let patches = [
                BlockPatch::lines("type useCase struct {", declared.as_str()).needle(field_needle.as_str()),
                BlockPatch::inline("func NewUseCase(", ')', declared.as_str()).needle(field_needle.as_str()),
                BlockPatch::inline("return &useCase{", '}', assigned.as_str()).needle(assign_needle.as_str()),
            ];
            for patch in &patches {
                ensure_block_member(src, patch, &rel)?;
            }
            Ok(())
        })
    })?;

    usecase::wire(project, report, consumer)?;
    step("wire consumer dependency", || {
        wiring::usecase_dependency_arg(consumer, repo).apply(project, report)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatMode;
    use crate::orchestrator::tests::{fixture, read, write};
    use crate::orchestrator::usecase::{create_usecase, CreateUsecase};
    use crate::report::FileAction;
    use std::path::Path;

    const CUSTOMER_REPOSITORY: &str = r#"package customer

import (
	"context"

	"github.com/jackc/pgx/v5/pgxpool"
)

type Repository struct {
	q *sqlc.Queries
}

func NewCustomerRepository(pool *pgxpool.Pool) *Repository {
	return &Repository{q: sqlc.New(pool)}
}

func (r *Repository) GetCustomerByID(ctx context.Context, param GetCustomerByIDParam) (GetCustomerByIDResponse, error) {
	return GetCustomerByIDResponse{}, nil
}
"#;

    fn send_consumer(dir: &tempfile::TempDir, project: &Project) {
        create_usecase(
            project,
            &CreateUsecase {
                pkg: "send".into(),
                method: "Submit".into(),
                with_request: true,
                ..CreateUsecase::default()
            },
        )
        .unwrap();
        write(
            dir,
            "internal/adapters/outbound/db/postgres/customer/repository.go",
            CUSTOMER_REPOSITORY,
        );
    }

    fn attach_customer() -> AttachRepository {
        AttachRepository {
            repo_pkg: "customer".into(),
            uc_pkg: "send".into(),
            method: "GetCustomerByID".into(),
            ..AttachRepository::default()
        }
    }

    #[test]
    fn infers_shape_and_wires_consumer() {
        let (dir, project) = fixture(FormatMode::None);
        send_consumer(&dir, &project);
        let report = add_repo_to_usecase(&project, &attach_customer()).unwrap();

        let uc = read(&dir, "internal/usecase/send/usecase.go");
        assert!(uc.contains(
            "type CustomerRepository interface {\n\tGetCustomerByID(ctx context.Context, param customer.GetCustomerByIDParam) (customer.GetCustomerByIDResponse, error)\n}"
        ));
        assert!(uc.contains("\ttxManager *db.TxManager\n\tcustomerRepo CustomerRepository\n}"));
        assert!(uc.contains(
            "func NewUseCase(cfg *config.Config, log loggerw.Logger, txManager *db.TxManager, customerRepo CustomerRepository) UseCase {"
        ));
        assert!(uc.contains(
            "return &useCase{cfg: cfg, log: log, txManager: txManager, customerRepo: customerRepo}"
        ));
        assert!(uc.contains("\"example.com/app/internal/adapters/outbound/db/postgres/customer\""));
        assert!(!uc.contains("pgx.Tx"));

        let infra = read(&dir, "internal/infrastructure/di/usecase.go");
        assert!(infra.contains("SendUc: send.NewUseCase(s.cfg, s.log, s.txManager, s.repo.CustomerRepo),"));

        // the existing repository method is kept as written
        let repo = read(&dir, "internal/adapters/outbound/db/postgres/customer/repository.go");
        assert_eq!(repo.matches("func (r *Repository) GetCustomerByID(").count(), 1);
        assert!(repo.contains("return GetCustomerByIDResponse{}, nil"));
        assert!(read(&dir, "internal/adapters/outbound/db/postgres/customer/dto.go")
            .contains("type GetCustomerByIDParam struct {\n}"));
        assert_eq!(
            report.action_for(Path::new("internal/usecase/send/usecase.go")),
            Some(FileAction::Updated)
        );
    }

    #[test]
    fn attaching_twice_wires_once() {
        let (dir, project) = fixture(FormatMode::None);
        send_consumer(&dir, &project);
        add_repo_to_usecase(&project, &attach_customer()).unwrap();
        let uc = read(&dir, "internal/usecase/send/usecase.go");

        let report = add_repo_to_usecase(&project, &attach_customer()).unwrap();
        assert!(!report.changed(), "{report:?}");
        assert_eq!(read(&dir, "internal/usecase/send/usecase.go"), uc);
        assert_eq!(uc.matches("customerRepo CustomerRepository").count(), 2);
        assert_eq!(uc.matches("customerRepo: customerRepo").count(), 1);
        let infra = read(&dir, "internal/infrastructure/di/usecase.go");
        assert_eq!(infra.matches("s.repo.CustomerRepo").count(), 1);
        assert_eq!(infra.matches("SendUc:").count(), 1);
        let registry = read(&dir, "internal/adapters/outbound/db/di.go");
        assert_eq!(registry.matches("CustomerRepo ").count(), 1);
    }

    #[test]
    fn explicit_flags_override_inference() {
        let (dir, project) = fixture(FormatMode::None);
        send_consumer(&dir, &project);
        let req = AttachRepository {
            with_response: Some(false),
            with_tx: Some(true),
            ..attach_customer()
        };
        add_repo_to_usecase(&project, &req).unwrap();
        let uc = read(&dir, "internal/usecase/send/usecase.go");
        assert!(uc.contains(
            "\tGetCustomerByID(ctx context.Context, param customer.GetCustomerByIDParam, tx pgx.Tx) error\n"
        ));
        assert!(uc.contains("\t\"github.com/jackc/pgx/v5\"\n"));
    }

    #[test]
    fn unknown_repository_method_defaults_to_bare_signature() {
        let (dir, project) = fixture(FormatMode::None);
        send_consumer(&dir, &project);
        let req = AttachRepository {
            method: "Count".into(),
            ..attach_customer()
        };
        add_repo_to_usecase(&project, &req).unwrap();
        let uc = read(&dir, "internal/usecase/send/usecase.go");
        assert!(uc.contains("\tCount(ctx context.Context) error\n"));
        let repo = read(&dir, "internal/adapters/outbound/db/postgres/customer/repository.go");
        assert!(repo.contains("func (r *Repository) Count(ctx context.Context) error {"));
    }

    #[test]
    fn missing_consumer_is_not_found() {
        let (dir, project) = fixture(FormatMode::None);
        let err = add_repo_to_usecase(&project, &attach_customer()).unwrap_err();
        assert!(matches!(err, ForgeError::PackageNotFound { ref package, .. } if package == "send"));
        assert!(!dir.path().join("internal/adapters/outbound/db/postgres/customer").exists());
    }
}
