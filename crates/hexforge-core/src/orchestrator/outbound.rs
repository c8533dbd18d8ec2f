use super::{ensure_impl_method, ensure_port_member, ensure_shapes, step};
use crate::error::Result;
use crate::naming::to_pascal;
use crate::paths::{self, validate_package};
use crate::project::Project;
use crate::report::Report;
use crate::templates::{self, Signature};
use crate::types::{CapabilityTriple, Layer, Operation};

#[derive(Debug, Clone, Default)]
pub struct CreateOutbound {
    pub pkg: String,
    /// Without a method only the port and implementation skeletons are ensured.
    pub method: Option<String>,
    pub with_request: bool,
    pub with_response: bool,
}

pub fn create_outbound(project: &Project, req: &CreateOutbound) -> Result<Report> {
    validate_package(&req.pkg)?;
    let op = match &req.method {
        Some(method) => Some(Operation::new(
            &req.pkg,
            method,
            CapabilityTriple::new(req.with_request, req.with_response, false),
        )?),
        None => None,
    };

    let pkg = req.pkg.as_str();
    let dir = paths::outbound_dir(pkg);
    let port = dir.join(paths::PORT_FILE);
    let imp = dir.join(paths::OUTBOUND_IMPL_FILE);
    let mut report = Report::new();

    step("outbound skeleton", || {
        project.upsert(&mut report, &port, || templates::outbound_port(pkg), |_| Ok(()))?;
        project.upsert(
            &mut report,
            &imp,
            || templates::outbound_impl(pkg, &project.module),
            |_| Ok(()),
        )
    })?;

    let Some(op) = op else {
        tracing::info!(pkg, "outbound adapter skeleton ready");
        return Ok(report);
    };
    let sig = Signature::new(Layer::Outbound, &op);
    step("outbound port", || {
        ensure_port_member(
            project,
            &mut report,
            &port,
            &to_pascal(pkg),
            || templates::outbound_port(pkg),
            &sig,
        )
    })?;
    step("outbound data shapes", || {
        ensure_shapes(project, &mut report, &dir.join(paths::DTO_FILE), pkg, &sig)
    })?;
    step("outbound implementation", || {
        ensure_impl_method(
            project,
            &mut report,
            &imp,
            || templates::outbound_impl(pkg, &project.module),
            pkg,
            &sig,
        )
    })?;
    tracing::info!(pkg, method = %op.method, "outbound adapter ready");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatMode;
    use crate::error::ForgeError;
    use crate::orchestrator::tests::{fixture, read, write};

    #[test]
    fn skeleton_only_without_method() {
        let (dir, project) = fixture(FormatMode::None);
        let req = CreateOutbound {
            pkg: "payment".into(),
            ..CreateOutbound::default()
        };
        create_outbound(&project, &req).unwrap();
        assert_eq!(
            read(&dir, "internal/adapters/outbound/payment/port.go"),
            "package payment\n\ntype Payment interface {\n}\n"
        );
        assert!(read(&dir, "internal/adapters/outbound/payment/impl.go")
            .contains("func NewPayment(log loggerw.Logger, cfg *config.Config) Payment {"));
        assert!(!dir.path().join("internal/adapters/outbound/payment/dto.go").exists());

        let report = create_outbound(&project, &req).unwrap();
        assert!(!report.changed());
    }

    #[test]
    fn method_extends_port_shapes_and_implementation() {
        let (dir, project) = fixture(FormatMode::None);
        let req = CreateOutbound {
            pkg: "payment".into(),
            method: Some("Charge".into()),
            with_request: true,
            with_response: true,
        };
        create_outbound(&project, &req).unwrap();

        let port = read(&dir, "internal/adapters/outbound/payment/port.go");
        assert!(port.contains(
            "type Payment interface {\n\tCharge(ctx context.Context, req ChargeRequest) (ChargeResponse, error)\n}"
        ));
        let imp = read(&dir, "internal/adapters/outbound/payment/impl.go");
        assert!(imp.contains("func (i *impl) Charge(ctx context.Context, req ChargeRequest) (ChargeResponse, error) {"));
        assert!(imp.contains("tracer.GetFuncName(i.Charge)"));
        let dto = read(&dir, "internal/adapters/outbound/payment/dto.go");
        assert!(dto.contains("type ChargeRequest struct {\n}"));
        assert!(dto.contains("type ChargeResponse struct {\n}"));
    }

    #[test]
    fn hand_written_port_keeps_its_members() {
        let (dir, project) = fixture(FormatMode::None);
        let port = "package payment\n\n// Payment talks to the gateway.\ntype Payment interface {\n\tRefund(ctx context.Context) error\n}\n";
        write(&dir, "internal/adapters/outbound/payment/port.go", port);
        let req = CreateOutbound {
            pkg: "payment".into(),
            method: Some("Charge".into()),
            ..CreateOutbound::default()
        };
        create_outbound(&project, &req).unwrap();
        let text = read(&dir, "internal/adapters/outbound/payment/port.go");
        assert!(text.contains("// Payment talks to the gateway.\n"));
        assert!(text.contains("\tRefund(ctx context.Context) error\n\tCharge(ctx context.Context) error\n}"));
    }

    #[test]
    fn invalid_method_is_rejected() {
        let (dir, project) = fixture(FormatMode::None);
        let req = CreateOutbound {
            pkg: "payment".into(),
            method: Some("charge".into()),
            ..CreateOutbound::default()
        };
        assert!(matches!(
            create_outbound(&project, &req),
            Err(ForgeError::InvalidMethod(_))
        ));
        assert!(!dir.path().join("internal/adapters/outbound/payment").exists());
    }
}
