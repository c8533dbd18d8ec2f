//! Canonical Go source for every artifact the orchestrator creates.
//!
//! All functions are pure: identical inputs give byte-identical text. Files
//! are rendered as skeletons and grown through the patch engine, so a freshly
//! created file and a patched one converge on the same content.

use crate::naming::{humanize, humanize_snake, to_pascal};
use crate::route::{normalize_path_params, router_path};
use crate::types::{CapabilityTriple, HttpVerb, Layer, Operation, Visibility};

pub const ROUTES_MARKER: &str = "// hexforge:routes";

pub const CONTEXT_IMPORT: &str = "\"context\"";
pub const PGX_IMPORT: &str = "\"github.com/jackc/pgx/v5\"";
pub const TRACER_IMPORT: &str = "\"github.com/AndreeJait/go-utility/tracer\"";
pub const RESPONSE_IMPORT: &str = "\"github.com/AndreeJait/go-utility/response\"";
pub const ECHO_IMPORT: &str = "\"github.com/labstack/echo/v4\"";

/// Quote an import path for an import spec.
pub fn import_spec(path: &str) -> String {
    format!("\"{path}\"")
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Rendered shape of one operation on one layer.
#[derive(Debug, Clone)]
pub struct Signature<'a> {
    pub layer: Layer,
    pub method: &'a str,
    pub triple: CapabilityTriple,
    /// Package qualifier for the data shapes when rendered outside their package.
    pub qualifier: Option<&'a str>,
}

impl<'a> Signature<'a> {
    pub fn new(layer: Layer, op: &'a Operation) -> Self {
        Self {
            layer,
            method: &op.method,
            triple: op.triple,
            qualifier: None,
        }
    }

    pub fn qualified(mut self, pkg: &'a str) -> Self {
        self.qualifier = Some(pkg);
        self
    }

    fn shape(&self, suffix: &str) -> String {
        match self.qualifier {
            Some(pkg) => format!("{pkg}.{}{suffix}", self.method),
            None => format!("{}{suffix}", self.method),
        }
    }

    pub fn request_type(&self) -> String {
        self.shape(self.layer.request_suffix())
    }

    pub fn response_type(&self) -> String {
        self.shape("Response")
    }

    pub fn params(&self) -> String {
        let mut params = String::from("ctx context.Context");
        if self.triple.has_request {
            let name = match self.layer {
                Layer::Repository => "param",
                _ => "req",
            };
            params.push_str(&format!(", {name} {}", self.request_type()));
        }
        if self.triple.has_transactional_context {
            params.push_str(", tx pgx.Tx");
        }
        params
    }

    pub fn results(&self) -> String {
        if self.triple.has_response {
            format!("({}, error)", self.response_type())
        } else {
            "error".to_string()
        }
    }

    /// Interface member: `M(ctx context.Context, ...) error`.
    pub fn member(&self) -> String {
        format!("{}({}) {}", self.method, self.params(), self.results())
    }

    /// Containment test for the interface member.
    pub fn member_needle(&self) -> String {
        format!("{}(", self.method)
    }

    pub fn imports(&self) -> Vec<&'static str> {
        let mut imports = vec![CONTEXT_IMPORT];
        if self.triple.has_transactional_context {
            imports.push(PGX_IMPORT);
        }
        imports
    }

    /// Header prefix of the implementing method.
    pub fn method_needle(&self) -> String {
        let (var, ty) = self.layer.receiver();
        format!("func ({var} *{ty}) {}(", self.method)
    }
}

// ---------------------------------------------------------------------------
// File skeletons
// ---------------------------------------------------------------------------

pub fn usecase_port(pkg: &str) -> String {
    format!("package {pkg}\n\ntype UseCase interface {{\n}}\n")
}

pub fn usecase_impl(pkg: &str, module: &str) -> String {
    format!(
        r#"package {pkg}

import (
	"github.com/AndreeJait/go-utility/loggerw"

	"{module}/internal/infrastructure/config"
	"{module}/internal/infrastructure/db"
)

type useCase struct {{
	cfg       *config.Config
	log       loggerw.Logger
	txManager *db.TxManager
}}

func NewUseCase(cfg *config.Config, log loggerw.Logger, txManager *db.TxManager) UseCase {{
	return &useCase{{cfg: cfg, log: log, txManager: txManager}}
}}
"#
    )
}

pub fn outbound_port(pkg: &str) -> String {
    format!("package {pkg}\n\ntype {} interface {{\n}}\n", to_pascal(pkg))
}

pub fn outbound_impl(pkg: &str, module: &str) -> String {
    let iface = to_pascal(pkg);
    format!(
        r#"package {pkg}

import (
	"github.com/AndreeJait/go-utility/loggerw"

	"{module}/internal/infrastructure/config"
)

type impl struct {{
	log loggerw.Logger
	cfg *config.Config
}}

func New{iface}(log loggerw.Logger, cfg *config.Config) {iface} {{
	return &impl{{log: log, cfg: cfg}}
}}
"#
    )
}

pub fn repository_impl(pkg: &str, module: &str) -> String {
    let name = to_pascal(pkg);
    format!(
        r#"package {pkg}

import (
	"github.com/jackc/pgx/v5/pgxpool"

	"{module}/internal/adapters/outbound/db/postgres/sqlc"
)

type Repository struct {{
	q *sqlc.Queries
}}

func New{name}Repository(pool *pgxpool.Pool) *Repository {{
	return &Repository{{q: sqlc.New(pool)}}
}}
"#
    )
}

pub fn dto_file(pkg: &str) -> String {
    format!("package {pkg}\n")
}

pub fn handler_skeleton(pkg: &str, module: &str) -> String {
    let name = to_pascal(pkg);
    format!(
        r#"package {pkg}

import (
	"github.com/labstack/echo/v4"

	http "{module}/internal/adapters/inbound/http"
	"{module}/internal/adapters/inbound/http/common/middleware"
	"{module}/internal/infrastructure/config"
	"{module}/internal/usecase"
)

type handler struct {{
	route *echo.Group
	uc    *usecase.UseCase
	cfg   *config.Config
}}

func New{name}Handler(cfg *config.Config, route *echo.Group, uc *usecase.UseCase) http.Handler {{
	return &handler{{cfg: cfg, route: route, uc: uc}}
}}

// Handle registers routes for this module.
func (h *handler) Handle() {{
	groupPublic := h.route.Group("/{pkg}")
	groupInternal := h.route.Group("/internal/{pkg}")
	groupPrivate := h.route.Group("/{pkg}")

	groupInternal.Use(middleware.BasicAuthLogged(h.cfg))
	groupPrivate.Use(middleware.MustLogged(h.cfg))
	_ = groupPublic

	{ROUTES_MARKER}
}}
"#
    )
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// Empty data-shape struct.
pub fn shape_struct(name: &str) -> String {
    format!("type {name} struct {{\n}}\n")
}

/// Needle for a top-level type declaration.
pub fn type_needle(name: &str) -> String {
    format!("type {name} struct")
}

/// Data shapes a signature needs in its own package, request first.
pub fn shapes(sig: &Signature<'_>) -> Vec<String> {
    let mut names = Vec::new();
    if sig.triple.has_request {
        names.push(sig.request_type());
    }
    if sig.triple.has_response {
        names.push(sig.response_type());
    }
    names
}

/// Implementing method with a tracing span and a placeholder body.
pub fn impl_method(pkg: &str, sig: &Signature<'_>) -> String {
    let (var, ty) = sig.layer.receiver();
    let method = sig.method;
    let mut body = String::new();
    if sig.layer == Layer::Repository && sig.triple.has_transactional_context {
        body.push_str("\tq := r.q\n\tif tx != nil {\n\t\tq = sqlc.New(tx)\n\t}\n\t_ = q\n\n");
    }
    format!(
        "func ({var} *{ty}) {method}({params}) {results} {{\n\
         \tspan, ctx := tracer.StartSpan(ctx, tracer.GetFuncName({var}.{method}))\n\
         \tdefer span.End()\n\
         \n\
         {body}\
         \tpanic(\"{pkg}.{method}: not implemented\")\n\
         }}\n",
        params = sig.params(),
        results = sig.results(),
    )
}

/// Complete interface declaration.
pub fn interface_block(name: &str, members: &[String]) -> String {
    let mut out = format!("type {name} interface {{\n");
    for m in members {
        out.push_str(&format!("\t{m}\n"));
    }
    out.push_str("}\n");
    out
}

/// Path-parameter field retrofitted into a request shape.
///
/// Words split only on non-alphanumerics, so `:userId` yields `Userid`.
/// The spelling must stay stable: the field name is also the needle.
pub fn path_param_field(param: &str) -> (String, String) {
    let field = to_pascal(param);
    (
        format!("{field} string `param:\"{param}\"`"),
        format!("{field} "),
    )
}

// ---------------------------------------------------------------------------
// Handler methods
// ---------------------------------------------------------------------------

/// Everything needed to render one exposed endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    pub handler_pkg: &'a str,
    pub method: &'a str,
    pub uc_pkg: &'a str,
    pub uc_method: &'a str,
    pub triple: CapabilityTriple,
    pub visibility: Visibility,
    pub verb: HttpVerb,
    /// Route as registered with the router, `:param` style allowed.
    pub path: &'a str,
    pub tag: &'a str,
}

impl Endpoint<'_> {
    pub fn method_needle(&self) -> String {
        format!("func (h *handler) {}(", self.method)
    }

    pub fn imports(&self, module: &str) -> Vec<String> {
        let mut imports = Vec::new();
        if self.triple.has_request || self.triple.has_response {
            imports.push(import_spec(&format!("{module}/internal/usecase/{}", self.uc_pkg)));
        }
        imports.push(RESPONSE_IMPORT.to_string());
        imports.push(TRACER_IMPORT.to_string());
        imports.push(ECHO_IMPORT.to_string());
        imports
    }
}

/// Handler method with swag annotations, request binding and the forwarding call.
pub fn handler_method(ep: &Endpoint<'_>) -> String {
    let human = humanize(ep.uc_method);
    let success = format!("success {}", human.to_lowercase());
    let (doc_path, params) = normalize_path_params(ep.path);
    let request = format!("{}.{}Request", ep.uc_pkg, ep.uc_method);
    let response = format!("{}.{}Response", ep.uc_pkg, ep.uc_method);

    let mut doc = vec![
        format!("// {} godoc", ep.method),
        format!("// @Summary      {human}"),
        format!("// @Description  {human}"),
        format!("// @Tags         {}", ep.tag),
        "// @Accept       json".to_string(),
        "// @Produce      json".to_string(),
    ];
    if let Some(scheme) = ep.visibility.security() {
        doc.push(format!("// @Security     {scheme}"));
    }
    for p in &params {
        doc.push(format!(
            "// @Param        {p} path string true \"{}\"",
            humanize_snake(p)
        ));
    }
    if ep.triple.has_request {
        let location = if ep.verb == HttpVerb::Get { "query" } else { "body" };
        doc.push(format!(
            "// @Param        request {location} {request} true \"{}Request\"",
            ep.uc_method
        ));
    }
    let data = if ep.triple.has_response {
        format!("{{data={response}}}")
    } else {
        String::new()
    };
    doc.push(format!(
        "// @Success      200 {{object}} response.Response{data} \"{success}\""
    ));
    doc.push("// @Failure      400 {object} response.ErrorResponse \"validation/bind error\"".to_string());
    doc.push("// @Failure      500 {object} response.ErrorResponse \"internal error\"".to_string());
    doc.push(format!(
        "// @Router       {} [{}]",
        router_path(ep.handler_pkg, ep.visibility, &doc_path),
        ep.verb.as_str().to_lowercase()
    ));

    let mut body = vec![
        "\tctx := c.Request().Context()".to_string(),
        format!("\tspan, ctx := tracer.StartSpan(ctx, tracer.GetFuncName(h.{}))", ep.method),
        "\tdefer span.End()".to_string(),
        String::new(),
    ];
    let mut args = "ctx".to_string();
    if ep.triple.has_request {
        body.push(format!("\tparam := {request}{{}}"));
        body.push("\tif err := c.Bind(&param); err != nil {".to_string());
        body.push("\t\treturn err".to_string());
        body.push("\t}".to_string());
        body.push(String::new());
        args.push_str(", param");
    }
    let call = format!("h.uc.{}Uc.{}({args})", to_pascal(ep.uc_pkg), ep.uc_method);
    let payload = if ep.triple.has_response {
        body.push(format!("\tresp, err := {call}"));
        "resp"
    } else {
        body.push(format!("\terr := {call}"));
        "nil"
    };
    body.push("\tif err != nil {".to_string());
    body.push("\t\treturn err".to_string());
    body.push("\t}".to_string());
    body.push(format!("\treturn response.SuccessOK(c, {payload}, \"{success}\")"));

    format!(
        "{}\nfunc (h *handler) {}(c echo.Context) error {{\n{}\n}}\n",
        doc.join("\n"),
        ep.method,
        body.join("\n")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
