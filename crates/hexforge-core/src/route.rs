//! HTTP endpoint paths: path-parameter extraction and router paths.

use crate::types::{HttpVerb, Visibility};
use regex::{Captures, Regex};
use std::sync::OnceLock;

static COLON_PARAM_RE: OnceLock<Regex> = OnceLock::new();
static BRACE_PARAM_RE: OnceLock<Regex> = OnceLock::new();

fn colon_param_re() -> &'static Regex {
    COLON_PARAM_RE.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+)").unwrap())
}

fn brace_param_re() -> &'static Regex {
    BRACE_PARAM_RE.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap())
}

/// `submit/cash` → `/submit/cash`. Empty stays empty.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Rewrite `:name` segments to `{name}` and list every parameter once, in
/// order of first appearance.
///
/// `/send/:code/{id}/:code` → (`/send/{code}/{id}/{code}`, [`code`, `id`]).
pub fn normalize_path_params(endpoint: &str) -> (String, Vec<String>) {
    let normalized = colon_param_re()
        .replace_all(endpoint, |c: &Captures<'_>| format!("{{{}}}", &c[1]))
        .into_owned();

    let mut params: Vec<String> = Vec::new();
    for cap in brace_param_re().captures_iter(&normalized) {
        let name = &cap[1];
        if !params.iter().any(|p| p == name) {
            params.push(name.to_string());
        }
    }
    (normalized, params)
}

/// Documented route: `/<pkg><endpoint>`, or `/internal/<pkg><endpoint>` for
/// internal endpoints.
pub fn router_path(pkg: &str, visibility: Visibility, endpoint: &str) -> String {
    match visibility {
        Visibility::Internal => format!("/internal/{pkg}{endpoint}"),
        Visibility::Public | Visibility::Private => format!("/{pkg}{endpoint}"),
    }
}

/// Route registration statement placed inside `Handle()`.
pub fn route_line(visibility: Visibility, verb: HttpVerb, endpoint: &str, method: &str) -> String {
    format!("{}.{}(\"{endpoint}\", h.{method})", visibility.group(), verb.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_params_become_braces() {
        let (path, params) = normalize_path_params("/send/transaction/:transaction_code");
        assert_eq!(path, "/send/transaction/{transaction_code}");
        assert_eq!(params, vec!["transaction_code"]);
    }

    #[test]
    fn mixed_styles_dedup_in_first_seen_order() {
        let (path, params) = normalize_path_params("/a/:foo/b/{bar}/c/:foo");
        assert_eq!(path, "/a/{foo}/b/{bar}/c/{foo}");
        assert_eq!(params, vec!["foo", "bar"]);
    }

    #[test]
    fn no_params() {
        let (path, params) = normalize_path_params("/submit/cash-to-cash");
        assert_eq!(path, "/submit/cash-to-cash");
        assert!(params.is_empty());
    }

    #[test]
    fn endpoint_gets_leading_slash() {
        assert_eq!(normalize_endpoint("submit"), "/submit");
        assert_eq!(normalize_endpoint("/submit"), "/submit");
        assert_eq!(normalize_endpoint(""), "");
    }

    #[test]
    fn router_paths_by_visibility() {
        assert_eq!(router_path("user", Visibility::Public, "/{id}"), "/user/{id}");
        assert_eq!(router_path("user", Visibility::Private, "/me"), "/user/me");
        assert_eq!(
            router_path("user", Visibility::Internal, "/sync"),
            "/internal/user/sync"
        );
    }

    #[test]
    fn route_statement() {
        assert_eq!(
            route_line(Visibility::Internal, HttpVerb::Get, "/:id", "getUser"),
            "groupInternal.GET(\"/:id\", h.getUser)"
        );
    }
}
