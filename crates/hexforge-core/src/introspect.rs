//! Signature introspection: recover the capability triple of an operation
//! that already exists in a Go file.

use crate::error::{ForgeError, Result};
use crate::io::read_required;
use crate::syntax::{find_declaration, parse_go, text};
use crate::types::CapabilityTriple;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Strict form: `Ok(None)` when no method `receiver.method` is declared.
pub fn introspect_source(src: &str, receiver: &str, method: &str) -> Result<Option<CapabilityTriple>> {
    let tree = parse_go(src).map_err(|message| ForgeError::Parse {
        path: PathBuf::from("<source>"),
        message,
    })?;
    let Some(decl) = find_declaration(&tree, src, Some(receiver), method) else {
        return Ok(None);
    };

    let mut triple = CapabilityTriple::default();
    if let Some(params) = decl.child_by_field_name("parameters") {
        for ty in declared_types(params, src) {
            if ty.ends_with(&format!("{method}Request")) || ty.ends_with(&format!("{method}Param")) {
                triple.has_request = true;
            }
            if ty.contains("pgx.Tx") {
                triple.has_transactional_context = true;
            }
        }
    }
    if let Some(result) = decl.child_by_field_name("result") {
        let response = format!("{method}Response");
        let types = if result.kind() == "parameter_list" {
            declared_types(result, src)
        } else {
            vec![strip_pointer(text(result, src))]
        };
        triple.has_response = types.iter().any(|t| t.ends_with(&response));
    }
    Ok(Some(triple))
}

/// Same as [`introspect_source`] for a file on disk.
pub fn introspect_file(path: &Path, receiver: &str, method: &str) -> Result<Option<CapabilityTriple>> {
    let src = read_required(path)?;
    introspect_source(&src, receiver, method).map_err(|e| match e {
        ForgeError::Parse { message, .. } => ForgeError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Soft form used for flag defaulting: every failure degrades to an
/// all-false triple and a warning.
pub fn introspect(path: &Path, receiver: &str, method: &str) -> CapabilityTriple {
    match introspect_file(path, receiver, method) {
        Ok(Some(triple)) => {
            tracing::debug!(file = %path.display(), method, %triple, "inferred capabilities");
            triple
        }
        Ok(None) => {
            tracing::warn!(file = %path.display(), method, "method not declared; assuming no capabilities");
            CapabilityTriple::default()
        }
        Err(e) => {
            tracing::warn!(file = %path.display(), method, error = %e, "cannot introspect; assuming no capabilities");
            CapabilityTriple::default()
        }
    }
}

fn strip_pointer(ty: &str) -> &str {
    ty.trim().trim_start_matches('*')
}

fn declared_types<'s>(list: Node<'_>, src: &'s str) -> Vec<&'s str> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|n| {
            matches!(
                n.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            )
        })
        .filter_map(|n| n.child_by_field_name("type"))
        .map(|t| strip_pointer(text(t, src)))
        .collect()
}
