//! Go syntax-tree helpers backed by tree-sitter-go.

use tree_sitter::{Node, Parser, Tree};

/// Parse Go source. A tree containing error nodes counts as a failure: the
/// callers need exact byte ranges, which recovered trees do not guarantee.
pub fn parse_go(src: &str) -> Result<Tree, String> {
    let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| format!("failed to load Go grammar: {e}"))?;
    let tree = parser
        .parse(src, None)
        .ok_or_else(|| "parser produced no tree".to_string())?;
    let root = tree.root_node();
    if root.has_error() {
        let line = first_error(root).map_or(0, |n| n.start_position().row + 1);
        return Err(format!("syntax error near line {line}"));
    }
    Ok(tree)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

pub fn text<'s>(node: Node<'_>, src: &'s str) -> &'s str {
    node.utf8_text(src.as_bytes()).unwrap_or_default()
}

/// Receiver type name of a method declaration, pointer and type arguments stripped.
pub fn receiver_type<'s>(method: Node<'_>, src: &'s str) -> Option<&'s str> {
    let receiver = method.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    let param = receiver
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    let ty = text(param.child_by_field_name("type")?, src);
    let ty = ty.trim_start_matches('*').trim();
    Some(ty.split('[').next().unwrap_or(ty))
}

/// Top-level function (`receiver == None`) or method declaration named `name`.
pub fn find_declaration<'t>(
    tree: &'t Tree,
    src: &str,
    receiver: Option<&str>,
    name: &str,
) -> Option<Node<'t>> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let found = root.named_children(&mut cursor).find(|decl| {
        let named = decl
            .child_by_field_name("name")
            .is_some_and(|n| text(n, src) == name);
        match (decl.kind(), receiver) {
            ("function_declaration", None) => named,
            ("method_declaration", Some(recv)) => named && receiver_type(*decl, src) == Some(recv),
            _ => false,
        }
    });
    found
}

/// Byte offsets of the opening `{` and closing `}` of a function body.
pub fn function_body(
    src: &str,
    receiver: Option<&str>,
    name: &str,
) -> Result<Option<(usize, usize)>, String> {
    let tree = parse_go(src)?;
    let Some(decl) = find_declaration(&tree, src, receiver, name) else {
        return Ok(None);
    };
    let Some(body) = decl.child_by_field_name("body") else {
        return Ok(None);
    };
    Ok(Some((body.start_byte(), body.end_byte() - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "package send

type handler struct{}

func helper() {
	if true {
	}
}

func (h *handler) Handle() {
	group := h.route.Group(\"/send\")
	if group != nil {
		_ = group
	}
	// hexforge:routes
}
";

    #[test]
    fn finds_method_body_past_nested_braces() {
        let (open, close) = function_body(SRC, Some("handler"), "Handle").unwrap().unwrap();
        assert_eq!(&SRC[open..=open], "{");
        assert_eq!(&SRC[close..=close], "}");
        assert!(SRC[open..close].contains("// hexforge:routes"));
        assert!(SRC[close + 1..].trim().is_empty());
    }

    #[test]
    fn finds_plain_function() {
        let (open, close) = function_body(SRC, None, "helper").unwrap().unwrap();
        assert!(SRC[open..=close].contains("if true"));
    }

    #[test]
    fn receiver_must_match() {
        assert!(function_body(SRC, Some("other"), "Handle").unwrap().is_none());
        assert!(function_body(SRC, None, "Handle").unwrap().is_none());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = parse_go("package send\n\nfunc (h *handler Handle() {\n").unwrap_err();
        assert!(err.contains("syntax error"), "{err}");
    }
}
