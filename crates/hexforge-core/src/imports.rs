//! Import declaration registrar.
//!
//! Guarantees a Go import spec is declared in a file, whatever shape the
//! file's import header currently has. Never fails: the worst case is a new
//! block right after the `package` clause, which `gofmt` reflows.

use regex::Regex;
use std::sync::OnceLock;

static BARE_IMPORT_RE: OnceLock<Regex> = OnceLock::new();

fn bare_import_re() -> &'static Regex {
    BARE_IMPORT_RE.get_or_init(|| {
        Regex::new(r#"(?m)^import[ \t]+((?:[A-Za-z_.][A-Za-z0-9_]*[ \t]+)?"[^"\n]+")[ \t]*$"#)
            .unwrap()
    })
}

/// Ensure `line` (e.g. `"context"` or `pg "github.com/jackc/pgx/v5"`) is imported.
pub fn ensure_import(src: &str, line: &str) -> String {
    if is_declared(src, line) {
        return src.to_string();
    }

    if let Some(pos) = src.find("import (") {
        let open_end = pos + "import (".len();
        return format!("{}\n\t{line}{}", &src[..open_end], &src[open_end..]);
    }

    let bare: Vec<_> = bare_import_re().captures_iter(src).collect();
    if let [only] = bare.as_slice() {
        let whole = only.get(0).map(|m| m.range()).unwrap_or(0..0);
        let spec = only.get(1).map(|m| m.as_str()).unwrap_or_default();
        return format!(
            "{}import (\n\t{line}\n\t{spec}\n){}",
            &src[..whole.start],
            &src[whole.end..]
        );
    }

    let block = format!("import (\n\t{line}\n)\n");
    match src.find('\n') {
        Some(nl) => {
            let (head, rest) = src.split_at(nl + 1);
            let sep = if rest.is_empty() || rest.starts_with('\n') {
                ""
            } else {
                "\n"
            };
            format!("{head}\n{block}{sep}{rest}")
        }
        None if src.is_empty() => block,
        None => format!("{src}\n\n{block}"),
    }
}

/// Exact-line check, so `"context"` is not mistaken for `"x/net/context"`.
fn is_declared(src: &str, line: &str) -> bool {
    src.lines().any(|l| {
        let t = l.trim();
        t == line || t.strip_prefix("import").map(str::trim) == Some(line)
    })
}
