//! Structural patch engine.
//!
//! Locates a named block inside a Go file, checks whether a member is already
//! there, and inserts it exactly once. Nothing outside the block is touched.
//!
//! Text anchors end at the *first* terminator after the anchor. That is only
//! sound for flat blocks (method sets, field lists, single-level literals and
//! argument lists), which is what the generated code and the wiring tables
//! contain. A same-kind opener before the terminator is reported as
//! [`ForgeError::NestedBlock`] instead of inserting into the wrong block.
//! Function bodies, which nest freely, are located through the syntax tree.

use crate::error::{ForgeError, Result};
use crate::syntax;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    /// `start` must end with the opener matching `close`.
    Anchor { start: &'a str, close: char },
    FunctionBody {
        receiver: Option<&'a str>,
        name: &'a str,
    },
}

impl Locator<'_> {
    fn describe(&self) -> String {
        match self {
            Locator::Anchor { start, .. } => (*start).to_string(),
            Locator::FunctionBody {
                receiver: Some(recv),
                name,
            } => format!("func (*{recv}) {name}()"),
            Locator::FunctionBody {
                receiver: None,
                name,
            } => format!("func {name}()"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One member per line, one tab deeper than the closing line.
    Lines,
    /// Comma-separated list on the anchor's line.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhenMissing {
    /// Append this complete block to the file.
    Synthesize(String),
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Inserted,
    AlreadyPresent,
    Synthesized,
}

#[derive(Debug, Clone)]
pub struct BlockPatch<'a> {
    pub locator: Locator<'a>,
    pub layout: Layout,
    pub member: String,
    /// Containment test: the block body already holding this text means done.
    pub needle: String,
    pub marker: Option<&'a str>,
    pub when_missing: WhenMissing,
}

impl<'a> BlockPatch<'a> {
    /// Line-per-member block closed by `}`.
    pub fn lines(start: &'a str, member: impl Into<String>) -> Self {
        let member = member.into();
        Self {
            locator: Locator::Anchor { start, close: '}' },
            layout: Layout::Lines,
            needle: member.clone(),
            member,
            marker: None,
            when_missing: WhenMissing::Fail,
        }
    }

    /// Comma-separated list closed by `close`.
    pub fn inline(start: &'a str, close: char, member: impl Into<String>) -> Self {
        let member = member.into();
        Self {
            locator: Locator::Anchor { start, close },
            layout: Layout::Inline,
            needle: member.clone(),
            member,
            marker: None,
            when_missing: WhenMissing::Fail,
        }
    }

    pub fn function_body(
        receiver: Option<&'a str>,
        name: &'a str,
        member: impl Into<String>,
    ) -> Self {
        let member = member.into();
        Self {
            locator: Locator::FunctionBody { receiver, name },
            layout: Layout::Lines,
            needle: member.clone(),
            member,
            marker: None,
            when_missing: WhenMissing::Fail,
        }
    }

    pub fn needle(mut self, needle: impl Into<String>) -> Self {
        self.needle = needle.into();
        self
    }

    pub fn marker(mut self, marker: &'a str) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn or_synthesize(mut self, block: impl Into<String>) -> Self {
        self.when_missing = WhenMissing::Synthesize(block.into());
        self
    }
}

/// Ensure `patch.member` is inside the located block of `src`.
///
/// `file` only names the file in errors.
pub fn ensure_block_member(src: &mut String, patch: &BlockPatch<'_>, file: &Path) -> Result<Outcome> {
    let Some((open_end, close)) = locate(src, &patch.locator, file)? else {
        return match &patch.when_missing {
            WhenMissing::Synthesize(block) => {
                append_block(src, block);
                tracing::debug!(block = %patch.locator.describe(), file = %file.display(), "synthesized block");
                Ok(Outcome::Synthesized)
            }
            WhenMissing::Fail => Err(ForgeError::AnchorNotFound {
                anchor: patch.locator.describe(),
                path: file.to_path_buf(),
            }),
        };
    };

    if contains_token(&src[open_end..close], &patch.needle) {
        return Ok(Outcome::AlreadyPresent);
    }

    match patch.layout {
        Layout::Lines => insert_line(src, open_end, close, &patch.member, patch.marker),
        Layout::Inline => insert_inline(src, open_end, close, &patch.member),
    }
    tracing::debug!(block = %patch.locator.describe(), file = %file.display(), "inserted member");
    Ok(Outcome::Inserted)
}

/// Returns `(body_start, close)`: the byte after the opener and the terminator's offset.
fn locate(src: &str, locator: &Locator<'_>, file: &Path) -> Result<Option<(usize, usize)>> {
    match *locator {
        Locator::Anchor { start, close } => {
            let Some(pos) = find_token(src, start) else {
                return Ok(None);
            };
            let open_end = pos + start.len();
            match find_terminator(src, open_end, close) {
                Ok(at) => Ok(Some((open_end, at))),
                Err(Scan::Unclosed) => Err(ForgeError::UnclosedBlock {
                    anchor: start.to_string(),
                    path: file.to_path_buf(),
                }),
                Err(Scan::Nested) => Err(ForgeError::NestedBlock {
                    anchor: start.to_string(),
                    path: file.to_path_buf(),
                }),
            }
        }
        Locator::FunctionBody { receiver, name } => syntax::function_body(src, receiver, name)
            .map(|found| found.map(|(open, close)| (open + 1, close)))
            .map_err(|message| ForgeError::Parse {
                path: file.to_path_buf(),
                message,
            }),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Scan {
    Unclosed,
    Nested,
}

fn opener_of(close: char) -> Option<u8> {
    match close {
        '}' => Some(b'{'),
        ')' => Some(b'('),
        ']' => Some(b'['),
        _ => None,
    }
}

/// First `close` at or after `from`, skipping strings, runes and comments.
fn find_terminator(src: &str, from: usize, close: char) -> std::result::Result<usize, Scan> {
    let bytes = src.as_bytes();
    let close_byte = u8::try_from(close).map_err(|_| Scan::Unclosed)?;
    let opener = opener_of(close);
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_quoted(bytes, i),
            b'`' => {
                i = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == b'`')
                    .map_or(bytes.len(), |p| i + 1 + p + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |p| i + p);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = src[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            }
            b if b == close_byte => return Ok(i),
            b if Some(b) == opener => return Err(Scan::Nested),
            _ => i += 1,
        }
    }
    Err(Scan::Unclosed)
}

/// Index just past the closing quote of the literal starting at `start`.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn line_start(src: &str, at: usize) -> usize {
    src[..at].rfind('\n').map_or(0, |p| p + 1)
}

fn indent_lines(member: &str, indent: &str) -> String {
    member
        .lines()
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("{indent}{l}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn insert_line(src: &mut String, open_end: usize, close: usize, member: &str, marker: Option<&str>) {
    if let Some(marker) = marker {
        if let Some(rel) = src[open_end..close].find(marker) {
            let at = open_end + rel;
            let ls = line_start(src, at).max(open_end);
            let prefix = &src[ls..at];
            if prefix.trim().is_empty() {
                let text = format!("{}\n", indent_lines(member, prefix));
                src.insert_str(ls, &text);
                return;
            }
        }
    }

    let ls = line_start(src, close);
    let prefix = &src[ls..close];
    if ls >= open_end && prefix.trim().is_empty() {
        let indent = format!("{prefix}\t");
        let text = format!("{}\n", indent_lines(member, &indent));
        src.insert_str(ls, &text);
    } else {
        let base: String = src[ls..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let text = format!("\n{}\n{base}", indent_lines(member, &format!("{base}\t")));
        src.insert_str(close, &text);
    }
}

fn insert_inline(src: &mut String, open_end: usize, close: usize, member: &str) {
    let body = &src[open_end..close];
    if body.trim().is_empty() {
        src.insert_str(open_end, member);
        return;
    }
    let at = open_end + body.trim_end().len();
    if body.trim_end().ends_with(',') {
        src.insert_str(at, &format!(" {member},"));
    } else {
        src.insert_str(at, &format!(", {member}"));
    }
}

/// Substring test that refuses matches glued to a preceding identifier, so
/// `userRepo` is not found inside `superuserRepo`.
pub fn contains_token(haystack: &str, needle: &str) -> bool {
    find_token(haystack, needle).is_some()
}

/// First offset of `needle` not glued to a preceding identifier.
fn find_token(haystack: &str, needle: &str) -> Option<usize> {
    let ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !needle.starts_with(ident) {
        return haystack.find(needle);
    }
    haystack
        .match_indices(needle)
        .map(|(at, _)| at)
        .find(|&at| !haystack[..at].ends_with(ident))
}

/// Append a top-level declaration unless `needle` already occurs in the file.
pub fn ensure_declared(src: &mut String, needle: &str, block: &str) -> Outcome {
    if contains_token(src, needle) {
        return Outcome::AlreadyPresent;
    }
    append_block(src, block);
    Outcome::Inserted
}

fn append_block(src: &mut String, block: &str) {
    let keep = src.trim_end().len();
    src.truncate(keep);
    if !src.is_empty() {
        src.push_str("\n\n");
    }
    src.push_str(block.trim_end());
    src.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORT: &str = "package send

import \"context\"

type UseCase interface {
	Submit(ctx context.Context) error
}

// trailing comment stays put
";

    fn apply(src: &str, patch: &BlockPatch<'_>) -> (String, Outcome) {
        let mut s = src.to_string();
        let outcome = ensure_block_member(&mut s, patch, Path::new("port.go")).unwrap();
        (s, outcome)
    }

    #[test]
    fn inserts_before_close_with_indent() {
        let patch = BlockPatch::lines("type UseCase interface {", "Cancel(ctx context.Context) error")
            .needle("Cancel(");
        let (out, outcome) = apply(PORT, &patch);
        assert_eq!(outcome, Outcome::Inserted);
        assert!(out.contains(
            "\tSubmit(ctx context.Context) error\n\tCancel(ctx context.Context) error\n}\n"
        ));
        assert!(out.ends_with("// trailing comment stays put\n"));
    }

    #[test]
    fn second_application_is_byte_identical() {
        let patch = BlockPatch::lines("type UseCase interface {", "Cancel(ctx context.Context) error")
            .needle("Cancel(");
        let (once, _) = apply(PORT, &patch);
        let (twice, outcome) = apply(&once, &patch);
        assert_eq!(outcome, Outcome::AlreadyPresent);
        assert_eq!(once, twice);
    }

    #[test]
    fn containment_is_scoped_to_the_block() {
        let src = "package send\n\n// Cancel( mentioned outside\ntype UseCase interface {\n}\n";
        let patch = BlockPatch::lines("type UseCase interface {", "Cancel() error").needle("Cancel(");
        let (out, outcome) = apply(src, &patch);
        assert_eq!(outcome, Outcome::Inserted);
        assert!(out.contains("type UseCase interface {\n\tCancel() error\n}\n"));
    }

    #[test]
    fn empty_one_line_block_is_opened_up() {
        let src = "package email\n\ntype Email interface {}\n";
        let patch = BlockPatch::lines("type Email interface {", "Send() error");
        let (out, _) = apply(src, &patch);
        assert_eq!(out, "package email\n\ntype Email interface {\n\tSend() error\n}\n");
    }

    #[test]
    fn marker_is_preferred_insertion_point() {
        let src = "package send

func (h *handler) Handle() {
	groupPublic := h.route.Group(\"/send\")

	// hexforge:routes
}
";
        let patch = BlockPatch::function_body(Some("handler"), "Handle", "groupPublic.GET(\"/a\", h.a)")
            .marker("// hexforge:routes");
        let (once, _) = apply(src, &patch);
        assert!(once.contains("\tgroupPublic.GET(\"/a\", h.a)\n\t// hexforge:routes\n}"));

        let second = BlockPatch::function_body(Some("handler"), "Handle", "groupPublic.GET(\"/b\", h.b)")
            .marker("// hexforge:routes");
        let (twice, _) = apply(&once, &second);
        let a = twice.find("h.a)").unwrap();
        let b = twice.find("h.b)").unwrap();
        let m = twice.find("// hexforge:routes").unwrap();
        assert!(a < b && b < m, "insertion order must be stable:\n{twice}");
    }

    #[test]
    fn function_body_without_marker_inserts_before_close() {
        let src = "package send\n\nfunc (h *handler) Handle() {\n\tif true {\n\t}\n}\n";
        let patch = BlockPatch::function_body(Some("handler"), "Handle", "x()");
        let (out, _) = apply(src, &patch);
        assert_eq!(out, "package send\n\nfunc (h *handler) Handle() {\n\tif true {\n\t}\n\tx()\n}\n");
    }

    #[test]
    fn inline_lists() {
        let src = "func NewUseCase(cfg *config.Config) UseCase {\n\treturn &useCase{cfg: cfg}\n}\n";
        let p1 = BlockPatch::inline("func NewUseCase(", ')', "userRepo UserRepository");
        let p2 = BlockPatch::inline("return &useCase{", '}', "userRepo: userRepo").needle("userRepo:");
        let (out, _) = apply(src, &p1);
        let (out, _) = apply(&out, &p2);
        assert_eq!(
            out,
            "func NewUseCase(cfg *config.Config, userRepo UserRepository) UseCase {\n\treturn &useCase{cfg: cfg, userRepo: userRepo}\n}\n"
        );
        let (again, o) = apply(&out, &p1);
        assert_eq!(o, Outcome::AlreadyPresent);
        assert_eq!(again, out);
    }

    #[test]
    fn inline_empty_and_trailing_comma() {
        let (out, _) = apply("f := New()\n", &BlockPatch::inline("New(", ')', "a"));
        assert_eq!(out, "f := New(a)\n");
        let (out, _) = apply("f := New(\n\ta,\n)\n", &BlockPatch::inline("New(", ')', "b"));
        assert_eq!(out, "f := New(\n\ta, b,\n)\n");
    }

    #[test]
    fn missing_anchor_synthesizes_whole_block() {
        let src = "package send\n\nimport \"context\"\n";
        let patch = BlockPatch::lines("type UserRepository interface {", "Get() error")
            .or_synthesize("type UserRepository interface {\n\tGet() error\n}\n");
        let (out, outcome) = apply(src, &patch);
        assert_eq!(outcome, Outcome::Synthesized);
        assert_eq!(
            out,
            "package send\n\nimport \"context\"\n\ntype UserRepository interface {\n\tGet() error\n}\n"
        );
        let (again, outcome) = apply(&out, &patch);
        assert_eq!(outcome, Outcome::AlreadyPresent);
        assert_eq!(again, out);
    }

    #[test]
    fn missing_anchor_fails_with_name_and_file() {
        let mut s = "package di\n".to_string();
        let patch = BlockPatch::lines("var handlers = []http.Handler{", "x,");
        let err = ensure_block_member(&mut s, &patch, Path::new("internal/infrastructure/di/handler.go"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("var handlers = []http.Handler{"));
        assert!(msg.contains("internal/infrastructure/di/handler.go"));
        assert_eq!(s, "package di\n");
    }

    #[test]
    fn unclosed_block_is_corrupt() {
        let mut s = "type UseCase interface {\n\tA()\n".to_string();
        let patch = BlockPatch::lines("type UseCase interface {", "B()");
        let err = ensure_block_member(&mut s, &patch, Path::new("port.go")).unwrap_err();
        assert!(matches!(err, ForgeError::UnclosedBlock { .. }));
    }

    #[test]
    fn nested_opener_is_refused() {
        let mut s = "type useCase struct {\n\tcache map[string]interface{}\n}\n".to_string();
        let patch = BlockPatch::lines("type useCase struct {", "x int");
        let err = ensure_block_member(&mut s, &patch, Path::new("usecase.go")).unwrap_err();
        assert!(matches!(err, ForgeError::NestedBlock { .. }));
    }

    #[test]
    fn terminators_in_strings_and_comments_are_skipped() {
        let src = "type Req struct {\n\tA string `json:\"a}\"`\n\t// }\n\tB string /* } */\n\tC rune // '}'\n}\n";
        let patch = BlockPatch::lines("type Req struct {", "D string");
        let (out, _) = apply(src, &patch);
        assert!(out.ends_with("\tC rune // '}'\n\tD string\n}\n"), "{out}");
    }

    #[test]
    fn needles_match_whole_identifiers_only() {
        assert!(contains_token("\tuserRepo     UserRepository\n", "userRepo "));
        assert!(!contains_token("\tsuperuserRepo SuperuserRepository\n", "userRepo "));
        assert!(contains_token("cfg: cfg, userRepo: userRepo", "userRepo:"));
        assert!(contains_token("(\"/a\", h.a)", "(\"/a\""));
    }

    #[test]
    fn anchor_skips_longer_identifier_with_same_suffix() {
        let src = "\t\tSuperuserUc: superuser.NewUseCase(s.cfg),\n\t\tUserUc: user.NewUseCase(s.cfg),\n";
        let patch = BlockPatch::inline("user.NewUseCase(", ')', "s.repo.CustomerRepo");
        let (out, outcome) = apply(src, &patch);
        assert_eq!(outcome, Outcome::Inserted);
        assert!(out.contains("superuser.NewUseCase(s.cfg),"), "{out}");
        assert!(out.contains("user.NewUseCase(s.cfg, s.repo.CustomerRepo),"), "{out}");
    }

    #[test]
    fn declarations_are_appended_once() {
        let mut s = "package user\n".to_string();
        let block = "type GetParam struct {\n}\n";
        assert_eq!(ensure_declared(&mut s, "type GetParam struct", block), Outcome::Inserted);
        assert_eq!(
            ensure_declared(&mut s, "type GetParam struct", block),
            Outcome::AlreadyPresent
        );
        assert_eq!(s, "package user\n\ntype GetParam struct {\n}\n");
    }

    #[test]
    fn unparsable_file_is_hard_error_for_function_locator() {
        let mut s = "package send\nfunc (h *handler Handle() {\n".to_string();
        let patch = BlockPatch::function_body(Some("handler"), "Handle", "x()");
        let err = ensure_block_member(&mut s, &patch, Path::new("handler.go")).unwrap_err();
        assert!(matches!(err, ForgeError::Parse { .. }));
    }
}
