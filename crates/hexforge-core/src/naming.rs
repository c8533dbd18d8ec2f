//! Identifier conversions shared by templates and patches.

use regex::Regex;
use std::sync::OnceLock;

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static HUMP_RE: OnceLock<Regex> = OnceLock::new();

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[A-Za-z0-9]+").unwrap())
}

fn hump_re() -> &'static Regex {
    HUMP_RE.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap())
}

/// `cash_out`, `cash-out`, `cash.out` → `CashOut`.
///
/// Each word keeps only its first letter upper-cased, so `userID` becomes
/// `Userid`; feed it package-style names, not Go identifiers.
pub fn to_pascal(s: &str) -> String {
    word_re()
        .find_iter(s)
        .map(|m| {
            let word = m.as_str();
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = first.to_ascii_uppercase().to_string();
                    out.push_str(&chars.as_str().to_ascii_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// `cash_out` → `cashOut`.
pub fn to_camel(s: &str) -> String {
    lower_first(&to_pascal(s))
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `GetUserByID` → `Get User By ID`.
pub fn humanize(s: &str) -> String {
    hump_re().replace_all(s, "$1 $2").trim().to_string()
}

/// `transaction_code` → `Transaction Code`.
pub fn humanize_snake(s: &str) -> String {
    humanize(&to_pascal(s))
}
