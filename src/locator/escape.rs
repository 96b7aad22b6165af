use std::sync::LazyLock;

use regex::Regex;

/// Identifiers that need no escaping at all
static PLAIN_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").unwrap());

/// Escape a value for use inside a double-quoted CSS string, e.g. `[name="…"]`.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\'' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Escape a value for use as a CSS identifier, e.g. after `#` or `.`.
///
/// Follows CSSOM identifier serialization: a leading digit (or a digit after
/// a leading hyphen) and control characters become hex escapes, any other
/// ASCII outside `[A-Za-z0-9_-]` is backslash-escaped.
pub fn css_ident(value: &str) -> String {
    if PLAIN_IDENT.is_match(value) {
        return value.to_string();
    }
    if value == "-" {
        return "\\-".to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let leading_digit =
            c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() || leading_digit => {
                out.push_str(&format!("\\{:x} ", c as u32))
            }
            c if !c.is_ascii() || c.is_ascii_alphanumeric() || c == '-' || c == '_' => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Quote a value as an XPath 1.0 string literal.
///
/// XPath literals have no escape syntax, so a value holding both quote kinds
/// is assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    if !value.contains('\'') {
        return format!("'{}'", value);
    }

    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{}\"", part))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}
