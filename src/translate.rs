//! Placeholder handling over raw SQL text.
//!
//! Builders emit SQLite-style `?N` placeholders; the PostgreSQL path rewrites
//! them to `$N` before dispatch. The same scanner also substitutes parameter
//! literals into the statement for the last-query diagnostic. String
//! literals, quoted identifiers, comments, and dollar-quoted blocks are left
//! untouched.

use std::borrow::Cow;

use crate::types::RowValues;

/// Target placeholder style for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

/// Translate numbered placeholders to the given style.
///
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    rewrite_placeholders(sql, |style, digits| {
        if style == target {
            None
        } else {
            let marker = match target {
                PlaceholderStyle::Postgres => '$',
                PlaceholderStyle::Sqlite => '?',
            };
            Some(format!("{marker}{digits}"))
        }
    })
}

/// Substitute parameter values into the statement text for display.
///
/// Placeholder `?N`/`$N` is replaced with the SQL literal of `params[N-1]`;
/// out-of-range indices are kept as-is. Diagnostic only: the result is never
/// sent to a database.
#[must_use]
pub fn substitute_params(sql: &str, params: &[RowValues]) -> String {
    rewrite_placeholders(sql, |_, digits| {
        digits
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .and_then(|n| params.get(n - 1))
            .map(render_literal)
    })
    .into_owned()
}

/// Render a parameter value as a SQL literal.
pub fn render_literal(value: &RowValues) -> String {
    match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => f.to_string(),
        RowValues::Text(s) => quote_literal(s),
        RowValues::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        RowValues::Timestamp(dt) => quote_literal(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        RowValues::Null => "NULL".to_string(),
        RowValues::JSON(jsval) => quote_literal(&jsval.to_string()),
        RowValues::Blob(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for b in bytes {
                out.push_str(&format!("{b:02x}"));
            }
            out.push('\'');
            out
        }
    }
}

fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Walk the SQL text, calling `repl` for every numbered placeholder found
/// outside literals and comments. `repl` returns the replacement text, or
/// `None` to keep the placeholder unchanged.
fn rewrite_placeholders<'a, F>(sql: &'a str, mut repl: F) -> Cow<'a, str>
where
    F: FnMut(PlaceholderStyle, &str) -> Option<String>,
{
    let mut out: Option<String> = None;
    // Start of the input span not yet copied into `out`. Untouched text is
    // copied as `&str` slices so multi-byte characters pass through intact;
    // placeholder boundaries always fall on ASCII bytes.
    let mut copied_upto = 0;
    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    } else if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        if let Some(replacement) = repl(PlaceholderStyle::Postgres, digits) {
                            let buf = out.get_or_insert_with(String::new);
                            buf.push_str(&sql[copied_upto..idx]);
                            buf.push_str(&replacement);
                            copied_upto = digits_end;
                        }
                        idx = digits_end - 1;
                    }
                }
                b'?' => {
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        if let Some(replacement) = repl(PlaceholderStyle::Sqlite, digits) {
                            let buf = out.get_or_insert_with(String::new);
                            buf.push_str(&sql[copied_upto..idx]);
                            buf.push_str(&replacement);
                            copied_upto = digits_end;
                        }
                        idx = digits_end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    // consume the whole closing delimiter, trailing `$` included
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }

        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_upto..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..idx])
            .ok()
            .map(|digits| (idx, digits))
    }
}

fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    // A bare `$1$` is a placeholder followed by dollar-quote start, not a
    // tag; digit-only tags are rejected to keep placeholders working.
    if idx < bytes.len() && bytes[idx] == b'$' {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        if !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..=end].starts_with(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}
