//! Human-readable text form of [`Value`]s.
//!
//! Rendering goes through [`std::fmt::Display`], so `value.to_string()`
//! yields the text. [`Value::parse`] reads it back on a best-effort basis:
//! anything it does not recognise becomes `None`, it never fails.
//!
//! Known gaps in the grammar: no scientific notation (`1e3` is `None`), no
//! escape sequences inside quoted strings, and no map literals. Strings
//! render verbatim at the top level, so only their quoted form (or a list
//! element) parses back to a string.

use std::fmt::{self, Write as _};

use crate::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Double(v) => f.write_str(&format_double(*v)),
            Value::Boolean(v) => f.write_str(if *v { "true" } else { "false" }),
            Value::String(v) => f.write_str(v),
            Value::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_element(f, item)?;
                }
                f.write_char(']')
            }
            Value::Map(entries) => {
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                f.write_char('{')?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{key}\": ")?;
                    write_element(f, &entries[key])?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Container elements render like top-level values, except that strings
/// are wrapped in double quotes.
fn write_element(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(v) => write!(f, "\"{v}\""),
        other => write!(f, "{other}"),
    }
}

/// Six fixed decimals with trailing zeros removed, keeping at least one
/// digit after the point.
fn format_double(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut text = format!("{value:.6}");
    if let Some(dot) = text.find('.') {
        let keep = text.trim_end_matches('0').len().max(dot + 2);
        text.truncate(keep);
    }
    text
}

impl Value {
    /// Parses configuration-style text into a value.
    ///
    /// Recognised forms, tried in order after trimming whitespace:
    /// `[a, b, ...]` lists (elements parsed recursively, `[]` is empty),
    /// `'...'` or `"..."` strings, `true`/`false`, numbers with exactly one
    /// `.` as doubles, and plain signed digits as integers. Everything
    /// else, including numbers that fail to parse, yields `None`.
    pub fn parse(text: &str) -> Value {
        let text = text.trim();

        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return Value::List(Vec::new());
            }
            return Value::List(split_top_level(inner).into_iter().map(Value::parse).collect());
        }

        if let Some(inner) = strip_quotes(text) {
            return Value::String(inner.to_owned());
        }

        match text {
            "true" => return Value::Boolean(true),
            "false" => return Value::Boolean(false),
            _ => {}
        }

        let numeric = !text.is_empty()
            && text
                .chars()
                .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == '.');
        if !numeric {
            return Value::None;
        }

        match text.matches('.').count() {
            0 => text.parse().map(Value::Int).unwrap_or(Value::None),
            1 => text.parse().map(Value::Double).unwrap_or(Value::None),
            _ => Value::None,
        }
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// Splits list contents on commas that are neither nested in brackets nor
/// inside a quoted section.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&inner[start..]);
    parts
}
