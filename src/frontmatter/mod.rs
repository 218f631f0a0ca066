//! Frontmatter parsing for markdown content files.
//!
//! Content files start with an optional header block delimited by `---` lines,
//! followed by free-form markdown. The header is a flat list of `key: value`
//! lines; values are coerced to string lists, quoted strings, booleans or
//! numbers. Malformed lines are dropped rather than reported - the existing
//! content tree relies on this being permissive.

use serde_json::{Map, Number, Value};

/// A parsed content document: typed header fields plus the markdown body.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Header fields, in author order.
    pub matter: Map<String, Value>,

    /// Body text after the closing delimiter (trimmed), or the whole file
    /// when no delimiter pair is present (untrimmed).
    pub body: String,
}

impl Document {
    /// Parse a document, coercing header values to typed JSON values.
    pub fn parse(text: &str) -> Self {
        match split(text) {
            Some((header, body)) => Self {
                matter: parse_matter(header),
                body: body.trim().to_string(),
            },
            None => Self {
                matter: Map::new(),
                body: text.to_string(),
            },
        }
    }
}

/// Split a document into its raw header and body.
///
/// A header is present iff the text starts with a `---` line and a second
/// `---` line (newline-terminated, trailing whitespace allowed) follows.
/// Returns the text between the delimiters and the text after the closing
/// delimiter line, both untrimmed; `None` when there is no delimiter pair.
pub fn split(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---")?;
    let first_nl = rest.find('\n')?;
    if !rest[..first_nl].trim().is_empty() {
        return None;
    }

    let remaining = &rest[first_nl + 1..];
    let mut line_start = 0;
    while line_start < remaining.len() {
        // The closing delimiter must be newline-terminated, so a bare `---`
        // at end of file does not close the header.
        let line_end = match remaining[line_start..].find('\n') {
            Some(i) => line_start + i + 1,
            None => break,
        };
        let line = &remaining[line_start..line_end - 1];
        if line_start > 0 && line.starts_with("---") && line[3..].trim().is_empty() {
            let header = &remaining[..line_start - 1];
            let body = &remaining[line_end..];
            return Some((header, body));
        }
        line_start = line_end;
    }

    None
}

/// Parse header lines into typed values.
///
/// Each line splits at the first colon; lines without a colon, or with the
/// colon at position 0, are dropped. Duplicate keys keep the last value.
pub fn parse_matter(header: &str) -> Map<String, Value> {
    let mut data = Map::new();

    for line in header.lines() {
        let Some(colon) = line.find(':') else { continue };
        if colon == 0 {
            continue;
        }
        let key = line[..colon].trim();
        let raw = line[colon + 1..].trim();
        data.insert(key.to_string(), coerce(raw));
    }

    data
}

/// Coerce a raw header value. Priority: list, quoted string, boolean,
/// number, plain string.
fn coerce(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let items = raw[1..raw.len() - 1]
            .split(',')
            .map(|item| Value::String(strip_quotes(item.trim()).to_string()))
            .collect();
        return Value::Array(items);
    }

    if is_quoted(raw) {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }

    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Some(number) = parse_number(raw) {
        return Value::Number(number);
    }

    Value::String(raw.to_string())
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
}

/// Strip one layer of surrounding single or double quotes.
fn strip_quotes(s: &str) -> &str {
    if is_quoted(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Numeric literal grammar: optional sign, digits with at most one decimal
/// point, at least one digit. No exponents, no hex, no leading/trailing junk.
fn parse_number(raw: &str) -> Option<Number> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);

    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }

    if dots == 0 {
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Number::from(n));
        }
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Header fields kept as plain strings in author order.
///
/// This is the string-preserving mode used when rewriting metadata files:
/// values get one quote layer stripped on parse and are re-quoted on
/// serialization only when they contain a space or a colon, so parse -
/// serialize - parse is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMatter {
    fields: Vec<(String, String)>,
}

impl RawMatter {
    /// Parse a raw header. Same line grammar as the typed parser, but no
    /// list/boolean/number coercion. Duplicate keys keep the last value.
    pub fn parse(header: &str) -> Self {
        let mut matter = Self::default();

        for line in header.lines() {
            let Some(colon) = line.find(':') else { continue };
            if colon == 0 {
                continue;
            }
            let key = line[..colon].trim();
            let value = strip_quotes(line[colon + 1..].trim());
            matter.set(key, value);
        }

        matter
    }

    /// Set a field, replacing an existing value or appending a new field.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|(k, _)| k == key) {
            field.1 = value.to_string();
        } else {
            self.fields.push((key.to_string(), value.to_string()));
        }
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize back to `key: value` lines in field order, double-quoting
    /// values that contain a space or a colon.
    pub fn to_header(&self) -> String {
        let lines: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| {
                if value.contains(' ') || value.contains(':') {
                    format!("{}: \"{}\"", key, value)
                } else {
                    format!("{}: {}", key, value)
                }
            })
            .collect();
        lines.join("\n")
    }
}
