//! Deterministic YAML emitter for frontmatter mappings.
//!
//! `serde_yaml` is used for decoding, but its emitter picks block style for
//! every sequence and its own quoting rules. Frontmatter written back into a
//! note has to be stable byte-for-byte, so emission is done here as a pure
//! function of the mapping:
//!
//! - `id`, `aliases` and `tags` come first, other keys keep mapping order;
//! - sequences of scalars use flow style (`tags: [a, b]`);
//! - strings are plain only when they re-parse to the same string.

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};

/// Keys emitted ahead of all others at the top level.
pub const PRIORITY_KEYS: [&str; 3] = ["id", "aliases", "tags"];

const INDENT: usize = 2;

/// Words that YAML 1.1 readers treat as booleans.
const YAML11_BOOLS: [&str; 6] = ["y", "n", "yes", "no", "on", "off"];

/// Serialize a mapping into YAML lines (without `---` delimiters).
pub fn dump_lines(mapping: &Mapping) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for (key, value) in ordered_entries(mapping) {
        emit_entry(key, value, 0, &mut lines)?;
    }
    Ok(lines)
}

/// Decode YAML text into a value.
pub fn load(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

fn ordered_entries(mapping: &Mapping) -> Vec<(&Value, &Value)> {
    let mut entries = Vec::with_capacity(mapping.len());
    for wanted in PRIORITY_KEYS {
        if let Some(entry) = mapping.iter().find(|(k, _)| k.as_str() == Some(wanted)) {
            entries.push(entry);
        }
    }
    entries.extend(mapping.iter().filter(|(k, _)| !is_priority_key(k)));
    entries
}

fn is_priority_key(key: &Value) -> bool {
    key.as_str().is_some_and(|k| PRIORITY_KEYS.contains(&k))
}

fn emit_entry(key: &Value, value: &Value, indent: usize, lines: &mut Vec<String>) -> Result<()> {
    let pad = " ".repeat(indent);
    let key_text = format_key(key)?;
    match inline(value)? {
        Some(text) => lines.push(format!("{pad}{key_text}: {text}")),
        None => {
            lines.push(format!("{pad}{key_text}:"));
            emit_block(value, indent + INDENT, lines)?;
        }
    }
    Ok(())
}

fn emit_block(value: &Value, indent: usize, lines: &mut Vec<String>) -> Result<()> {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                emit_entry(k, v, indent, lines)?;
            }
        }
        Value::Sequence(seq) => {
            for item in seq {
                emit_item(item, indent, lines)?;
            }
        }
        other => lines.push(format!("{}{}", " ".repeat(indent), format_scalar(other)?)),
    }
    Ok(())
}

fn emit_item(item: &Value, indent: usize, lines: &mut Vec<String>) -> Result<()> {
    let pad = " ".repeat(indent);
    if let Some(text) = inline(item)? {
        lines.push(format!("{pad}- {text}"));
        return Ok(());
    }

    // Nested block: emit one level deeper, then fold the first line onto the dash.
    let mut nested = Vec::new();
    emit_block(item, indent + INDENT, &mut nested)?;
    if let Some(first) = nested.first_mut() {
        *first = format!("{pad}- {}", &first[indent + INDENT..]);
    }
    lines.extend(nested);
    Ok(())
}

/// Render a value on a single line, or `None` if it needs block style.
fn inline(value: &Value) -> Result<Option<String>> {
    let text = match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => format_scalar(value)?,
        Value::Sequence(seq) if seq.iter().all(is_scalar) => {
            let items = seq.iter().map(format_scalar).collect::<Result<Vec<_>>>()?;
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) if map.is_empty() => "{}".to_string(),
        Value::Tagged(tagged) if is_scalar(&tagged.value) => {
            format!("{} {}", tagged.tag, format_scalar(&tagged.value)?)
        }
        Value::Tagged(tagged) => {
            return Err(Error::UnsupportedValue(format!(
                "tagged collection {}",
                tagged.tag
            )));
        }
        _ => return Ok(None),
    };
    Ok(Some(text))
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

fn format_key(key: &Value) -> Result<String> {
    if is_scalar(key) {
        format_scalar(key)
    } else {
        Err(Error::UnsupportedValue("non-scalar mapping key".to_string()))
    }
}

fn format_scalar(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(format_number(n)),
        Value::String(s) => Ok(format_string(s)),
        _ => Err(Error::UnsupportedValue("expected a scalar".to_string())),
    }
}

fn format_number(n: &serde_yaml::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_nan() => ".nan".to_string(),
        Some(f) if f.is_infinite() && f > 0.0 => ".inf".to_string(),
        Some(f) if f.is_infinite() => "-.inf".to_string(),
        Some(f) => {
            let text = f.to_string();
            if text.contains(['.', 'e', 'E']) {
                text
            } else {
                format!("{text}.0")
            }
        }
        None => n.to_string(),
    }
}

/// Format a string, quoting it unless it is unambiguous as a plain scalar.
pub fn format_string(s: &str) -> String {
    if is_plain_safe(s) {
        s.to_string()
    } else {
        double_quote(s)
    }
}

fn is_plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if !(first.is_alphanumeric() || first == '_') || s.ends_with(' ') {
        return false;
    }
    if !s
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '/' | '(' | ')' | '+'))
    {
        return false;
    }
    if YAML11_BOOLS.iter().any(|word| word.eq_ignore_ascii_case(s)) {
        return false;
    }
    matches!(serde_yaml::from_str::<Value>(s), Ok(Value::String(ref parsed)) if parsed == s)
}

fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}' => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
