//! Rendering mismatch trails as text.
//!
//! One line per trail entry, outermost first:
//!
//! ```text
//! value {a: 12, b: 22} is not conform to A.
//! property 'b' value 22 is not conform to string.
//! ```

use crate::diagnostics::{Cause, TypeRef, UnmatchEntry, UnmatchTrail};
use tsv_common::{Value, number_to_string};
use tsv_graph::{TypeFormatter, TypeGraph};

/// Strings longer than this many characters are cut short.
const MAX_STRING_CHARS: usize = 32;

pub fn format_trail(graph: &TypeGraph, trail: &UnmatchTrail<'_>) -> String {
    let formatter = TypeFormatter::new(graph);
    trail
        .entries()
        .iter()
        .rev()
        .map(|entry| format_entry(&formatter, entry))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_entry(formatter: &TypeFormatter<'_>, entry: &UnmatchEntry<'_>) -> String {
    let mut line = String::new();
    if let Some(context) = &entry.context {
        line.push_str(&format!("{context} "));
    }
    line.push_str(&format!(
        "value {} is not conform to {}",
        render_value(entry.value),
        render_type(formatter, entry.ty)
    ));
    if let Some(cause) = &entry.cause {
        line.push_str(": ");
        line.push_str(&render_cause(formatter, cause));
    }
    line.push('.');
    line
}

pub fn render_type(formatter: &TypeFormatter<'_>, ty: TypeRef<'_>) -> String {
    match ty {
        TypeRef::Named(id) => formatter.format_named(id),
        TypeRef::Node(ty) => formatter.format(ty),
    }
}

fn render_cause(formatter: &TypeFormatter<'_>, cause: &Cause<'_>) -> String {
    match cause {
        Cause::NotInstanceOf(name) => format!("is not a `{name}`"),
        Cause::NotAnObject => "is not an object".to_string(),
        Cause::NotAnArray => "is not an array".to_string(),
        Cause::NotAFunction => "is not a function".to_string(),
        Cause::MissingProperty(name) => format!("missing property '{name}'"),
        Cause::InvalidIndexKey { key, kind } => {
            format!("key '{key}' is not a valid {} key", kind.as_str())
        }
        Cause::TupleLength { expected, actual } => {
            format!("expected {expected} items, got {actual}")
        }
        Cause::NoMatchingType(members) => {
            let members: Vec<String> = members.iter().map(|m| formatter.format(m)).collect();
            format!("no matching type in: {}", members.join(" or "))
        }
        Cause::InvalidKey => "is not a valid key".to_string(),
    }
}

// =============================================================================
// Values
// =============================================================================

/// Render a value for a diagnostic.
///
/// Containers show their primitive entries only; a trailing `...` marks
/// entries that were left out.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let (parts, skipped) = render_entries(items.iter().map(|item| (None, item)));
            render_container('[', ']', parts, skipped)
        }
        Value::Object(object) => {
            let (parts, skipped) =
                render_entries(object.entries().map(|(key, item)| (Some(key), item)));
            render_container('{', '}', parts, skipped)
        }
        Value::Function(function) => match &function.name {
            Some(name) => format!("[Function {name}]"),
            None => "[Function]".to_string(),
        },
        primitive => render_primitive(primitive).unwrap_or_default(),
    }
}

fn render_primitive(value: &Value) -> Option<String> {
    Some(match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::BigInt(n) => format!("{n}n"),
        Value::String(s) => render_string(s),
        Value::Symbol(Some(description)) => format!("Symbol({description})"),
        Value::Symbol(None) => "Symbol()".to_string(),
        Value::Array(_) | Value::Object(_) | Value::Function(_) => return None,
    })
}

fn render_string(s: &str) -> String {
    let shown = match s.char_indices().nth(MAX_STRING_CHARS) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    };
    serde_json::Value::String(shown).to_string()
}

fn render_entries<'v>(
    entries: impl Iterator<Item = (Option<&'v str>, &'v Value)>,
) -> (Vec<String>, bool) {
    let mut parts = Vec::new();
    let mut skipped = false;
    for (key, item) in entries {
        match (key, render_primitive(item)) {
            (Some(key), Some(rendered)) => parts.push(format!("{key}: {rendered}")),
            (None, Some(rendered)) => parts.push(rendered),
            (_, None) => skipped = true,
        }
    }
    (parts, skipped)
}

fn render_container(open: char, close: char, mut parts: Vec<String>, skipped: bool) -> String {
    if skipped {
        parts.push("...".to_string());
    }
    format!("{open}{}{close}", parts.join(", "))
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
