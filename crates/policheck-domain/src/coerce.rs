//! Free-text to typed operand coercion.
//!
//! Authors type policy values into a text box or a CSV cell; this turns that text into the
//! operand the evaluator compares against. Coercion never fails: ambiguous input degrades to
//! the string form.

use policheck_types::{Operator, Value};
use serde_json::Value as JsonValue;

/// Coerce raw authoring text into a typed operand for `op`.
///
/// - `in`: a list. Bracketed text is read as a JSON array, then as a bracketed list of bare
///   or quoted words; anything else is split on commas.
/// - everything else: a finite number, then `true`/`false`, then the raw text untouched.
pub fn coerce(raw: &str, op: &Operator) -> Value {
    match op {
        Operator::In => coerce_list(raw),
        _ => coerce_scalar(raw),
    }
}

/// Parse text that is entirely a finite numeric literal.
///
/// The caller decides whether to trim. `inf`/`nan` spellings are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce_scalar(raw: &str) -> Value {
    let text = raw.trim();
    if let Some(n) = parse_number(text) {
        return Value::Number(n);
    }
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn coerce_list(raw: &str) -> Value {
    let text = raw.trim();

    if text.starts_with('[') {
        if let Ok(JsonValue::Array(items)) = serde_json::from_str::<JsonValue>(text) {
            return Value::List(items.into_iter().map(Value::from).collect());
        }
        return match parse_bracketed_words(text) {
            Some(items) => Value::List(items),
            None => Value::List(vec![Value::String(text.to_string())]),
        };
    }

    if text.is_empty() {
        return Value::List(Vec::new());
    }

    Value::List(
        text.split(',')
            .map(|item| Value::String(item.trim().to_string()))
            .collect(),
    )
}

/// `[a, 'b', "c,d"]` -> `["a", "b", "c,d"]`. Commas inside quotes stay part of
/// the item. Requires the closing bracket and balanced quotes.
fn parse_bracketed_words(text: &str) -> Option<Vec<Value>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let quote = chars.peek().copied().filter(|c| matches!(c, '"' | '\''));
        let item = match quote {
            Some(quote) => {
                chars.next();
                let mut word = String::new();
                loop {
                    match chars.next()? {
                        c if c == quote => break,
                        c => word.push(c),
                    }
                }
                // only whitespace may follow the closing quote
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                if chars.peek().is_some_and(|c| *c != ',') {
                    return None;
                }
                word
            }
            None => {
                let mut word = String::new();
                while let Some(c) = chars.next_if(|c| *c != ',') {
                    word.push(c);
                }
                word.trim().to_string()
            }
        };
        items.push(Value::String(item));

        // the next char is either a separator or the end
        if chars.next().is_none() {
            return Some(items);
        }
    }
}
