//! Shared test utilities for the policheck workspace.
//!
//! `xtask` needs `normalize_nondeterministic` outside of `#[cfg(test)]`, so it lives in
//! its own crate rather than a test module.

use serde_json::Value;

const TIMESTAMP: &str = "__TIMESTAMP__";
const VERSION: &str = "__VERSION__";

/// Normalize non-deterministic report fields for golden-file comparison.
///
/// `tool.version` is replaced only when the root object is a report envelope
/// (`schema`, `tool`, `run`, `verdict` and `bundles` all present). The run timestamps and
/// `duration_ms` are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "verdict", "bundles"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert("version".to_string(), Value::String(VERSION.to_string()));
        }
    }
    normalize_run_timing(&mut value);
    value
}

fn normalize_run_timing(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "ended_at"] {
                if let Some(v) = map.get_mut(key) {
                    *v = Value::String(TIMESTAMP.to_string());
                }
            }
            if let Some(v) = map.get_mut("duration_ms") {
                *v = Value::Number(0.into());
            }
            for val in map.values_mut() {
                normalize_run_timing(val);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_run_timing),
        _ => {}
    }
}

/// Read a fixture-relative JSON file, panicking with the path on failure.
pub fn read_json(path: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()))
}
