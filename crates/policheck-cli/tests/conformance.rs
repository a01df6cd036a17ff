//! Conformance tests for policheck.
//!
//! These tests validate:
//! 1. Every reason code and operator has an explanation
//! 2. Every fixture's expected report validates against the report schema
//! 3. Reports written by the CLI validate against the report schema

use policheck_types::{EvaluationReport, FailureReason, explain};
use serde_json::Value;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("policheck-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

fn report_validator() -> jsonschema::Validator {
    let schema = serde_json::to_value(schemars::schema_for!(EvaluationReport))
        .expect("serialize report schema");
    jsonschema::validator_for(&schema).expect("compile report schema")
}

fn errors(validator: &jsonschema::Validator, instance: &Value) -> Vec<String> {
    validator
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect()
}

#[test]
fn all_codes_have_explanations() {
    for code in explain::all_codes() {
        let exp = explain::lookup_explanation(code)
            .unwrap_or_else(|| panic!("Code '{code}' has no explanation in registry"));
        assert!(!exp.title.is_empty(), "Code '{code}' has empty title");
        assert!(!exp.description.is_empty(), "Code '{code}' has empty description");
        assert!(!exp.remediation.is_empty(), "Code '{code}' has empty remediation");
    }
}

#[test]
fn all_operators_have_explanations() {
    for op in explain::all_operators() {
        assert!(
            explain::lookup_explanation(op).is_some(),
            "Operator '{op}' has no explanation in registry"
        );
    }
}

#[test]
fn every_failure_reason_is_listed() {
    let codes = explain::all_codes();
    for reason in FailureReason::ALL {
        assert!(
            codes.contains(&reason.code()),
            "reason '{}' missing from all_codes()",
            reason.code()
        );
    }
}

#[test]
fn expected_reports_validate_against_schema() {
    let validator = report_validator();
    let mut seen = 0;

    for entry in std::fs::read_dir(fixtures_dir()).expect("read fixtures dir") {
        let path = entry.expect("dir entry").path().join("expected.report.json");
        if !path.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(&path).expect("read expected report");
        let report: Value = serde_json::from_str(&text).expect("parse expected report");

        let errs = errors(&validator, &report);
        assert!(errs.is_empty(), "{} failed validation: {errs:?}", path.display());
        seen += 1;
    }

    assert!(seen >= 4, "expected at least four fixture reports, found {seen}");
}

#[test]
fn expected_reports_deserialize_into_the_report_type() {
    for name in ["all_compliant", "mixed_failures", "malformed_policies", "csv_users"] {
        let path = fixtures_dir().join(name).join("expected.report.json");
        let text = std::fs::read_to_string(&path).expect("read expected report");
        let mut value: Value = serde_json::from_str(&text).expect("parse");
        // Placeholders are not RFC 3339.
        value["run"]["started_at"] = Value::String("2025-01-01T00:00:00Z".to_string());
        value["run"]["ended_at"] = Value::String("2025-01-01T00:00:01Z".to_string());

        let report: EvaluationReport =
            serde_json::from_value(value).unwrap_or_else(|e| panic!("{name}: {e}"));
        let checks: usize = report.bundles.iter().map(|b| b.checks.len()).sum();
        assert_eq!(checks as u64, report.summary.checks_total, "{name}");
        assert_eq!(
            report.summary.checks_passed + report.summary.checks_failed,
            report.summary.checks_total,
            "{name}"
        );
    }
}

#[test]
fn runtime_error_reports_validate_against_schema() {
    let report = runtime_error_envelope();
    let errs = errors(&report_validator(), &report);
    assert!(errs.is_empty(), "runtime error report failed validation: {errs:?}");
}

fn runtime_error_envelope() -> Value {
    serde_json::json!({
        "schema": "policheck.report.v1",
        "tool": { "name": "policheck", "version": "0.1.0" },
        "run": {
            "started_at": "2025-01-01T00:00:00Z",
            "ended_at": "2025-01-01T00:00:00Z",
            "duration_ms": 0,
            "profile": "unknown",
            "absent_field": "unknown"
        },
        "verdict": "fail",
        "summary": {
            "users_evaluated": 0,
            "policies_evaluated": 0,
            "checks_total": 0,
            "checks_passed": 0,
            "checks_failed": 0,
            "users_compliant": 0,
            "users_noncompliant": 0
        },
        "bundles": [],
        "error": { "code": "runtime_error", "message": "load users: file not found" }
    })
}
