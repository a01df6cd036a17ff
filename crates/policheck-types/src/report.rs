use crate::Bundle;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for policheck reports.
pub const SCHEMA_REPORT_V1: &str = "policheck.report.v1";

/// Overall outcome of an evaluation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

/// Aggregate counts for one evaluation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub users_evaluated: u64,
    pub policies_evaluated: u64,
    pub checks_total: u64,
    pub checks_passed: u64,
    pub checks_failed: u64,
    pub users_compliant: u64,
    pub users_noncompliant: u64,

    /// Failed checks keyed by reason code. Plain comparison failures are not counted here.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures_by_reason: BTreeMap<String, u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub ended_at: OffsetDateTime,
    pub duration_ms: u64,

    /// Profile the run was resolved from.
    pub profile: String,
    /// Rule applied to `!=` on absent fields (`fail` or `not_equal`).
    pub absent_field: String,
}

/// Tool failure recorded in place of results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// The JSON report envelope written by `policheck evaluate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationReport {
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub verdict: Verdict,
    pub summary: Summary,
    pub bundles: Vec<Bundle>,

    /// Set only on runtime-error reports, which carry no bundles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_above_u32_survive_json() {
        let big = u64::from(u32::MAX) + 1;
        let summary = Summary {
            checks_total: big,
            checks_failed: big,
            failures_by_reason: BTreeMap::from([("type_mismatch".to_string(), big)]),
            ..Summary::default()
        };
        let json = serde_json::to_string(&summary).expect("serialize");
        assert!(json.contains("\"checks_total\":4294967296"));
        let back: Summary = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, summary);
    }
}
