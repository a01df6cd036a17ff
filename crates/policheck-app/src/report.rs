use anyhow::Context;
use policheck_types::{
    EvaluationReport, RunError, RunMeta, SCHEMA_REPORT_V1, Summary, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub fn serialize_report(report: &EvaluationReport) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

/// Parse a report written by `policheck evaluate`, checking its schema id.
pub fn parse_report_json(text: &str) -> anyhow::Result<EvaluationReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse policheck v1 report")
}

/// Report written in place of results when a run aborts.
pub fn runtime_error_report(message: &str) -> EvaluationReport {
    let now = OffsetDateTime::now_utc();
    EvaluationReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at: now,
            ended_at: now,
            duration_ms: 0,
            profile: "unknown".to_string(),
            absent_field: "unknown".to_string(),
        },
        verdict: Verdict::Fail,
        summary: Summary::default(),
        bundles: Vec::new(),
        error: Some(RunError {
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
        }),
    }
}
