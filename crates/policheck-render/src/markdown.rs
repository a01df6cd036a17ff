use policheck_types::{Check, EvaluationReport, Value, Verdict};

pub fn render_markdown(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("# Policheck report\n\n");
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Warn => "WARN",
        Verdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Users: {} compliant / {} non-compliant\n- Checks: {} passed / {} failed ({} total)\n- Profile: `{}` (absent fields: `{}`)\n\n",
        verdict,
        s.users_compliant,
        s.users_noncompliant,
        s.checks_passed,
        s.checks_failed,
        s.checks_total,
        report.run.profile,
        report.run.absent_field,
    ));

    if let Some(err) = &report.error {
        out.push_str(&format!("> Error (`{}`): {}\n", err.code, err.message));
        return out;
    }

    if !s.failures_by_reason.is_empty() {
        out.push_str("| reason | failed checks |\n|---|---|\n");
        for (code, count) in &s.failures_by_reason {
            out.push_str(&format!("| `{code}` | {count} |\n"));
        }
        out.push('\n');
    }

    let noncompliant: Vec<_> = report.bundles.iter().filter(|b| !b.compliant).collect();
    if noncompliant.is_empty() {
        out.push_str("All users compliant.\n");
        return out;
    }

    out.push_str("## Non-compliant users\n\n");
    for bundle in noncompliant {
        out.push_str(&format!("### {}\n\n", bundle.username));
        for check in bundle.checks.iter().filter(|c| !c.passed) {
            out.push_str(&failed_line(check));
        }
        out.push('\n');
    }

    out
}

fn failed_line(check: &Check) -> String {
    let mut line = format!(
        "- `{}`: `{} {} {}`, actual {}",
        check.policy_id,
        check.field,
        check.operator,
        check.value,
        shown(&check.actual)
    );
    if let Some(reason) = check.reason {
        line.push_str(&format!(" [`{}`]", reason.code()));
    }
    if let Some(note) = &check.note {
        line.push_str(&format!(" ({note})"));
    }
    line.push('\n');
    line
}

fn shown(value: &Value) -> String {
    match value {
        Value::Null => "absent".to_string(),
        other => format!("`{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{bundle, check, sample};
    use policheck_types::{RunMeta, SCHEMA_REPORT_V1, Summary, ToolMeta};
    use std::collections::BTreeMap;
    use time::macros::datetime;

    fn report(
        verdict: Verdict,
        bundles: Vec<policheck_types::Bundle>,
        summary: Summary,
    ) -> EvaluationReport {
        EvaluationReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "policheck".to_string(),
                version: "0.1.0".to_string(),
            },
            run: RunMeta {
                started_at: datetime!(2025-01-01 00:00:00 UTC),
                ended_at: datetime!(2025-01-01 00:00:00 UTC),
                duration_ms: 0,
                profile: "strict".to_string(),
                absent_field: "fail".to_string(),
            },
            verdict,
            summary,
            bundles,
            error: None,
        }
    }

    #[test]
    fn renders_all_compliant() {
        let bundles = vec![bundle("bob", vec![check("bob", "age-min", true)])];
        let md = render_markdown(&report(
            Verdict::Pass,
            bundles,
            Summary {
                users_evaluated: 1,
                users_compliant: 1,
                checks_total: 1,
                checks_passed: 1,
                ..Summary::default()
            },
        ));
        assert!(md.contains("Verdict: **PASS**"));
        assert!(md.contains("All users compliant."));
        assert!(!md.contains("## Non-compliant users"));
    }

    #[test]
    fn renders_failures_grouped_by_user() {
        let summary = Summary {
            users_evaluated: 2,
            policies_evaluated: 2,
            checks_total: 4,
            checks_passed: 2,
            checks_failed: 2,
            users_compliant: 0,
            users_noncompliant: 2,
            failures_by_reason: BTreeMap::from([("missing_field".to_string(), 1)]),
        };
        let md = render_markdown(&report(Verdict::Fail, sample(), summary));

        assert!(md.contains("Verdict: **FAIL**"));
        assert!(md.contains("| `missing_field` | 1 |"));
        assert!(md.contains("### alice"));
        assert!(md.contains("- `age-min`: `age >= 18`, actual `17`"));
        assert!(md.contains("### bob"));
        assert!(md.contains("actual absent [`missing_field`] (missing field age)"));
        // passing checks are not listed
        assert!(!md.contains("`mfa`: `age >= 18`, actual `21`"));
    }

    #[test]
    fn renders_runtime_errors() {
        let mut r = report(Verdict::Fail, Vec::new(), Summary::default());
        r.error = Some(policheck_types::RunError {
            code: "runtime_error".to_string(),
            message: "read users.json".to_string(),
        });
        let md = render_markdown(&r);
        assert!(md.contains("> Error (`runtime_error`): read users.json"));
        assert!(!md.contains("All users compliant."));
    }
}
