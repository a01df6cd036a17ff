//! Export use cases: CSV rows and Markdown summaries from an existing report.

use anyhow::Context;
use policheck_render::{
    CheckRow, RowFilter, flatten, policy_options, render_csv, render_markdown, user_options,
};
use policheck_types::EvaluationReport;

/// Row selection for CSV export. Empty lists select everything.
#[derive(Clone, Debug, Default)]
pub struct ExportInput {
    pub policies: Vec<String>,
    pub users: Vec<String>,
}

pub fn run_export_csv(report: &EvaluationReport, input: &ExportInput) -> anyhow::Result<String> {
    let filter = RowFilter::new(&input.policies, &input.users).context("invalid row filter")?;
    let all = flatten(&report.bundles);
    let total = all.len();
    let rows = filter.apply(all);
    if rows.is_empty() && total > 0 {
        tracing::warn!("{}", no_match_hint(&flatten(&report.bundles)));
    }
    tracing::debug!(rows = rows.len(), total, "exporting check rows");
    render_csv(&rows).context("render csv")
}

/// Names the ids a filter could have matched in `rows`.
fn no_match_hint(rows: &[CheckRow]) -> String {
    format!(
        "no check rows match the filters; available policies: {}; available users: {}",
        policy_options(rows).join(", "),
        user_options(rows).join(", ")
    )
}

pub fn run_markdown(report: &EvaluationReport) -> String {
    render_markdown(report)
}
