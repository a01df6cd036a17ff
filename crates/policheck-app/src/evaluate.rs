//! The `evaluate` use case: load snapshots, run the engine, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use policheck_domain::report::Evaluation;
use policheck_settings::{Overrides, PolicheckConfigV1, ResolvedConfig};
use policheck_store::{Format, PolicyStore, UserStore, import, load_policies};
use policheck_types::{
    EvaluationReport, Policy, RunMeta, SCHEMA_REPORT_V1, ToolMeta, UserRecord, Verdict, ids,
};
use time::OffsetDateTime;

/// Input for the evaluate use case.
#[derive(Clone, Debug)]
pub struct EvaluateInput<'a> {
    /// Policy snapshot (`.json`) or policy CSV.
    pub policies_path: &'a Utf8Path,
    /// User snapshot or upload (`.json` or `.csv`).
    pub users_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the evaluate use case.
#[derive(Clone, Debug)]
pub struct EvaluateOutput {
    pub report: EvaluationReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the evaluate use case: parse config, load inputs, evaluate every pair, build the report.
pub fn run_evaluate(input: EvaluateInput<'_>) -> anyhow::Result<EvaluateOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        PolicheckConfigV1::default()
    } else {
        policheck_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        policheck_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    let policies = read_policies(input.policies_path)
        .with_context(|| format!("load policies: {}", input.policies_path))?;
    let users = read_users(input.users_path)
        .with_context(|| format!("load users: {}", input.users_path))?;

    let Evaluation {
        verdict,
        summary,
        bundles,
    } = policheck_domain::evaluate(&policies, &users, &resolved.effective);

    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;

    tracing::info!(
        users = summary.users_evaluated,
        policies = summary.policies_evaluated,
        checks = summary.checks_total,
        failed = summary.checks_failed,
        verdict = ?verdict,
        duration_ms,
        "evaluation complete"
    );

    let report = EvaluationReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at,
            ended_at,
            duration_ms,
            profile: resolved.effective.profile.clone(),
            absent_field: resolved.effective.absent_field.as_str().to_string(),
        },
        verdict,
        summary,
        bundles,
        error: None,
    };

    Ok(EvaluateOutput {
        report,
        resolved_config: resolved,
    })
}

/// Policies as stored: a JSON snapshot is taken verbatim, a CSV goes through import parsing.
///
/// Operators are not validated here; the engine fails those checks closed.
fn read_policies(path: &Utf8Path) -> anyhow::Result<Vec<Policy>> {
    if !path.is_file() {
        anyhow::bail!("file not found: {path}");
    }
    let policies = match Format::from_path(path)? {
        Format::Json => load_policies(path)?,
        Format::Csv => import::read_policies(path)?,
    };
    Ok(PolicyStore::from_snapshot(policies)?.into_inner())
}

fn read_users(path: &Utf8Path) -> anyhow::Result<Vec<UserRecord>> {
    if !path.is_file() {
        anyhow::bail!("file not found: {path}");
    }
    let users = import::read_users(path)?;
    Ok(UserStore::from_snapshot(users)?.into_inner())
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
