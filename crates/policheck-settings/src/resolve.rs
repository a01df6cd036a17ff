use crate::{model::PolicheckConfigV1, presets};
use anyhow::Context;
use policheck_domain::policy::{AbsentFieldRule, EvalConfig, FailOn};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub absent_field: Option<String>,
    pub parallel: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EvalConfig,
}

pub fn resolve_config(
    cfg: PolicheckConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        )
    })?;

    if let Some(v) = overrides.absent_field.as_deref().or(cfg.absent_field.as_deref()) {
        effective.absent_field = parse_absent_field(v).context("invalid absent_field")?;
    }

    if let Some(v) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(v).context("invalid fail_on")?;
    }

    if let Some(parallel) = overrides.parallel.or(cfg.parallel) {
        effective.parallel = parallel;
    }

    Ok(ResolvedConfig { effective })
}

pub fn parse_absent_field(v: &str) -> anyhow::Result<AbsentFieldRule> {
    match v {
        "fail" => Ok(AbsentFieldRule::Fail),
        "not_equal" | "not-equal" => Ok(AbsentFieldRule::NotEqual),
        other => anyhow::bail!("unknown absent_field: {other} (expected fail|not_equal)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "noncompliant" | "non_compliant" => Ok(FailOn::NonCompliant),
        "never" => Ok(FailOn::Never),
        other => anyhow::bail!("unknown fail_on: {other} (expected noncompliant|never)"),
    }
}
