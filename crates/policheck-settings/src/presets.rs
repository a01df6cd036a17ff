use policheck_domain::policy::{AbsentFieldRule, EvalConfig, FailOn};

/// Known profile names, in documentation order.
pub const PROFILES: [&str; 3] = ["strict", "audit", "lenient"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything else belongs in `policheck.toml`.
pub fn preset(profile: &str) -> Option<EvalConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "audit" => Some(audit_profile()),
        "lenient" => Some(lenient_profile()),
        _ => None,
    }
}

fn strict_profile() -> EvalConfig {
    EvalConfig {
        profile: "strict".to_string(),
        absent_field: AbsentFieldRule::Fail,
        fail_on: FailOn::NonCompliant,
        parallel: true,
    }
}

fn audit_profile() -> EvalConfig {
    // Same checks as strict; findings are reported but never fail the run.
    EvalConfig {
        profile: "audit".to_string(),
        absent_field: AbsentFieldRule::Fail,
        fail_on: FailOn::Never,
        parallel: true,
    }
}

fn lenient_profile() -> EvalConfig {
    EvalConfig {
        profile: "lenient".to_string(),
        absent_field: AbsentFieldRule::NotEqual,
        fail_on: FailOn::Never,
        parallel: true,
    }
}
