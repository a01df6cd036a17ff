use policheck_domain::fingerprint::fingerprint_for_check;
use policheck_types::{Bundle, Value};
use std::collections::BTreeSet;

/// One (username, policy) result, flattened out of its bundle.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckRow {
    /// Stable fingerprint of `username|policy_id`.
    pub row_id: String,
    pub username: String,
    pub policy_id: String,
    pub description: String,
    pub field: String,
    pub operator: String,
    pub value: Value,
    pub actual: Value,
    pub passed: bool,
    pub reason: Option<String>,
    pub note: Option<String>,
}

/// Flatten bundles into rows, user order first, then policy order.
pub fn flatten(bundles: &[Bundle]) -> Vec<CheckRow> {
    bundles
        .iter()
        .flat_map(|bundle| {
            bundle.checks.iter().map(|check| CheckRow {
                row_id: fingerprint_for_check(&bundle.username, &check.policy_id),
                username: bundle.username.clone(),
                policy_id: check.policy_id.clone(),
                description: check.description.clone(),
                field: check.field.clone(),
                operator: check.operator.as_str().to_string(),
                value: check.value.clone(),
                actual: check.actual.clone(),
                passed: check.passed,
                reason: check.reason.map(|r| r.code().to_string()),
                note: check.note.clone(),
            })
        })
        .collect()
}

/// Distinct policy ids present in `rows`, sorted.
pub fn policy_options(rows: &[CheckRow]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.policy_id.as_str()))
}

/// Distinct usernames present in `rows`, sorted.
pub fn user_options(rows: &[CheckRow]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.username.as_str()))
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
