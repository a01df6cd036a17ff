use anyhow::Context;
use policheck_domain::coerce;
use policheck_types::Operator;

/// Coerce authoring text for `operator` and return the operand as compact JSON.
///
/// Unknown operators are accepted and coerce as scalars, the same as the authoring path.
pub fn run_coerce(operator: &str, raw: &str) -> anyhow::Result<String> {
    let value = coerce(raw, &Operator::parse(operator));
    serde_json::to_string(&value).context("serialize coerced value")
}
