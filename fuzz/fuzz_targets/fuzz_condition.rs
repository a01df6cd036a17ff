//! Fuzz target for single-condition evaluation.
//!
//! Goal: evaluation **never panics**, and unsupported operators never pass.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_condition
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use policheck_domain::condition::evaluate_condition;
use policheck_domain::policy::AbsentFieldRule;
use policheck_types::{Operator, Policy, UserRecord};

#[derive(Arbitrary, Debug)]
struct ConditionInput {
    field: String,
    operator: String,
    /// Authoring text for the operand, coerced like the policy form does.
    operand: String,
    /// Record attributes as raw JSON text; unparseable text is used as a string.
    attributes: Vec<(String, String)>,
    not_equal: bool,
}

fuzz_target!(|input: ConditionInput| {
    if input.attributes.len() > 16 || input.operand.len() > 1024 {
        return;
    }

    let op = Operator::parse(&input.operator);
    let value = policheck_domain::coerce(&input.operand, &op);
    let policy = Policy {
        policy_id: "fuzz".to_string(),
        description: String::new(),
        field: input.field,
        operator: op,
        value,
    };

    let mut user = UserRecord::new("fuzz-user");
    for (name, raw) in input.attributes {
        let value = serde_json::from_str::<serde_json::Value>(&raw)
            .map(Into::into)
            .unwrap_or_else(|_| raw.into());
        user.attributes.insert(name, value);
    }

    let absent = if input.not_equal {
        AbsentFieldRule::NotEqual
    } else {
        AbsentFieldRule::Fail
    };
    let check = evaluate_condition(&policy, &user, absent);
    if matches!(policy.operator, Operator::Unsupported(_)) {
        assert!(!check.passed);
    }
});
