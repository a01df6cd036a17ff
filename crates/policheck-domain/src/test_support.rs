use crate::policy::{AbsentFieldRule, EvalConfig, FailOn};
use policheck_types::{Operator, Policy, UserRecord, Value};

pub fn policy(id: &str, field: &str, op: &str, value: impl Into<Value>) -> Policy {
    Policy::new(id, field, Operator::parse(op), value)
}

pub fn user(name: &str) -> UserRecord {
    UserRecord::new(name)
}

pub fn config(absent_field: AbsentFieldRule, parallel: bool) -> EvalConfig {
    EvalConfig {
        profile: "test".to_string(),
        absent_field,
        fail_on: FailOn::NonCompliant,
        parallel,
    }
}

/// Three policies (one malformed) and two users, the standard small batch.
pub fn sample_batch() -> (Vec<Policy>, Vec<UserRecord>) {
    let policies = vec![
        policy("age-min", "age", ">=", 18),
        policy("roles", "role", "in", vec!["admin", "devops"]),
        policy("weird", "role", "~=", "admin"),
    ];
    let users = vec![
        user("alice").with("age", 17).with("role", "admin"),
        user("bob").with("age", 21).with("role", "guest"),
    ];
    (policies, users)
}
