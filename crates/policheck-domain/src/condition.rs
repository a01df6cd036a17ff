//! Single condition evaluation: one policy against one record.

use crate::coerce::parse_number;
use crate::policy::AbsentFieldRule;
use policheck_types::{Check, FailureReason, Operator, Policy, UserRecord, Value};

/// Pass/fail decision for one condition, with the reason when it failed closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub reason: Option<FailureReason>,
    pub note: Option<String>,
}

impl Outcome {
    fn from_bool(passed: bool) -> Self {
        Self {
            passed,
            reason: None,
            note: None,
        }
    }

    fn failed(reason: FailureReason, note: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason),
            note: Some(note.into()),
        }
    }
}

/// Evaluate one policy against one record and build the resulting check.
///
/// Never panics and never errors: malformed policies and odd data fail closed.
pub fn evaluate_condition(policy: &Policy, user: &UserRecord, absent: AbsentFieldRule) -> Check {
    let actual = user.field(&policy.field);
    let outcome = decide(policy, actual.as_ref(), absent);

    Check {
        username: user.username.clone(),
        policy_id: policy.policy_id.clone(),
        description: policy.description.clone(),
        field: policy.field.clone(),
        operator: policy.operator.clone(),
        value: policy.value.clone(),
        actual: actual.unwrap_or(Value::Null),
        passed: outcome.passed,
        reason: outcome.reason,
        note: outcome.note,
    }
}

fn decide(policy: &Policy, actual: Option<&Value>, absent: AbsentFieldRule) -> Outcome {
    if let Operator::Unsupported(raw) = &policy.operator {
        return unsupported(raw);
    }

    let Some(actual) = actual else {
        return match (&policy.operator, absent) {
            (Operator::Ne, AbsentFieldRule::NotEqual) => Outcome::from_bool(true),
            _ => Outcome::failed(
                FailureReason::MissingField,
                format!("missing field {}", policy.field),
            ),
        };
    };

    compare(&policy.operator, actual, &policy.value)
}

/// Apply `op` to a present record value and the policy operand.
pub fn compare(op: &Operator, actual: &Value, expected: &Value) -> Outcome {
    match op {
        Operator::Eq => Outcome::from_bool(loosely_equal(actual, expected)),
        Operator::Ne => Outcome::from_bool(!loosely_equal(actual, expected)),
        Operator::Gt => ordering(op, actual, expected, f64::gt),
        Operator::Ge => ordering(op, actual, expected, f64::ge),
        Operator::Lt => ordering(op, actual, expected, f64::lt),
        Operator::Le => ordering(op, actual, expected, f64::le),
        Operator::In => membership(actual, expected),
        Operator::Includes => containment(actual, expected),
        Operator::Unsupported(raw) => unsupported(raw),
    }
}

/// Type-aware equality shared by `==`, `!=`, `in` and list `includes`.
///
/// Same-typed values compare natively (lists element-wise); differing types compare by
/// string form. `Null` only equals `Null`.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::List(xs), Value::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loosely_equal(x, y))
        }
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => a.string_form() == b.string_form(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => parse_number(s.trim()),
        _ => None,
    }
}

fn ordering(
    op: &Operator,
    actual: &Value,
    expected: &Value,
    cmp: fn(&f64, &f64) -> bool,
) -> Outcome {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => Outcome::from_bool(cmp(&a, &b)),
        _ => Outcome::failed(
            FailureReason::TypeMismatch,
            format!(
                "cannot compare {} {} {} numerically",
                actual.type_name(),
                op,
                expected.type_name()
            ),
        ),
    }
}

fn membership(actual: &Value, expected: &Value) -> Outcome {
    let Some(items) = expected.as_list() else {
        return Outcome::failed(
            FailureReason::MembershipShape,
            format!("operator in expects a list operand, got {}", expected.type_name()),
        );
    };
    Outcome::from_bool(items.iter().any(|item| loosely_equal(actual, item)))
}

fn containment(actual: &Value, expected: &Value) -> Outcome {
    match actual {
        Value::List(items) => {
            Outcome::from_bool(items.iter().any(|item| loosely_equal(item, expected)))
        }
        Value::String(text) => Outcome::from_bool(text.contains(&expected.string_form())),
        other => Outcome::failed(
            FailureReason::TypeMismatch,
            format!(
                "operator includes needs a list or string field, got {}",
                other.type_name()
            ),
        ),
    }
}

fn unsupported(raw: &str) -> Outcome {
    Outcome::failed(
        FailureReason::UnsupportedOperator,
        format!("unsupported operator {raw}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{policy, user};

    fn run(policy: &Policy, user: &UserRecord) -> Check {
        evaluate_condition(policy, user, AbsentFieldRule::Fail)
    }

    #[test]
    fn age_threshold_scenario() {
        let p = policy("age-min", "age", ">=", 18);
        let alice = user("alice").with("age", 17);
        let bob = user("bob").with("age", 21);

        let check = run(&p, &alice);
        assert!(!check.passed);
        assert_eq!(check.reason, None);
        assert_eq!(check.actual, Value::Number(17.0));

        assert!(run(&p, &bob).passed);
    }

    #[test]
    fn role_membership_scenario() {
        let p = policy("roles", "role", "in", vec!["admin", "devops"]);
        assert!(run(&p, &user("a").with("role", "admin")).passed);
        assert!(!run(&p, &user("g").with("role", "guest")).passed);
    }

    #[test]
    fn email_includes_scenario() {
        let p = policy("corp-mail", "email", "includes", "@acme.com");
        assert!(run(&p, &user("x").with("email", "x@acme.com")).passed);
        assert!(!run(&p, &user("y").with("email", "x@other.com")).passed);
    }

    #[test]
    fn unsupported_operator_fails_closed() {
        let p = policy("weird", "role", "~=", "admin");
        let check = run(&p, &user("a").with("role", "admin"));
        assert!(!check.passed);
        assert_eq!(check.reason, Some(FailureReason::UnsupportedOperator));
        assert_eq!(check.note.as_deref(), Some("unsupported operator ~="));
        assert_eq!(check.operator.as_str(), "~=");
    }

    #[test]
    fn unsupported_operator_wins_over_missing_field() {
        let p = policy("weird", "nope", "~=", 1);
        let check = run(&p, &user("a"));
        assert_eq!(check.reason, Some(FailureReason::UnsupportedOperator));
    }

    #[test]
    fn equality_is_type_aware() {
        let eq = |a: Value, b: Value| compare(&Operator::Eq, &a, &b).passed;
        assert!(eq(Value::Number(18.0), Value::Number(18.0)));
        assert!(eq(Value::Bool(true), Value::Bool(true)));
        assert!(!eq(Value::from("Admin"), Value::from("admin")));
        // differing types fall back to string form
        assert!(eq(Value::Number(18.0), Value::from("18")));
        assert!(eq(Value::Bool(true), Value::from("true")));
        assert!(!eq(Value::Number(18.0), Value::from("18.0")));
        assert!(!eq(Value::Number(1.0), Value::Bool(true)));
        // lists compare element-wise with the same rules
        assert!(eq(
            Value::from(vec![Value::Number(1.0), Value::from("a")]),
            Value::from(vec![Value::from("1"), Value::from("a")])
        ));
    }

    #[test]
    fn inequality_negates_equality() {
        let p = policy("not-guest", "role", "!=", "guest");
        assert!(run(&p, &user("a").with("role", "admin")).passed);
        assert!(!run(&p, &user("g").with("role", "guest")).passed);
    }

    #[test]
    fn ordering_accepts_numeric_text_on_either_side() {
        let p = policy("logins", "login_count", ">", "10");
        assert!(run(&p, &user("a").with("login_count", 11)).passed);
        assert!(run(&p, &user("b").with("login_count", " 12 ")).passed);
        assert!(!run(&p, &user("c").with("login_count", 10)).passed);

        let p = policy("income", "income", "<=", 5000.5);
        assert!(run(&p, &user("d").with("income", 5000.5)).passed);
        assert!(!run(&p, &user("e").with("income", 5000.51)).passed);
    }

    #[test]
    fn ordering_on_non_numeric_values_is_a_type_mismatch() {
        let p = policy("age-min", "age", ">=", 18);
        let check = run(&p, &user("a").with("age", "seventeen"));
        assert!(!check.passed);
        assert_eq!(check.reason, Some(FailureReason::TypeMismatch));

        let check = run(&p, &user("b").with("age", true));
        assert_eq!(check.reason, Some(FailureReason::TypeMismatch));

        let p = policy("age-min", "age", "<", "adult");
        let check = run(&p, &user("c").with("age", 30));
        assert_eq!(check.reason, Some(FailureReason::TypeMismatch));
    }

    #[test]
    fn membership_requires_a_list_operand() {
        let p = policy("roles", "role", "in", "admin");
        let check = run(&p, &user("a").with("role", "admin"));
        assert!(!check.passed);
        assert_eq!(check.reason, Some(FailureReason::MembershipShape));
    }

    #[test]
    fn membership_uses_type_aware_equality() {
        let p = policy("tiers", "tier", "in", vec!["1", "2"]);
        assert!(run(&p, &user("a").with("tier", 2)).passed);
        assert!(!run(&p, &user("b").with("tier", 3)).passed);
    }

    #[test]
    fn includes_on_lists_and_other_types() {
        let p = policy("groups", "groups", "includes", "ops");
        assert!(run(&p, &user("a").with("groups", vec!["dev", "ops"])).passed);
        assert!(!run(&p, &user("b").with("groups", vec!["dev"])).passed);

        let check = run(&p, &user("c").with("groups", 5));
        assert!(!check.passed);
        assert_eq!(check.reason, Some(FailureReason::TypeMismatch));

        let p = policy("digits", "phone", "includes", 555);
        assert!(run(&p, &user("d").with("phone", "+1-555-0100")).passed);
    }

    #[test]
    fn missing_field_fails_every_operator_under_fail_rule() {
        let bare = user("nobody");
        for op in Operator::SUPPORTED {
            let p = policy("p", "age", op.as_str(), 18);
            let check = evaluate_condition(&p, &bare, AbsentFieldRule::Fail);
            assert!(!check.passed, "{op} passed on a missing field");
            assert_eq!(check.reason, Some(FailureReason::MissingField));
            assert_eq!(check.actual, Value::Null);
        }
    }

    #[test]
    fn missing_field_passes_only_not_equal_under_not_equal_rule() {
        let bare = user("nobody");
        for op in Operator::SUPPORTED {
            let p = policy("p", "age", op.as_str(), 18);
            let check = evaluate_condition(&p, &bare, AbsentFieldRule::NotEqual);
            if op == Operator::Ne {
                assert!(check.passed);
                assert_eq!(check.reason, None);
            } else {
                assert!(!check.passed, "{op} passed on a missing field");
                assert_eq!(check.reason, Some(FailureReason::MissingField));
            }
            assert_eq!(check.actual, Value::Null);
        }
    }

    #[test]
    fn explicit_null_is_treated_as_missing() {
        let p = policy("mfa", "mfa_enabled", "==", true);
        let check = run(&p, &user("a").with("mfa_enabled", Value::Null));
        assert_eq!(check.reason, Some(FailureReason::MissingField));
    }

    #[test]
    fn username_is_addressable_as_a_field() {
        let p = policy("svc", "username", "includes", "svc-");
        assert!(run(&p, &user("svc-backup")).passed);
    }
}
