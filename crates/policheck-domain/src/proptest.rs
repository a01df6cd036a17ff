//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Check counts and ordering of the evaluation output
//! - Determinism across runs and across parallel/sequential execution
//! - Coercion and comparison never panicking on arbitrary input

use crate::coerce::coerce;
use crate::condition::compare;
use crate::engine::evaluate;
use crate::policy::{AbsentFieldRule, EvalConfig, FailOn};
use policheck_types::{Operator, Policy, UserRecord, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("age".to_string()),
        Just("role".to_string()),
        Just("groups".to_string()),
        Just("email".to_string()),
        Just("mfa_enabled".to_string()),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        "[a-z@.0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => arb_scalar(),
        1 => prop::collection::vec(arb_scalar(), 0..4).prop_map(Value::List),
    ]
}

/// Supported operators plus a few spellings that must fail closed.
fn arb_operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        8 => prop::sample::select(Operator::SUPPORTED.to_vec()),
        1 => prop_oneof![Just("~="), Just("=>"), Just(""), Just("IN")]
            .prop_map(Operator::parse),
    ]
}

fn arb_policy() -> impl Strategy<Value = Policy> {
    ("[a-z]{1,8}", arb_field(), arb_operator(), arb_value())
        .prop_map(|(id, field, op, value)| Policy::new(id, field, op, value))
}

fn arb_user() -> impl Strategy<Value = UserRecord> {
    (
        "[a-z]{1,8}",
        prop::collection::btree_map(arb_field(), arb_value(), 0..5),
    )
        .prop_map(|(name, attrs)| {
            attrs
                .into_iter()
                .fold(UserRecord::new(name), |u, (k, v)| u.with(&k, v))
        })
}

fn arb_absent_rule() -> impl Strategy<Value = AbsentFieldRule> {
    prop_oneof![Just(AbsentFieldRule::Fail), Just(AbsentFieldRule::NotEqual)]
}

fn config(absent_field: AbsentFieldRule, parallel: bool) -> EvalConfig {
    EvalConfig {
        profile: "prop".to_string(),
        absent_field,
        fail_on: FailOn::NonCompliant,
        parallel,
    }
}

// ============================================================================
// Evaluation invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_check_per_user_policy_pair(
        policies in prop::collection::vec(arb_policy(), 0..8),
        users in prop::collection::vec(arb_user(), 0..8),
        rule in arb_absent_rule(),
    ) {
        let eval = evaluate(&policies, &users, &config(rule, true));

        prop_assert_eq!(eval.bundles.len(), users.len());
        prop_assert_eq!(eval.check_count(), policies.len() * users.len());
        prop_assert_eq!(eval.summary.checks_total as usize, policies.len() * users.len());
        prop_assert_eq!(
            eval.summary.checks_passed + eval.summary.checks_failed,
            eval.summary.checks_total
        );

        for (bundle, user) in eval.bundles.iter().zip(&users) {
            prop_assert_eq!(&bundle.username, &user.username);
            prop_assert_eq!(bundle.compliant, bundle.checks.iter().all(|c| c.passed));
            for (check, policy) in bundle.checks.iter().zip(&policies) {
                prop_assert_eq!(&check.policy_id, &policy.policy_id);
                prop_assert_eq!(&check.operator, &policy.operator);
                if check.passed {
                    prop_assert!(check.reason.is_none());
                }
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic(
        policies in prop::collection::vec(arb_policy(), 0..6),
        users in prop::collection::vec(arb_user(), 0..6),
        rule in arb_absent_rule(),
    ) {
        let first = evaluate(&policies, &users, &config(rule, true));
        let second = evaluate(&policies, &users, &config(rule, true));
        let sequential = evaluate(&policies, &users, &config(rule, false));
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &sequential);
    }

    #[test]
    fn unsupported_operators_never_pass(
        raw in "[~^!<>=a-z]{0,3}",
        value in arb_value(),
        user in arb_user(),
        field in arb_field(),
    ) {
        let op = Operator::parse(&raw);
        prop_assume!(!op.is_supported());
        let policy = Policy::new("p", field, op, value);
        for rule in [AbsentFieldRule::Fail, AbsentFieldRule::NotEqual] {
            let eval = evaluate(
                std::slice::from_ref(&policy),
                std::slice::from_ref(&user),
                &config(rule, false),
            );
            prop_assert!(!eval.bundles[0].checks[0].passed);
        }
    }
}

// ============================================================================
// Comparison and coercion invariants
// ============================================================================

proptest! {
    #[test]
    fn not_equal_is_the_negation_of_equal(a in arb_value(), b in arb_value()) {
        let eq = compare(&Operator::Eq, &a, &b);
        let ne = compare(&Operator::Ne, &a, &b);
        prop_assert_eq!(eq.passed, !ne.passed);
        prop_assert!(eq.reason.is_none());
        prop_assert!(ne.reason.is_none());
    }

    #[test]
    fn equality_is_symmetric(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(
            compare(&Operator::Eq, &a, &b).passed,
            compare(&Operator::Eq, &b, &a).passed
        );
    }

    #[test]
    fn coerce_never_panics(raw in ".{0,40}", op in arb_operator()) {
        let _ = coerce(&raw, &op);
    }

    #[test]
    fn membership_coercion_always_yields_a_list(raw in ".{0,40}") {
        prop_assert!(matches!(coerce(&raw, &Operator::In), Value::List(_)));
    }

    #[test]
    fn integers_round_trip_through_coercion(n in -1_000_000i64..1_000_000) {
        prop_assert_eq!(coerce(&n.to_string(), &Operator::Eq), Value::Number(n as f64));
    }
}
