use crate::condition::evaluate_condition;
use crate::policy::{AbsentFieldRule, EvalConfig, FailOn};
use crate::report::{summarize, Evaluation};
use policheck_types::{Bundle, Check, Policy, Summary, UserRecord, Verdict};
use rayon::prelude::*;

/// Evaluate every policy against every user.
///
/// Output holds one bundle per user, in input order, each with one check per policy in
/// policy order. A malformed policy only fails its own checks.
pub fn evaluate(policies: &[Policy], users: &[UserRecord], cfg: &EvalConfig) -> Evaluation {
    // Indexed parallel collect keeps user order; nothing needs re-sorting afterwards.
    let bundles: Vec<Bundle> = if cfg.parallel {
        users
            .par_iter()
            .map(|user| bundle_for(user, policies, cfg.absent_field, true))
            .collect()
    } else {
        users
            .iter()
            .map(|user| bundle_for(user, policies, cfg.absent_field, false))
            .collect()
    };

    let summary = summarize(policies.len(), &bundles);
    let verdict = compute_verdict(&summary, cfg.fail_on);

    Evaluation {
        verdict,
        summary,
        bundles,
    }
}

/// Evaluate all policies, in order, against a single user.
pub fn evaluate_user(user: &UserRecord, policies: &[Policy], absent: AbsentFieldRule) -> Bundle {
    bundle_for(user, policies, absent, false)
}

fn bundle_for(
    user: &UserRecord,
    policies: &[Policy],
    absent: AbsentFieldRule,
    parallel: bool,
) -> Bundle {
    let checks: Vec<Check> = if parallel {
        policies
            .par_iter()
            .map(|policy| evaluate_condition(policy, user, absent))
            .collect()
    } else {
        policies
            .iter()
            .map(|policy| evaluate_condition(policy, user, absent))
            .collect()
    };

    Bundle {
        username: user.username.clone(),
        compliant: checks.iter().all(|c| c.passed),
        checks,
    }
}

fn compute_verdict(summary: &Summary, fail_on: FailOn) -> Verdict {
    if summary.users_noncompliant == 0 {
        return Verdict::Pass;
    }

    match fail_on {
        FailOn::NonCompliant => Verdict::Fail,
        FailOn::Never => Verdict::Warn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config, policy, sample_batch, user};
    use policheck_types::FailureReason;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn three_policies_by_two_users_yield_six_checks() {
        let (policies, users) = sample_batch();
        let eval = evaluate(&policies, &users, &config(AbsentFieldRule::Fail, true));

        assert_eq!(eval.bundles.len(), 2);
        assert_eq!(eval.check_count(), 6);
        for (bundle, user) in eval.bundles.iter().zip(&users) {
            assert_eq!(bundle.username, user.username);
            let ids: Vec<&str> = bundle.checks.iter().map(|c| c.policy_id.as_str()).collect();
            assert_eq!(ids, vec!["age-min", "roles", "weird"]);
            assert!(bundle.checks.iter().all(|c| c.username == user.username));
        }
        assert_eq!(eval.summary.checks_total, 6);
        assert_eq!(eval.summary.users_evaluated, 2);
        assert_eq!(eval.summary.policies_evaluated, 3);
    }

    #[test]
    fn malformed_policy_does_not_disturb_the_batch() {
        let (policies, users) = sample_batch();
        let eval = evaluate(&policies, &users, &config(AbsentFieldRule::Fail, false));

        let alice = &eval.bundles[0];
        assert!(!alice.checks[0].passed); // 17 < 18
        assert!(alice.checks[1].passed); // admin
        assert_eq!(alice.checks[2].reason, Some(FailureReason::UnsupportedOperator));

        let bob = &eval.bundles[1];
        assert!(bob.checks[0].passed);
        assert!(!bob.checks[1].passed);
        assert!(!bob.checks[2].passed);

        assert_eq!(eval.summary.failures_by_reason.get("unsupported_operator"), Some(&2));
        assert_eq!(eval.summary.checks_passed, 2);
        assert_eq!(eval.summary.checks_failed, 4);
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let (policies, users) = sample_batch();
        let cfg = config(AbsentFieldRule::Fail, true);
        let first = evaluate(&policies, &users, &cfg);
        let second = evaluate(&policies, &users, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let policies: Vec<Policy> = (0..40)
            .map(|i| policy(&format!("p{i}"), "score", ">=", i))
            .collect();
        let users: Vec<UserRecord> = (0..64)
            .map(|i| user(&format!("u{i}")).with("score", i))
            .collect();

        let par = evaluate(&policies, &users, &config(AbsentFieldRule::Fail, true));
        let seq = evaluate(&policies, &users, &config(AbsentFieldRule::Fail, false));
        assert_eq!(par, seq);
    }

    #[test]
    fn user_order_does_not_change_a_users_bundle() {
        let (policies, users) = sample_batch();
        let cfg = config(AbsentFieldRule::Fail, true);
        let baseline = evaluate(&policies, &users, &cfg);

        let mut shuffled = users.clone();
        shuffled.extend((0..10).map(|i| user(&format!("extra{i}")).with("age", i * 5)));
        shuffled.shuffle(&mut StdRng::seed_from_u64(7));

        let eval = evaluate(&policies, &shuffled, &cfg);
        for expected in &baseline.bundles {
            let got = eval
                .bundles
                .iter()
                .find(|b| b.username == expected.username)
                .expect("bundle present");
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn verdict_follows_fail_on() {
        let (policies, users) = sample_batch();
        let mut cfg = config(AbsentFieldRule::Fail, false);
        assert_eq!(evaluate(&policies, &users, &cfg).verdict, Verdict::Fail);

        cfg.fail_on = FailOn::Never;
        assert_eq!(evaluate(&policies, &users, &cfg).verdict, Verdict::Warn);

        let ok = vec![policy("age-min", "age", ">=", 18)];
        let adults = vec![user("bob").with("age", 21)];
        assert_eq!(evaluate(&ok, &adults, &cfg).verdict, Verdict::Pass);
    }

    #[test]
    fn empty_policy_set_leaves_every_user_compliant() {
        let users = vec![user("alice"), user("bob")];
        let eval = evaluate(&[], &users, &config(AbsentFieldRule::Fail, true));
        assert_eq!(eval.bundles.len(), 2);
        assert!(eval.bundles.iter().all(|b| b.compliant && b.checks.is_empty()));
        assert_eq!(eval.verdict, Verdict::Pass);
    }

    #[test]
    fn absent_field_rule_applies_uniformly_across_users() {
        let policies = vec![policy("not-guest", "role", "!=", "guest")];
        let users = vec![user("a"), user("b").with("role", "admin"), user("c")];

        let strict = evaluate(&policies, &users, &config(AbsentFieldRule::Fail, true));
        let passed: Vec<bool> = strict.bundles.iter().map(|b| b.checks[0].passed).collect();
        assert_eq!(passed, vec![false, true, false]);

        let lenient = evaluate(&policies, &users, &config(AbsentFieldRule::NotEqual, true));
        let passed: Vec<bool> = lenient.bundles.iter().map(|b| b.checks[0].passed).collect();
        assert_eq!(passed, vec![true, true, true]);
    }

    #[test]
    fn evaluate_user_matches_engine_bundle() {
        let (policies, users) = sample_batch();
        let eval = evaluate(&policies, &users, &config(AbsentFieldRule::Fail, true));
        assert_eq!(
            evaluate_user(&users[1], &policies, AbsentFieldRule::Fail),
            eval.bundles[1]
        );
    }
}
