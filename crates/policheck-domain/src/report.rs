use policheck_types::{Bundle, Summary, Verdict};

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub summary: Summary,
    pub bundles: Vec<Bundle>,
}

impl Evaluation {
    /// Total number of checks across all bundles.
    pub fn check_count(&self) -> usize {
        self.bundles.iter().map(|b| b.checks.len()).sum()
    }
}

pub fn summarize(policy_count: usize, bundles: &[Bundle]) -> Summary {
    let mut summary = Summary {
        users_evaluated: count(bundles.len()),
        policies_evaluated: count(policy_count),
        ..Summary::default()
    };

    for bundle in bundles {
        if bundle.compliant {
            summary.users_compliant += 1;
        } else {
            summary.users_noncompliant += 1;
        }

        for check in &bundle.checks {
            summary.checks_total += 1;
            if check.passed {
                summary.checks_passed += 1;
                continue;
            }
            summary.checks_failed += 1;
            if let Some(reason) = check.reason {
                *summary
                    .failures_by_reason
                    .entry(reason.code().to_string())
                    .or_insert(0) += 1;
            }
        }
    }

    summary
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
