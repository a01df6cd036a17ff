use crate::CheckRow;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Row selection by policy id and username.
///
/// An empty pattern list selects everything on that axis. Patterns are globs, so a plain
/// identifier matches exactly.
#[derive(Clone, Debug, Default)]
pub struct RowFilter {
    policies: Option<GlobSet>,
    users: Option<GlobSet>,
}

impl RowFilter {
    pub fn new(policies: &[String], users: &[String]) -> Result<Self, globset::Error> {
        Ok(Self {
            policies: build_set(policies)?,
            users: build_set(users)?,
        })
    }

    pub fn matches(&self, row: &CheckRow) -> bool {
        let ok = |set: &Option<GlobSet>, value: &str| set.as_ref().is_none_or(|s| s.is_match(value));
        ok(&self.policies, &row.policy_id) && ok(&self.users, &row.username)
    }

    pub fn apply(&self, rows: Vec<CheckRow>) -> Vec<CheckRow> {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>, globset::Error> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p)?);
    }
    builder.build().map(Some)
}
