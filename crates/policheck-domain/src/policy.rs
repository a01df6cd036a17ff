/// How `!=` treats a field that is absent from the record.
///
/// Every other operator fails on an absent field regardless of this rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AbsentFieldRule {
    /// Absence fails every operator, `!=` included.
    #[default]
    Fail,
    /// Absence counts as "not equal", so `!=` passes.
    NotEqual,
}

impl AbsentFieldRule {
    pub fn as_str(self) -> &'static str {
        match self {
            AbsentFieldRule::Fail => "fail",
            AbsentFieldRule::NotEqual => "not_equal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    /// Any non-compliant user fails the run.
    NonCompliant,
    /// Non-compliant users only downgrade the verdict to a warning.
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub profile: String,
    pub absent_field: AbsentFieldRule,
    pub fail_on: FailOn,
    /// Fan out over users (and policies) on the rayon pool.
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            absent_field: AbsentFieldRule::Fail,
            fail_on: FailOn::NonCompliant,
            parallel: true,
        }
    }
}
