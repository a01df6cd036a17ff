use crate::ids;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator carried by a policy.
///
/// Unknown operator text is kept verbatim in `Unsupported` so the evaluator can fail
/// the affected check closed instead of rejecting the whole policy set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    Includes,
    Unsupported(String),
}

impl Operator {
    /// Every supported operator, in the order they are presented to authors.
    pub const SUPPORTED: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::Gt,
        Operator::Lt,
        Operator::In,
        Operator::Includes,
    ];

    /// Parse operator text. Never fails: unknown text maps to `Unsupported`.
    pub fn parse(text: &str) -> Operator {
        match text {
            ids::OP_EQ => Operator::Eq,
            ids::OP_NE => Operator::Ne,
            ids::OP_GT => Operator::Gt,
            ids::OP_GE => Operator::Ge,
            ids::OP_LT => Operator::Lt,
            ids::OP_LE => Operator::Le,
            ids::OP_IN => Operator::In,
            ids::OP_INCLUDES => Operator::Includes,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => ids::OP_EQ,
            Operator::Ne => ids::OP_NE,
            Operator::Gt => ids::OP_GT,
            Operator::Ge => ids::OP_GE,
            Operator::Lt => ids::OP_LT,
            Operator::Le => ids::OP_LE,
            Operator::In => ids::OP_IN,
            Operator::Includes => ids::OP_INCLUDES,
            Operator::Unsupported(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Operator::Unsupported(_))
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le
        )
    }
}

impl From<String> for Operator {
    fn from(value: String) -> Self {
        Operator::parse(&value)
    }
}

impl From<&str> for Operator {
    fn from(value: &str) -> Self {
        Operator::parse(value)
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Unsupported(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
