use crate::{ids, Operator, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Why a check failed when the failure comes from the data's shape rather than the comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The record has no value at the policy's field.
    MissingField,
    /// The policy's operator is outside the supported set.
    UnsupportedOperator,
    /// An ordering or containment operator met a value it cannot interpret.
    TypeMismatch,
    /// An `in` policy whose operand is not a list.
    MembershipShape,
}

impl FailureReason {
    pub const ALL: [FailureReason; 4] = [
        FailureReason::MissingField,
        FailureReason::UnsupportedOperator,
        FailureReason::TypeMismatch,
        FailureReason::MembershipShape,
    ];

    pub fn code(self) -> &'static str {
        match self {
            FailureReason::MissingField => ids::CODE_MISSING_FIELD,
            FailureReason::UnsupportedOperator => ids::CODE_UNSUPPORTED_OPERATOR,
            FailureReason::TypeMismatch => ids::CODE_TYPE_MISMATCH,
            FailureReason::MembershipShape => ids::CODE_MEMBERSHIP_SHAPE,
        }
    }
}

/// Result of evaluating one policy against one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Check {
    pub username: String,
    pub policy_id: String,
    #[serde(default)]
    pub description: String,
    pub field: String,

    #[schemars(with = "String")]
    pub operator: Operator,

    /// The policy operand, echoed.
    #[schemars(with = "JsonValue")]
    pub value: Value,

    /// The record's value at `field`; `null` when absent.
    #[serde(default)]
    #[schemars(with = "JsonValue")]
    pub actual: Value,

    pub passed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// All checks for a single user, in policy order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Bundle {
    pub username: String,
    /// True when every check passed.
    pub compliant: bool,
    pub checks: Vec<Check>,
}
