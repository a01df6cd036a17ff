use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `policheck.toml` schema v1.
///
/// Every key is optional; unset keys fall back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicheckConfigV1 {
    /// Optional schema string for tooling (`policheck.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default), `audit`, or `lenient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// How `!=` treats an absent field: `fail` or `not_equal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absent_field: Option<String>,

    /// When non-compliant users fail the run: `noncompliant` or `never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}
