//! Stable identifiers for operators and failure reason codes.
//!
//! `code` values are short snake_case discriminators that appear in reports and CSV exports.

// Operators
pub const OP_EQ: &str = "==";
pub const OP_NE: &str = "!=";
pub const OP_GT: &str = ">";
pub const OP_GE: &str = ">=";
pub const OP_LT: &str = "<";
pub const OP_LE: &str = "<=";
pub const OP_IN: &str = "in";
pub const OP_INCLUDES: &str = "includes";

// Failure reasons
pub const CODE_MISSING_FIELD: &str = "missing_field";
pub const CODE_UNSUPPORTED_OPERATOR: &str = "unsupported_operator";
pub const CODE_TYPE_MISMATCH: &str = "type_mismatch";
pub const CODE_MEMBERSHIP_SHAPE: &str = "membership_shape";

// Tool-level
pub const TOOL_NAME: &str = "policheck";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
