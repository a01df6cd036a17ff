//! Explain registry for failure reasons and operators.
//!
//! Maps reason codes and operator tokens to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a reason code or operator.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the reason/operator.
    pub title: &'static str,
    /// What it means and when it applies.
    pub description: &'static str,
    /// How to fix failing checks.
    pub remediation: &'static str,
    /// Before/after policy examples.
    pub examples: ExamplePair,
}

/// Before and after policy examples (JSON).
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// A policy or record that produces the failure.
    pub before: &'static str,
    /// The corrected form.
    pub after: &'static str,
}

/// Look up an explanation by reason code or operator token.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Reason codes
        ids::CODE_MISSING_FIELD => Some(explain_missing_field()),
        ids::CODE_UNSUPPORTED_OPERATOR => Some(explain_unsupported_operator()),
        ids::CODE_TYPE_MISMATCH => Some(explain_type_mismatch()),
        ids::CODE_MEMBERSHIP_SHAPE => Some(explain_membership_shape()),

        // Operators
        ids::OP_EQ | ids::OP_NE => Some(explain_equality()),
        ids::OP_GT | ids::OP_GE | ids::OP_LT | ids::OP_LE => Some(explain_ordering()),
        ids::OP_IN => Some(explain_in()),
        ids::OP_INCLUDES => Some(explain_includes()),

        _ => None,
    }
}

/// List all known reason codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MISSING_FIELD,
        ids::CODE_UNSUPPORTED_OPERATOR,
        ids::CODE_TYPE_MISMATCH,
        ids::CODE_MEMBERSHIP_SHAPE,
    ]
}

/// List all supported operator tokens.
pub fn all_operators() -> &'static [&'static str] {
    &[
        ids::OP_EQ,
        ids::OP_NE,
        ids::OP_GE,
        ids::OP_LE,
        ids::OP_GT,
        ids::OP_LT,
        ids::OP_IN,
        ids::OP_INCLUDES,
    ]
}

// --- Reason explanations ---

fn explain_missing_field() -> Explanation {
    Explanation {
        title: "Missing Field",
        description: "\
The user record has no value at the field the policy inspects. Records are
dynamically shaped, so a field can be absent from some users and present on others.
An explicit `null` counts as absent.

Absence fails every operator. Under the `lenient` profile (or `absent_field = \"not_equal\"`)
the `!=` operator treats absence as \"not equal\" and passes instead.",
        remediation: "\
Either populate the field for the affected users, or point the policy at a field that
every record carries. Re-import users with the column present if they came from CSV.",
        examples: ExamplePair {
            before: r#"{"username": "alice"}"#,
            after: r#"{"username": "alice", "mfa_enabled": true}"#,
        },
    }
}

fn explain_unsupported_operator() -> Explanation {
    Explanation {
        title: "Unsupported Operator",
        description: "\
The policy carries an operator outside the supported set
(==, !=, >=, <=, >, <, in, includes). The check fails closed for every user;
other policies in the same run are evaluated normally.",
        remediation: "\
Replace the operator with one of the supported tokens. Operators are case-sensitive and
must not carry surrounding whitespace.",
        examples: ExamplePair {
            before: r#"{"policy_id": "role", "field": "role", "operator": "~=", "value": "admin"}"#,
            after: r#"{"policy_id": "role", "field": "role", "operator": "==", "value": "admin"}"#,
        },
    }
}

fn explain_type_mismatch() -> Explanation {
    Explanation {
        title: "Type Mismatch",
        description: "\
An ordering operator (>, >=, <, <=) met a value that cannot be read as a number, or
`includes` was applied to a field that is neither a list nor text. Numeric text such as
\"42\" is accepted; booleans and lists are never numeric.",
        remediation: "\
Store numeric attributes as numbers (or numeric text), and use `==`/`in` for
non-numeric fields.",
        examples: ExamplePair {
            before: r#"{"policy_id": "age-min", "field": "age", "operator": ">=", "value": "adult"}"#,
            after: r#"{"policy_id": "age-min", "field": "age", "operator": ">=", "value": 18}"#,
        },
    }
}

fn explain_membership_shape() -> Explanation {
    Explanation {
        title: "Membership Operand Is Not A List",
        description: "\
An `in` policy must compare against an ordered list of values. The stored operand is a
scalar, so the check fails closed.",
        remediation: "\
Author the value as a bracketed list (`[\"admin\", \"devops\"]`) or comma-separated text
(`admin, devops`); both are coerced to a list for `in`.",
        examples: ExamplePair {
            before: r#"{"policy_id": "roles", "field": "role", "operator": "in", "value": "admin"}"#,
            after: r#"{"policy_id": "roles", "field": "role", "operator": "in", "value": ["admin", "devops"]}"#,
        },
    }
}

// --- Operator explanations ---

fn explain_equality() -> Explanation {
    Explanation {
        title: "Equality (== and !=)",
        description: "\
Compares the record value with the operand. Numbers compare numerically, booleans as
booleans, text exactly. When the two sides have different types, their text forms are
compared, so 18 equals \"18\". `!=` is the exact negation of `==`.",
        remediation: "\
Make sure the operand's type matches how the attribute is stored when exact matching
matters (for example `true` vs \"yes\").",
        examples: ExamplePair {
            before: r#"{"policy_id": "mfa", "field": "mfa_enabled", "operator": "==", "value": "yes"}"#,
            after: r#"{"policy_id": "mfa", "field": "mfa_enabled", "operator": "==", "value": true}"#,
        },
    }
}

fn explain_ordering() -> Explanation {
    Explanation {
        title: "Ordering (>, >=, <, <=)",
        description: "\
Both sides are read as numbers; numeric text is accepted. If either side is not
numeric the check fails with `type_mismatch`.",
        remediation: "Use a numeric operand and numeric record attributes.",
        examples: ExamplePair {
            before: r#"{"policy_id": "logins", "field": "login_count", "operator": ">", "value": "many"}"#,
            after: r#"{"policy_id": "logins", "field": "login_count", "operator": ">", "value": 10}"#,
        },
    }
}

fn explain_in() -> Explanation {
    Explanation {
        title: "Membership (in)",
        description: "\
Passes when the record value equals any element of the operand list, using the same
equality as `==`.",
        remediation: "Author the operand as a list.",
        examples: ExamplePair {
            before: r#"{"policy_id": "roles", "field": "role", "operator": "in", "value": "admin,devops"}"#,
            after: r#"{"policy_id": "roles", "field": "role", "operator": "in", "value": ["admin", "devops"]}"#,
        },
    }
}

fn explain_includes() -> Explanation {
    Explanation {
        title: "Containment (includes)",
        description: "\
If the record value is a list, passes when any element equals the operand. If it is
text, passes when it contains the operand's text form as a substring. Any other record
type fails with `type_mismatch`.",
        remediation: "Apply `includes` to list or text attributes only.",
        examples: ExamplePair {
            before: r#"{"policy_id": "corp-mail", "field": "age", "operator": "includes", "value": "@acme.com"}"#,
            after: r#"{"policy_id": "corp-mail", "field": "email", "operator": "includes", "value": "@acme.com"}"#,
        },
    }
}
