//! Stable DTOs and IDs used across the policheck workspace.
//!
//! This crate is intentionally boring:
//! - the closed value union records and operands are normalized into
//! - policy, user record, check, and bundle shapes
//! - stable failure codes and the emitted report envelope
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod check;
pub mod explain;
pub mod ids;
pub mod operator;
pub mod record;
pub mod report;
pub mod value;

pub use check::{Bundle, Check, FailureReason};
pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use operator::Operator;
pub use record::{Policy, UserRecord};
pub use report::{
    EvaluationReport, RunError, RunMeta, Summary, ToolMeta, Verdict, SCHEMA_REPORT_V1,
};
pub use value::Value;
