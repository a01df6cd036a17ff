//! Use case orchestration for policheck.
//!
//! This crate provides the application layer: use cases that coordinate the domain, store,
//! settings and render layers. It is intentionally thin and delegates heavy lifting to them.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod coerce;
mod evaluate;
mod explain;
mod export;
mod import;
mod report;

pub use coerce::run_coerce;
pub use evaluate::{EvaluateInput, EvaluateOutput, run_evaluate, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use export::{ExportInput, run_export_csv, run_markdown};
pub use import::{ImportInput, ImportTarget, run_import};
pub use report::{parse_report_json, runtime_error_report, serialize_report};
