//! Rendering utilities for evaluation results (flat rows, CSV, Markdown).

#![forbid(unsafe_code)]

mod csv_export;
mod filter;
mod markdown;
mod model;

pub use csv_export::{CSV_COLUMNS, render_csv};
pub use filter::RowFilter;
pub use markdown::render_markdown;
pub use model::{CheckRow, flatten, policy_options, user_options};
