//! Pure policy evaluation (no IO).
//!
//! Input: an ordered policy snapshot and a user snapshot, loaded elsewhere.
//! Output: one bundle of checks per user + verdict + summary counts.

#![forbid(unsafe_code)]

pub mod coerce;
pub mod condition;
pub mod fingerprint;
pub mod policy;
pub mod report;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use coerce::{coerce, parse_number};
pub use condition::{compare, evaluate_condition, loosely_equal, Outcome};
pub use engine::{evaluate, evaluate_user};
