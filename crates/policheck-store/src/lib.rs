//! Store adapters: policy and user collections, bulk import, snapshot files.
//!
//! This crate is allowed to do filesystem IO. Everything it hands to the engine has
//! already been normalized into the closed `Value` union.

#![forbid(unsafe_code)]

mod error;
pub mod import;
mod policies;
mod snapshot;
mod users;

use serde::{Deserialize, Serialize};

pub use error::StoreError;
pub use import::{ColumnKind, Format, infer_column_kind, parse_policies, parse_users};
pub use policies::{PolicyPatch, PolicyStore, validate_policy};
pub use snapshot::{load_policies, load_users, save_policies, save_users};
pub use users::{UserStore, validate_user};

/// Result of a bulk import, as printed by `policheck import`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub stored: usize,
    pub cleared: bool,
}
