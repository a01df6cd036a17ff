//! The `import` use case: merge (or replace) an uploaded file into a snapshot.

use anyhow::Context;
use camino::Utf8Path;
use policheck_store::{
    ImportSummary, PolicyStore, UserStore, import, load_policies, load_users, save_policies,
    save_users,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportTarget {
    Policies,
    Users,
}

#[derive(Clone, Debug)]
pub struct ImportInput<'a> {
    pub target: ImportTarget,
    /// Uploaded `.json` or `.csv` file.
    pub file: &'a Utf8Path,
    /// Snapshot to merge into; created when missing.
    pub store: &'a Utf8Path,
    /// Replace the whole collection instead of merging.
    pub clear: bool,
}

pub fn run_import(input: ImportInput<'_>) -> anyhow::Result<ImportSummary> {
    match input.target {
        ImportTarget::Policies => {
            let incoming = import::read_policies(input.file)
                .with_context(|| format!("read policies: {}", input.file))?;
            let existing =
                load_policies(input.store).with_context(|| format!("load {}", input.store))?;
            let mut store = PolicyStore::from_snapshot(existing)
                .with_context(|| format!("load {}", input.store))?;
            let summary = store.import(incoming, input.clear).context("import policies")?;
            save_policies(input.store, store.all())
                .with_context(|| format!("save {}", input.store))?;
            Ok(summary)
        }
        ImportTarget::Users => {
            let incoming = import::read_users(input.file)
                .with_context(|| format!("read users: {}", input.file))?;
            let existing =
                load_users(input.store).with_context(|| format!("load {}", input.store))?;
            let mut store = UserStore::from_snapshot(existing)
                .with_context(|| format!("load {}", input.store))?;
            let summary = store.import(incoming, input.clear).context("import users")?;
            save_users(input.store, store.all()).with_context(|| format!("save {}", input.store))?;
            Ok(summary)
        }
    }
}
