//! Whole-collection snapshot files (`policies.json`, `users.json`).

use crate::error::StoreError;
use camino::Utf8Path;
use policheck_types::{Policy, UserRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn load_policies(path: &Utf8Path) -> Result<Vec<Policy>, StoreError> {
    load(path)
}

pub fn save_policies(path: &Utf8Path, policies: &[Policy]) -> Result<(), StoreError> {
    save(path, policies)
}

pub fn load_users(path: &Utf8Path) -> Result<Vec<UserRecord>, StoreError> {
    load(path)
}

pub fn save_users(path: &Utf8Path, users: &[UserRecord]) -> Result<(), StoreError> {
    save(path, users)
}

/// A missing file is an empty collection.
fn load<T: DeserializeOwned>(path: &Utf8Path) -> Result<Vec<T>, StoreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%path, "snapshot not found; starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let items: Vec<T> = serde_json::from_str(&text)?;
    tracing::debug!(%path, count = items.len(), "loaded snapshot");
    Ok(items)
}

fn save<T: Serialize>(path: &Utf8Path, items: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let mut text = serde_json::to_string_pretty(items)?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| StoreError::io(path, e))?;
    tracing::debug!(%path, count = items.len(), "saved snapshot");
    Ok(())
}
