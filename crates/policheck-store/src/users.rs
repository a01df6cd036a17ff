use crate::error::StoreError;
use crate::policies::collapse_by_key;
use crate::ImportSummary;
use policheck_types::UserRecord;
use std::collections::BTreeSet;

pub fn validate_user(user: &UserRecord) -> Result<(), StoreError> {
    if user.username.trim().is_empty() {
        return Err(StoreError::MissingUsername);
    }
    Ok(())
}

/// Ordered user collection keyed by `username`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserStore {
    users: Vec<UserRecord>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a loaded snapshot, rejecting blank or repeated usernames.
    pub fn from_snapshot(users: Vec<UserRecord>) -> Result<Self, StoreError> {
        let mut seen = BTreeSet::new();
        for user in &users {
            validate_user(user)?;
            if !seen.insert(user.username.as_str()) {
                return Err(StoreError::DuplicateUsername(user.username.clone()));
            }
        }
        Ok(Self { users })
    }

    pub fn all(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn into_inner(self) -> Vec<UserRecord> {
        self.users
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.users.iter().position(|u| u.username == username)
    }

    pub fn insert(&mut self, user: UserRecord) -> Result<(), StoreError> {
        validate_user(&user)?;
        if self.position(&user.username).is_some() {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        self.users.push(user);
        Ok(())
    }

    pub fn upsert(&mut self, user: UserRecord) -> Result<(), StoreError> {
        validate_user(&user)?;
        match self.position(&user.username) {
            Some(idx) => self.users[idx] = user,
            None => self.users.push(user),
        }
        Ok(())
    }

    pub fn update(&mut self, username: &str, user: UserRecord) -> Result<(), StoreError> {
        let idx = self
            .position(username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))?;
        if user.username != username {
            return Err(StoreError::ImmutableUsername {
                from: username.to_string(),
                to: user.username,
            });
        }
        self.users[idx] = user;
        Ok(())
    }

    pub fn delete(&mut self, username: &str) -> Result<UserRecord, StoreError> {
        let idx = self
            .position(username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))?;
        Ok(self.users.remove(idx))
    }

    pub fn clear(&mut self) {
        self.users.clear();
    }

    /// Validate every incoming record, then merge by username (or replace, with `clear`).
    pub fn import(
        &mut self,
        incoming: Vec<UserRecord>,
        clear: bool,
    ) -> Result<ImportSummary, StoreError> {
        for user in &incoming {
            validate_user(user)?;
        }

        let batch = collapse_by_key(incoming, |u| u.username.clone());
        if clear {
            self.clear();
        }
        let stored = batch.len();
        for user in batch {
            match self.position(&user.username) {
                Some(idx) => self.users[idx] = user,
                None => self.users.push(user),
            }
        }

        tracing::info!(stored, cleared = clear, total = self.len(), "imported users");
        Ok(ImportSummary {
            stored,
            cleared: clear,
        })
    }
}
