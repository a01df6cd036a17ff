use crate::error::StoreError;
use crate::ImportSummary;
use policheck_types::{Operator, Policy, Value};
use std::collections::BTreeSet;

/// Partial edit applied by [`PolicyStore::patch`]. `None` leaves the stored value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolicyPatch {
    pub description: Option<String>,
    pub field: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<Value>,
}

/// Write-side rules for a policy.
///
/// The engine tolerates anything; the store only accepts policies an author could have meant.
pub fn validate_policy(policy: &Policy) -> Result<(), StoreError> {
    if policy.policy_id.trim().is_empty() {
        return Err(StoreError::EmptyPolicyId);
    }
    if policy.field.trim().is_empty() {
        return Err(StoreError::EmptyField {
            policy_id: policy.policy_id.clone(),
        });
    }
    if !policy.operator.is_supported() {
        return Err(StoreError::UnsupportedOperator {
            policy_id: policy.policy_id.clone(),
            operator: policy.operator.as_str().to_string(),
        });
    }
    if policy.operator == Operator::In && policy.value.as_list().is_none() {
        return Err(StoreError::MembershipShape {
            policy_id: policy.policy_id.clone(),
        });
    }
    Ok(())
}

/// Ordered policy collection keyed by `policy_id`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolicyStore {
    policies: Vec<Policy>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a loaded snapshot.
    ///
    /// Only identity is checked here: a snapshot may still carry a policy the evaluator
    /// will fail closed on.
    pub fn from_snapshot(policies: Vec<Policy>) -> Result<Self, StoreError> {
        let mut seen = BTreeSet::new();
        for policy in &policies {
            if policy.policy_id.trim().is_empty() {
                return Err(StoreError::EmptyPolicyId);
            }
            if !seen.insert(policy.policy_id.as_str()) {
                return Err(StoreError::DuplicatePolicyId(policy.policy_id.clone()));
            }
        }
        Ok(Self { policies })
    }

    pub fn all(&self) -> &[Policy] {
        &self.policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn into_inner(self) -> Vec<Policy> {
        self.policies
    }

    pub fn get(&self, policy_id: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.policy_id == policy_id)
    }

    fn position(&self, policy_id: &str) -> Option<usize> {
        self.policies.iter().position(|p| p.policy_id == policy_id)
    }

    pub fn insert(&mut self, policy: Policy) -> Result<(), StoreError> {
        validate_policy(&policy)?;
        if self.position(&policy.policy_id).is_some() {
            return Err(StoreError::DuplicatePolicyId(policy.policy_id));
        }
        self.policies.push(policy);
        Ok(())
    }

    /// Replace the policy with the same id in place, or append it.
    pub fn upsert(&mut self, policy: Policy) -> Result<(), StoreError> {
        validate_policy(&policy)?;
        match self.position(&policy.policy_id) {
            Some(idx) => self.policies[idx] = policy,
            None => self.policies.push(policy),
        }
        Ok(())
    }

    pub fn update(&mut self, policy_id: &str, policy: Policy) -> Result<(), StoreError> {
        let idx = self
            .position(policy_id)
            .ok_or_else(|| StoreError::UnknownPolicy(policy_id.to_string()))?;
        if policy.policy_id != policy_id {
            return Err(StoreError::ImmutablePolicyId {
                from: policy_id.to_string(),
                to: policy.policy_id,
            });
        }
        validate_policy(&policy)?;
        self.policies[idx] = policy;
        Ok(())
    }

    /// Merge `patch` into the stored policy and revalidate the result.
    pub fn patch(&mut self, policy_id: &str, patch: PolicyPatch) -> Result<&Policy, StoreError> {
        let idx = self
            .position(policy_id)
            .ok_or_else(|| StoreError::UnknownPolicy(policy_id.to_string()))?;

        let mut merged = self.policies[idx].clone();
        if let Some(description) = patch.description {
            merged.description = description;
        }
        if let Some(field) = patch.field {
            merged.field = field;
        }
        if let Some(operator) = patch.operator {
            merged.operator = operator;
        }
        if let Some(value) = patch.value {
            merged.value = value;
        }
        validate_policy(&merged)?;

        self.policies[idx] = merged;
        Ok(&self.policies[idx])
    }

    pub fn delete(&mut self, policy_id: &str) -> Result<Policy, StoreError> {
        let idx = self
            .position(policy_id)
            .ok_or_else(|| StoreError::UnknownPolicy(policy_id.to_string()))?;
        Ok(self.policies.remove(idx))
    }

    pub fn clear(&mut self) {
        self.policies.clear();
    }

    /// Validate every incoming policy, then merge (or replace, with `clear`).
    ///
    /// Nothing is written unless the whole batch is valid. Repeated ids within the batch
    /// collapse to the last occurrence.
    pub fn import(
        &mut self,
        incoming: Vec<Policy>,
        clear: bool,
    ) -> Result<ImportSummary, StoreError> {
        for policy in &incoming {
            validate_policy(policy)?;
        }

        let batch = collapse_by_key(incoming, |p| p.policy_id.clone());
        if clear {
            self.clear();
        }
        let stored = batch.len();
        for policy in batch {
            match self.position(&policy.policy_id) {
                Some(idx) => self.policies[idx] = policy,
                None => self.policies.push(policy),
            }
        }

        tracing::info!(stored, cleared = clear, total = self.len(), "imported policies");
        Ok(ImportSummary {
            stored,
            cleared: clear,
        })
    }
}

/// Keep the last record for each key, in first-seen order.
pub(crate) fn collapse_by_key<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let k = key(&item);
        match out.iter().position(|existing| key(existing) == k) {
            Some(idx) => {
                tracing::warn!(key = %k, "duplicate key in import batch; keeping the last one");
                out[idx] = item;
            }
            None => out.push(item),
        }
    }
    out
}
