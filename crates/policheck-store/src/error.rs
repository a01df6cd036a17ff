//! Store error types

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("policy_id must not be empty")]
    EmptyPolicyId,

    #[error("policy {policy_id}: field must not be empty")]
    EmptyField { policy_id: String },

    #[error("duplicate policy_id: {0}")]
    DuplicatePolicyId(String),

    #[error("policy_id is immutable: cannot change {from} to {to}")]
    ImmutablePolicyId { from: String, to: String },

    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("policy {policy_id}: unsupported operator '{operator}'")]
    UnsupportedOperator { policy_id: String, operator: String },

    #[error("policy {policy_id}: operator 'in' requires a list value")]
    MembershipShape { policy_id: String },

    #[error("user record is missing a username")]
    MissingUsername,

    #[error("duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("username is immutable: cannot change {from} to {to}")]
    ImmutableUsername { from: String, to: String },

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unsupported file type for {0}; use .json or .csv")]
    UnsupportedFormat(Utf8PathBuf),

    #[error("record {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(index: usize, message: impl Into<String>) -> Self {
        StoreError::InvalidRecord {
            index,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_record() {
        let err = StoreError::UnsupportedOperator {
            policy_id: "weird".to_string(),
            operator: "~=".to_string(),
        };
        assert_eq!(err.to_string(), "policy weird: unsupported operator '~='");

        let err = StoreError::ImmutablePolicyId {
            from: "a".to_string(),
            to: "b".to_string(),
        };
        assert!(err.to_string().contains("cannot change a to b"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = StoreError::io(
            "data/users.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("data/users.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
