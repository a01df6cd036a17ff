use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for one (user, policy) check.
///
/// Identity fields:
/// - username
/// - policy_id
pub fn fingerprint_for_check(username: &str, policy_id: &str) -> String {
    let canonical = [username, policy_id].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
