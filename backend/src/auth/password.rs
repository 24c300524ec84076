use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password for storage. One-way.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a plaintext password against a stored hash. Any bcrypt error counts
/// as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    verify(password, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn test_garbage_hash_counts_as_mismatch() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Salted, so two hashes of the same input differ but both verify.
        let first = bcrypt::hash("same-password", 4).unwrap();
        let second = bcrypt::hash("same-password", 4).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same-password", &first));
        assert!(verify_password("same-password", &second));
    }
}
