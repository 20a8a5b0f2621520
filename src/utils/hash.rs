use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of a byte slice as lowercase hex.
#[must_use]
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Short content hash used for media asset ids.
///
/// The first 16 hex characters of the SHA-256 digest are enough to keep
/// asset filenames unique within one portfolio.
#[must_use]
pub fn short_hash(content: &[u8]) -> String {
    let full = compute_hash(content);
    full.get(..16).unwrap_or(&full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash(b"hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_hash_empty() {
        let hash = compute_hash(b"");
        // SHA-256 of empty input
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_compute_hash_deterministic() {
        assert_eq!(compute_hash(b"same bytes"), compute_hash(b"same bytes"));
    }

    #[test]
    fn test_short_hash_is_prefix() {
        let full = compute_hash(b"asset bytes");
        let short = short_hash(b"asset bytes");
        assert_eq!(short.len(), 16);
        assert!(full.starts_with(&short));
    }

    #[test]
    fn test_short_hash_differs_for_different_inputs() {
        assert_ne!(short_hash(b"one"), short_hash(b"two"));
    }
}
