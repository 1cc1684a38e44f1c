use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of a byte slice, returning a lowercase hex string.
///
/// Used to turn request paths into stable cache keys; not a checksum/signature
/// verification facility.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_hash() {
        assert_eq!(sha256_bytes(b"hello"), sha256_bytes(b"hello"));
    }

    #[test]
    fn different_input_different_hash() {
        assert_ne!(sha256_bytes(b"hello"), sha256_bytes(b"world"));
    }
}
