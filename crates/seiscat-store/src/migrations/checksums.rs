//! Checksum of migration SQL, recorded when a migration is applied

use sha2::{Digest, Sha256};

/// Compute the hex SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_length_and_determinism() {
        let a = compute_checksum("CREATE TABLE events (evid INTEGER)");
        let b = compute_checksum("CREATE TABLE events (evid INTEGER)");
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        assert_ne!(a, compute_checksum("CREATE TABLE phases (phid INTEGER)"));
    }
}
