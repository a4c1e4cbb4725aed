//! Fingerprints that identify a secret without revealing it.

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 12;

pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Leading [`FINGERPRINT_LEN`] hex characters of the SHA-256 of `value`.
pub fn fingerprint(value: &str) -> String {
    let mut digest = sha256_hex(value.as_bytes());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn fingerprint_is_short_stable_prefix() {
        let short = fingerprint("hunter2");
        assert_eq!(short.len(), FINGERPRINT_LEN);
        assert!(sha256_hex(b"hunter2").starts_with(&short));
        assert_eq!(short, fingerprint("hunter2"));
        assert_ne!(short, fingerprint("Hunter2"));
    }
}
