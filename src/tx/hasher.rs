//! Transaction Hashing
//!
//! Keccak-256, the digest the EVM family signs and indexes
//! transactions by.

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 digest
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Digest of an unsigned envelope (`type ‖ rlp(fields)`)
pub fn signing_hash(unsigned_envelope: &[u8]) -> [u8; 32] {
    keccak256(unsigned_envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak_known_input() {
        assert_eq!(
            hex::encode(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }
}
