//! Digest Signing
//!
//! ECDSA over secp256k1 with RFC 6979 deterministic nonces. Optional
//! supplementary entropy is mixed into nonce generation through
//! libsecp256k1's `noncedata`; the output is a valid signature either way.
//!
//! SECURITY: key bytes live in zeroizing buffers and the parsed
//! `SecretKey` is erased when the signing scope ends, on success and on
//! every error path.

use std::fmt;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::hasher::keccak256;
use super::signature::Signature;
use super::types::Address;
use crate::error::SigningError;

/// A 32-byte secp256k1 private key, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Accept raw key bytes from the key-derivation collaborator
    ///
    /// Rejects wrong lengths and scalars outside `[1, n)`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SigningError> {
        if bytes.len() != 32 {
            return Err(SigningError::InvalidKeyLength(bytes.len()));
        }
        // Copy straight into the zeroizing wrapper, no loose stack array
        let mut key = Self([0u8; 32]);
        key.0.copy_from_slice(bytes);

        // Range check only; the parsed key is erased immediately
        ScopedSecretKey::new(&key)?;
        Ok(key)
    }

    /// Parse a `0x`-prefixed (or bare) hex key
    pub fn from_hex(s: &str) -> Result<Self, SigningError> {
        let trimmed = s.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(hex_part).map_err(|e| SigningError::InvalidKey(e.to_string()))?,
        );
        Self::from_slice(&bytes)
    }

    /// The account address controlled by this key
    pub fn address(&self) -> Result<Address, SigningError> {
        address_of(self)
    }

    pub(crate) fn expose(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Parsed secret key that is erased when the scope ends
struct ScopedSecretKey(SecretKey);

impl ScopedSecretKey {
    fn new(key: &PrivateKey) -> Result<Self, SigningError> {
        Ok(Self(SecretKey::from_slice(key.expose())?))
    }
}

impl Drop for ScopedSecretKey {
    fn drop(&mut self) {
        self.0.non_secure_erase();
    }
}

/// Sign a 32-byte digest
///
/// Without `extra_entropy` the result is fully deterministic for a given
/// digest and key. The returned signature is always in low-S form.
pub fn sign_digest(
    digest: &[u8; 32],
    key: &PrivateKey,
    extra_entropy: Option<&[u8; 32]>,
) -> Result<Signature, SigningError> {
    let secp = Secp256k1::signing_only();
    let secret = ScopedSecretKey::new(key)?;
    let message = Message::from_digest(*digest);

    let recoverable = match extra_entropy {
        Some(noncedata) => secp.sign_ecdsa_recoverable_with_noncedata(&message, &secret.0, noncedata),
        None => secp.sign_ecdsa_recoverable(&message, &secret.0),
    };

    let (recovery_id, compact) = recoverable.serialize_compact();
    let recovery_id = u8::try_from(recovery_id.to_i32())
        .map_err(|_| SigningError::InvalidRecoveryId(u8::MAX))?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    // Degenerate outputs are errors, never retried here
    Signature::from_raw(r, s, recovery_id)
}

/// Recover the address that produced `signature` over `digest`
pub fn recover_signer(digest: &[u8; 32], signature: &Signature) -> Result<Address, SigningError> {
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*digest);

    let recovery_id = RecoveryId::from_i32(signature.recovery_id() as i32)
        .map_err(|_| SigningError::InvalidRecoveryId(signature.recovery_id()))?;
    let recoverable = RecoverableSignature::from_compact(&signature.to_compact(), recovery_id)?;

    let public_key = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| SigningError::RecoveryFailed(e.to_string()))?;

    Ok(public_key_to_address(&public_key))
}

/// Address of the key: last 20 bytes of keccak(uncompressed pubkey)
pub fn address_of(key: &PrivateKey) -> Result<Address, SigningError> {
    let secp = Secp256k1::signing_only();
    let secret = ScopedSecretKey::new(key)?;
    let public_key = PublicKey::from_secret_key(&secp, &secret.0);
    Ok(public_key_to_address(&public_key))
}

fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::signature::is_low_s;

    fn test_key() -> PrivateKey {
        let mut key = [0u8; 32];
        key[31] = 1;
        PrivateKey::from_slice(&key).unwrap()
    }

    #[test]
    fn test_address_of_key_one() {
        // Generator point address
        assert_eq!(
            test_key().address().unwrap(),
            Address::from_hex("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap()
        );
    }

    #[test]
    fn test_sign_and_recover() {
        let digest = keccak256(b"typed transaction");
        let sig = sign_digest(&digest, &test_key(), None).unwrap();

        assert!(sig.recovery_id() <= 1);
        assert!(is_low_s(sig.s()));
        assert_eq!(recover_signer(&digest, &sig).unwrap(), test_key().address().unwrap());
    }

    #[test]
    fn test_sign_is_deterministic() {
        let digest = keccak256(b"same message");
        let a = sign_digest(&digest, &test_key(), None).unwrap();
        let b = sign_digest(&digest, &test_key(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extra_entropy_changes_nonce_not_validity() {
        let digest = keccak256(b"hardened");
        let plain = sign_digest(&digest, &test_key(), None).unwrap();
        let mixed = sign_digest(&digest, &test_key(), Some(&[0x42; 32])).unwrap();

        assert_ne!(plain.r(), mixed.r());
        assert_eq!(recover_signer(&digest, &mixed).unwrap(), test_key().address().unwrap());

        // Same entropy, same signature
        let again = sign_digest(&digest, &test_key(), Some(&[0x42; 32])).unwrap();
        assert_eq!(mixed, again);
    }

    #[test]
    fn test_key_length_rejected() {
        assert_eq!(
            PrivateKey::from_slice(&[1u8; 31]).err(),
            Some(SigningError::InvalidKeyLength(31))
        );
        assert_eq!(
            PrivateKey::from_slice(&[1u8; 33]).err(),
            Some(SigningError::InvalidKeyLength(33))
        );
    }

    #[test]
    fn test_key_range_rejected() {
        assert!(matches!(
            PrivateKey::from_slice(&[0u8; 32]),
            Err(SigningError::InvalidKey(_))
        ));
        assert!(matches!(
            PrivateKey::from_slice(&[0xff; 32]),
            Err(SigningError::InvalidKey(_))
        ));
        assert!(matches!(
            PrivateKey::from_slice(&secp256k1::constants::CURVE_ORDER),
            Err(SigningError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", test_key());
        assert_eq!(rendered, "PrivateKey([REDACTED])");
    }

    #[test]
    fn test_from_hex() {
        let key = PrivateKey::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(key.expose(), test_key().expose());
        assert!(PrivateKey::from_hex("0xzz").is_err());
    }

    #[test]
    fn test_key_bytes_are_wiped_by_zeroize() {
        let mut key = PrivateKey::from_slice(&[0x46; 32]).unwrap();
        assert_eq!(key.expose(), &[0x46; 32]);
        key.zeroize();
        assert_eq!(key.expose(), &[0u8; 32]);
    }
}
