//! Signature Representation and Wire Encoding
//!
//! Holds (r, s, recoveryId) in canonical low-S form and maps it to the
//! typed-transaction trailer `[yParity, r, s]`.

use secp256k1::constants::CURVE_ORDER;

use super::canonical::{self, FieldWidth};
use crate::error::SigningError;
use crate::rlp::RlpItem;

/// floor(n / 2) for secp256k1
pub const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// ECDSA signature over secp256k1
///
/// Invariants: `0 < r < n`, `0 < s <= n/2`, `recovery_id ∈ {0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    recovery_id: u8,
}

impl Signature {
    /// Build a signature, checking every invariant
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Result<Self, SigningError> {
        if is_zero(&r) {
            return Err(SigningError::DegenerateSignature("r"));
        }
        if is_zero(&s) {
            return Err(SigningError::DegenerateSignature("s"));
        }
        // Fixed-width big-endian arrays compare numerically
        if r >= CURVE_ORDER {
            return Err(SigningError::InvalidSignature("r is not below the curve order".to_string()));
        }
        if s > HALF_CURVE_ORDER {
            return Err(SigningError::HighS);
        }
        if recovery_id > 1 {
            return Err(SigningError::InvalidRecoveryId(recovery_id));
        }
        Ok(Self { r, s, recovery_id })
    }

    /// Build from a raw signer output, normalizing to low-S first
    pub fn from_raw(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Result<Self, SigningError> {
        if recovery_id > 1 {
            return Err(SigningError::InvalidRecoveryId(recovery_id));
        }
        if s >= CURVE_ORDER {
            return Err(SigningError::InvalidSignature("s is not below the curve order".to_string()));
        }
        if !is_low_s(&s) {
            crate::log_warn!("tx::signature", "Normalizing high-S signature", recovery_id = recovery_id);
        }
        let (s, recovery_id) = normalize_low_s(s, recovery_id);
        Self::new(r, s, recovery_id)
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Typed transactions carry the recovery id directly
    pub fn y_parity(&self) -> u8 {
        self.recovery_id
    }

    /// Compact `r ‖ s` form
    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// `[yParity, r, s]` as canonical RLP leaves
    pub fn to_fields(&self) -> [RlpItem; 3] {
        encode_signature_fields(self)
    }
}

/// Map a signature to the typed-transaction trailer
///
/// yParity 0 becomes the empty string and 1 becomes `0x01`; r and s are
/// minimal big-endian integers.
pub fn encode_signature_fields(sig: &Signature) -> [RlpItem; 3] {
    [
        canonical::uint_u64(sig.recovery_id as u64),
        RlpItem::Bytes(canonical::trim_leading_zeros(&sig.r).to_vec()),
        RlpItem::Bytes(canonical::trim_leading_zeros(&sig.s).to_vec()),
    ]
}

/// Rebuild a signature from decoded trailer fields
pub fn decode_signature_fields(
    y_parity: &[u8],
    r: &[u8],
    s: &[u8],
) -> Result<Signature, SigningError> {
    let recovery_id = match y_parity {
        [] => 0,
        [1] => 1,
        [b] => return Err(SigningError::InvalidRecoveryId(*b)),
        _ => return Err(SigningError::InvalidRecoveryId(u8::MAX)),
    };
    Signature::new(
        left_pad_scalar(r, FieldWidth::Scalar)?,
        left_pad_scalar(s, FieldWidth::Scalar)?,
        recovery_id,
    )
}

/// Replace a high s with n - s and flip the recovery id
pub fn normalize_low_s(s: [u8; 32], recovery_id: u8) -> ([u8; 32], u8) {
    if s > HALF_CURVE_ORDER {
        (sub_be(&CURVE_ORDER, &s), 1 - recovery_id)
    } else {
        (s, recovery_id)
    }
}

pub fn is_low_s(s: &[u8; 32]) -> bool {
    *s <= HALF_CURVE_ORDER
}

fn is_zero(bytes: &[u8; 32]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// a - b for 256-bit big-endian values with a >= b
fn sub_be(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = a[i] as i16 - b[i] as i16 - borrow;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out[i] = diff as u8;
    }
    out
}

fn left_pad_scalar(bytes: &[u8], width: FieldWidth) -> Result<[u8; 32], SigningError> {
    if bytes.len() > width.bytes() {
        return Err(SigningError::InvalidSignature(format!(
            "{} is {} bytes",
            width.name(),
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
