//! Unified error types for the typed-transaction codec
//!
//! Every stage of the pipeline fails with one of four categories:
//! validation (bad intent fields), encoding (RLP structure), signing
//! (key or signature problems) and network (collaborator-owned).
//! All of them are terminal for the invocation that produced them.

use serde::{Deserialize, Serialize};

/// Malformed intent fields, rejected before any hashing or signing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid storage key length: expected 32 bytes, got {0}")]
    InvalidStorageKeyLength(usize),

    #[error("Invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    #[error("Address checksum mismatch: {0}")]
    InvalidChecksum(String),

    #[error("Integer for {field} exceeds {max_bytes} bytes")]
    IntegerOverflow { field: &'static str, max_bytes: usize },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("maxPriorityFeePerGas ({priority}) exceeds maxFeePerGas ({max})")]
    PriorityFeeExceedsMaxFee { priority: u128, max: u128 },

    #[error("Unsupported transaction type: 0x{0:02x}")]
    UnsupportedTransactionType(u8),

    #[error("Expected {expected} envelope fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Calldata is {actual} bytes, limit is {limit}")]
    DataTooLarge { actual: usize, limit: usize },

    #[error("Invalid signer settings: {0}")]
    InvalidSettings(String),
}

/// RLP structural violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RlpError {
    #[error("Unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEnd { needed: usize, available: usize },

    #[error("{0} trailing bytes after RLP item")]
    TrailingBytes(usize),

    #[error("Single byte below 0x80 must be encoded as itself")]
    NonCanonicalSingleByte,

    #[error("Non-canonical length prefix")]
    NonCanonicalLength,

    #[error("Length does not fit in usize")]
    LengthOverflow,

    #[error("Integer has leading zero bytes")]
    NonCanonicalInteger,

    #[error("Expected an RLP list")]
    ExpectedList,

    #[error("Expected an RLP byte string")]
    ExpectedBytes,

    #[error("Nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

/// Key and signature failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("Invalid private key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Degenerate signature: {0} is zero")]
    DegenerateSignature(&'static str),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature s value is above half the curve order")]
    HighS,

    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("Public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("Recovered signer {recovered} does not match {expected}")]
    VerificationFailed { expected: String, recovered: String },
}

/// Failures reported by the RPC collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("Node unavailable: {0}")]
    Unavailable(String),

    #[error("Node rejected request: {0}")]
    Rejected(String),
}

/// Top-level error for pipeline operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RlpError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl TxError {
    /// Classify the error for callers that only need the category
    pub fn code(&self) -> ErrorCode {
        match self {
            TxError::Validation(ValidationError::InvalidAddressLength(_))
            | TxError::Validation(ValidationError::InvalidChecksum(_)) => ErrorCode::InvalidAddress,
            TxError::Validation(ValidationError::InvalidHex { .. }) => ErrorCode::HexError,
            TxError::Validation(_) => ErrorCode::InvalidTransaction,
            TxError::Encoding(_) => ErrorCode::EncodingError,
            TxError::Signing(SigningError::InvalidKeyLength(_))
            | TxError::Signing(SigningError::InvalidKey(_)) => ErrorCode::InvalidPrivateKey,
            TxError::Signing(SigningError::VerificationFailed { .. })
            | TxError::Signing(SigningError::RecoveryFailed(_)) => ErrorCode::VerificationFailed,
            TxError::Signing(_) => ErrorCode::SigningFailed,
            TxError::Network(NetworkError::Rejected(_)) => ErrorCode::TransactionRejected,
            TxError::Network(_) => ErrorCode::NetworkError,
        }
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidAddress,
    InvalidPrivateKey,
    InvalidTransaction,
    HexError,

    // Codec errors
    EncodingError,

    // Crypto errors
    SigningFailed,
    VerificationFailed,

    // Collaborator errors
    NetworkError,
    TransactionRejected,
}

/// Result type alias for pipeline operations
pub type TxResult<T> = Result<T, TxError>;

impl From<secp256k1::Error> for SigningError {
    fn from(e: secp256k1::Error) -> Self {
        match e {
            secp256k1::Error::InvalidSecretKey => SigningError::InvalidKey(e.to_string()),
            secp256k1::Error::InvalidRecoveryId => SigningError::InvalidRecoveryId(u8::MAX),
            _ => SigningError::InvalidSignature(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        let err = TxError::from(SigningError::InvalidKeyLength(31));
        assert_eq!(err.code(), ErrorCode::InvalidPrivateKey);

        let json = serde_json::to_string(&err.code()).unwrap();
        assert_eq!(json, "\"invalid_private_key\"");
    }

    #[test]
    fn test_display_includes_category() {
        let err = TxError::from(RlpError::NonCanonicalLength);
        assert_eq!(err.to_string(), "Encoding error: Non-canonical length prefix");
        assert_eq!(err.code(), ErrorCode::EncodingError);
    }

    #[test]
    fn test_validation_codes() {
        let addr = TxError::from(ValidationError::InvalidAddressLength(19));
        assert_eq!(addr.code(), ErrorCode::InvalidAddress);

        let missing = TxError::from(ValidationError::MissingField("nonce"));
        assert_eq!(missing.code(), ErrorCode::InvalidTransaction);
    }
}
