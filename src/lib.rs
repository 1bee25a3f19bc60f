//! Typed Transaction Signer
//!
//! Builds, serializes, hashes and signs typed (0x02, dynamic fee)
//! EVM transactions.
//!
//! # Architecture
//!
//! This crate provides:
//! - **rlp**: Recursive Length Prefix encoder and strict decoder
//! - **tx**: Field canonicalization, typed envelope, Keccak hashing,
//!   secp256k1 signing and the signing pipeline
//! - **config**: Signer settings and presets
//! - **collaborators**: Contracts for chain state and broadcasting
//! - **utils**: Redacting logger and denomination parsing
//!
//! # Security
//!
//! This crate uses `zeroize` to clear key material from memory. Private
//! keys and nonce entropy are zeroed when dropped, and the parsed
//! secp256k1 secret is erased when each signing call returns.
//!
//! # Example
//!
//! ```rust,ignore
//! use typed_tx_signer::{sign_transaction, PrivateKey, SignerSettings, TransactionIntent};
//!
//! let signed = sign_transaction(intent, &PrivateKey::from_slice(&key)?, &SignerSettings::standard())?;
//! let raw = signed.to_raw_hex(); // eth_sendRawTransaction parameter
//! ```

pub mod error;
pub mod rlp;
pub mod tx;
pub mod config;
pub mod collaborators;
pub mod utils;

// Re-export key types for convenience
pub use error::{ErrorCode, TxError, TxResult};
pub use config::{EntropyMode, SignerSettings};
pub use tx::{sign_transaction, Address, PrivateKey, Signature, SignedTransaction, TransactionIntent};
