//! Typed (0x02) Transaction Module
//!
//! Canonicalizes a transaction intent, serializes the typed envelope,
//! hashes it with Keccak-256 and signs it over secp256k1.
//!
//! Reference: https://eips.ethereum.org/EIPS/eip-1559
//!
//! # Example
//!
//! ```rust,ignore
//! use typed_tx_signer::config::SignerSettings;
//! use typed_tx_signer::tx::{sign_transaction, Address, PrivateKey, TransactionIntent};
//! use typed_tx_signer::utils::units::{parse_ether, parse_gwei};
//!
//! let intent = TransactionIntent::builder()
//!     .chain_id(1)
//!     .nonce(0)
//!     .max_priority_fee_per_gas(parse_gwei("2")?)
//!     .max_fee_per_gas(parse_gwei("50")?)
//!     .gas_limit(21_000)
//!     .to(Address::from_hex("0x3535353535353535353535353535353535353535")?)
//!     .value(parse_ether("1")?)
//!     .build()?;
//!
//! let key = PrivateKey::from_slice(&key_bytes)?;
//! let signed = sign_transaction(intent, &key, &SignerSettings::standard())?;
//! println!("{}", signed.to_raw_hex());
//! ```

pub mod types;
pub mod canonical;
pub mod envelope;
pub mod hasher;
pub mod signature;
pub mod signer;
pub mod pipeline;


pub use types::*;
pub use envelope::{decode_signed, decode_unsigned, encode_signed, encode_unsigned};
pub use hasher::{keccak256, signing_hash};
pub use signature::Signature;
pub use signer::{address_of, recover_signer, sign_digest, PrivateKey};
pub use pipeline::{sign_transaction, Canonicalized, Hashed, SignedTransaction, UnsignedEnvelope};
