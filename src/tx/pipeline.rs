//! Signing Pipeline
//!
//! `Intent → Canonicalized → UnsignedEnvelope → Hashed → SignedTransaction`.
//! Each stage consumes the previous one, so a stage can only be reached
//! through the stages before it and no stage is ever revisited.

use serde_json::{json, Value};

use super::canonical;
use super::envelope;
use super::hasher::{keccak256, signing_hash};
use super::signature::{encode_signature_fields, Signature};
use super::signer::{self, PrivateKey};
use super::types::{Address, TransactionIntent};
use crate::config::SignerSettings;
use crate::error::{RlpError, SigningError, TxResult, ValidationError};
use crate::rlp::RlpItem;

const LOG_MODULE: &str = "tx::pipeline";

impl TransactionIntent {
    /// Check the intent against `settings` and map it to wire fields
    pub fn canonicalize(self, settings: &SignerSettings) -> Result<Canonicalized, ValidationError> {
        if settings.enforce_fee_cap && self.max_priority_fee_per_gas > self.max_fee_per_gas {
            return Err(ValidationError::PriorityFeeExceedsMaxFee {
                priority: self.max_priority_fee_per_gas,
                max: self.max_fee_per_gas,
            });
        }
        if let Some(limit) = settings.max_data_bytes {
            if self.data.len() > limit {
                return Err(ValidationError::DataTooLarge {
                    actual: self.data.len(),
                    limit,
                });
            }
        }

        let fields = canonical::intent_fields(&self);
        crate::log_debug!(
            LOG_MODULE,
            "Intent canonicalized",
            chain_id = self.chain_id,
            nonce = self.nonce,
            data_len = self.data.len(),
        );

        Ok(Canonicalized {
            intent: self,
            fields,
        })
    }
}

/// Intent whose fields have been mapped to canonical RLP leaves
#[derive(Debug, Clone)]
pub struct Canonicalized {
    intent: TransactionIntent,
    fields: Vec<RlpItem>,
}

impl Canonicalized {
    pub fn fields(&self) -> &[RlpItem] {
        &self.fields
    }

    /// Serialize the unsigned envelope from the canonical fields
    pub fn into_envelope(self) -> UnsignedEnvelope {
        let Canonicalized { intent, fields } = self;
        let bytes = envelope::wrap(fields.clone());
        crate::log_debug!(LOG_MODULE, "Unsigned envelope built", envelope_len = bytes.len());
        UnsignedEnvelope {
            intent,
            fields,
            bytes,
        }
    }
}

/// `0x02 ‖ RLP(unsigned fields)`
#[derive(Debug, Clone)]
pub struct UnsignedEnvelope {
    intent: TransactionIntent,
    fields: Vec<RlpItem>,
    bytes: Vec<u8>,
}

impl UnsignedEnvelope {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }

    /// Compute the signing digest
    pub fn hash(self) -> Hashed {
        let digest = signing_hash(&self.bytes);
        crate::log_debug!(LOG_MODULE, "Signing hash computed", tx_hash = hex::encode(digest));
        Hashed {
            intent: self.intent,
            fields: self.fields,
            digest,
        }
    }
}

/// Unsigned envelope together with its Keccak-256 digest
#[derive(Debug, Clone)]
pub struct Hashed {
    intent: TransactionIntent,
    fields: Vec<RlpItem>,
    digest: [u8; 32],
}

impl Hashed {
    /// The transaction hash (digest of the unsigned envelope)
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Sign the digest with `key`
    ///
    /// Entropy comes from `settings.entropy`. With `verify_recovery` the
    /// sender is recovered from the fresh signature and must match the
    /// key's address.
    pub fn sign(self, key: &PrivateKey, settings: &SignerSettings) -> Result<SignedTransaction, SigningError> {
        let entropy = settings.entropy.resolve();
        let signature = signer::sign_digest(&self.digest, key, entropy.as_deref())?;

        if settings.verify_recovery {
            let expected = signer::address_of(key)?;
            let recovered = signer::recover_signer(&self.digest, &signature)?;
            if recovered != expected {
                crate::log_warn!(
                    LOG_MODULE,
                    "Recovered signer does not match key",
                    expected_sender = expected,
                    recovered_sender = recovered,
                );
                return Err(SigningError::VerificationFailed {
                    expected: expected.to_checksum(),
                    recovered: recovered.to_checksum(),
                });
            }
        }

        crate::log_debug!(
            LOG_MODULE,
            "Transaction signed",
            y_parity = signature.y_parity(),
            deterministic = settings.entropy.is_deterministic(),
        );

        let mut fields = self.fields;
        fields.extend(encode_signature_fields(&signature));
        let encoded = envelope::wrap(fields);
        Ok(SignedTransaction {
            intent: self.intent,
            signature,
            digest: self.digest,
            encoded,
        })
    }
}

/// A signed typed transaction and its serialized envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    intent: TransactionIntent,
    signature: Signature,
    digest: [u8; 32],
    encoded: Vec<u8>,
}

impl SignedTransaction {
    /// Parse a broadcast payload (strict canonical decoding)
    pub fn from_bytes(bytes: &[u8]) -> TxResult<Self> {
        let (intent, signature) = envelope::decode_signed(bytes)?;
        let digest = signing_hash(&envelope::encode_unsigned(&intent));
        Ok(Self {
            intent,
            signature,
            digest,
            encoded: bytes.to_vec(),
        })
    }

    /// Parse `0x`-prefixed (or bare) hex of a broadcast payload
    pub fn from_raw_hex(raw: &str) -> TxResult<Self> {
        let trimmed = raw.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(hex_part).map_err(|e| ValidationError::InvalidHex {
            field: "rawTransaction",
            reason: e.to_string(),
        })?;
        if bytes.is_empty() {
            return Err(RlpError::UnexpectedEnd { needed: 1, available: 0 }.into());
        }
        Self::from_bytes(&bytes)
    }

    pub fn intent(&self) -> &TransactionIntent {
        &self.intent
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// `0x02 ‖ RLP(unsigned fields ‖ [yParity, r, s])`
    pub fn encode(&self) -> &[u8] {
        &self.encoded
    }

    /// Parameter for `eth_sendRawTransaction`
    pub fn to_raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.encoded))
    }

    /// Keccak-256 of the unsigned envelope
    pub fn transaction_hash(&self) -> [u8; 32] {
        self.digest
    }

    /// Keccak-256 of the signed envelope, the identifier nodes report
    pub fn broadcast_hash(&self) -> [u8; 32] {
        keccak256(&self.encoded)
    }

    /// Address that signed this transaction
    pub fn recover_sender(&self) -> Result<Address, SigningError> {
        signer::recover_signer(&self.digest, &self.signature)
    }

    /// Check that `expected` produced the signature
    pub fn verify_sender(&self, expected: &Address) -> Result<(), SigningError> {
        let recovered = self.recover_sender()?;
        if &recovered != expected {
            return Err(SigningError::VerificationFailed {
                expected: expected.to_checksum(),
                recovered: recovered.to_checksum(),
            });
        }
        Ok(())
    }

    /// Intent fields plus signature and hashes, RPC style
    pub fn to_json(&self) -> Value {
        let mut value = self.intent.to_json();
        if let Value::Object(map) = &mut value {
            map.insert("yParity".into(), json!(format!("0x{:x}", self.signature.y_parity())));
            map.insert("r".into(), json!(format!("0x{}", hex::encode(self.signature.r()))));
            map.insert("s".into(), json!(format!("0x{}", hex::encode(self.signature.s()))));
            map.insert("transactionHash".into(), json!(format!("0x{}", hex::encode(self.digest))));
            map.insert(
                "broadcastHash".into(),
                json!(format!("0x{}", hex::encode(self.broadcast_hash()))),
            );
            map.insert("raw".into(), json!(self.to_raw_hex()));
        }
        value
    }
}

/// Run the whole pipeline for one intent
pub fn sign_transaction(
    intent: TransactionIntent,
    key: &PrivateKey,
    settings: &SignerSettings,
) -> TxResult<SignedTransaction> {
    for warning in settings.warnings() {
        crate::log_warn!(LOG_MODULE, "Weak signer settings", detail = warning);
    }
    let signed = intent
        .canonicalize(settings)?
        .into_envelope()
        .hash()
        .sign(key, settings)?;
    Ok(signed)
}
