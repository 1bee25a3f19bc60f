//! Typed Transaction Envelope
//!
//! `0x02 ‖ RLP([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas,
//! gasLimit, to, value, data, accessList])`, with `[yParity, r, s]`
//! appended once signed. Field order is the wire contract.

use super::canonical::{self, FieldWidth};
use super::signature::{self, Signature};
use super::types::{AccessListEntry, Address, StorageKey, TransactionIntent, TYPED_TX_TYPE};
use crate::error::{RlpError, TxResult, ValidationError};
use crate::rlp::{self, RlpItem};

/// Fields in the unsigned payload
pub const UNSIGNED_FIELD_COUNT: usize = 9;

/// Fields in the signed payload
pub const SIGNED_FIELD_COUNT: usize = 12;

/// Serialize the unsigned envelope (the signing preimage)
pub fn encode_unsigned(intent: &TransactionIntent) -> Vec<u8> {
    wrap(canonical::intent_fields(intent))
}

/// Serialize the signed envelope (the broadcast payload)
pub fn encode_signed(intent: &TransactionIntent, signature: &Signature) -> Vec<u8> {
    let mut fields = canonical::intent_fields(intent);
    fields.extend(signature::encode_signature_fields(signature));
    wrap(fields)
}

/// `0x02 ‖ RLP(fields)` for fields already in wire form
pub(crate) fn wrap(fields: Vec<RlpItem>) -> Vec<u8> {
    let payload = RlpItem::List(fields);
    let mut out = Vec::with_capacity(1 + rlp::encoded_len(&payload));
    out.push(TYPED_TX_TYPE);
    rlp::encode_into(&payload, &mut out);
    out
}

/// Parse an unsigned envelope back into its intent
pub fn decode_unsigned(bytes: &[u8]) -> TxResult<TransactionIntent> {
    let fields = payload_fields(bytes, UNSIGNED_FIELD_COUNT)?;
    decode_intent(&fields)
}

/// Parse a broadcast payload into its intent and signature
pub fn decode_signed(bytes: &[u8]) -> TxResult<(TransactionIntent, Signature)> {
    let fields = payload_fields(bytes, SIGNED_FIELD_COUNT)?;
    let intent = decode_intent(&fields[..UNSIGNED_FIELD_COUNT])?;

    let y_parity = rlp::decode_uint_bytes(&fields[9], FieldWidth::YParity.bytes())?;
    let r = rlp::decode_uint_bytes(&fields[10], FieldWidth::Scalar.bytes())?;
    let s = rlp::decode_uint_bytes(&fields[11], FieldWidth::Scalar.bytes())?;
    let signature = signature::decode_signature_fields(y_parity, r, s)?;

    Ok((intent, signature))
}

fn payload_fields(bytes: &[u8], expected: usize) -> TxResult<Vec<RlpItem>> {
    let (&tx_type, payload) = bytes.split_first().ok_or(RlpError::UnexpectedEnd {
        needed: 1,
        available: 0,
    })?;
    if tx_type != TYPED_TX_TYPE {
        return Err(ValidationError::UnsupportedTransactionType(tx_type).into());
    }

    let fields = rlp::decode_list(payload)?;
    if fields.len() != expected {
        return Err(ValidationError::FieldCount {
            expected,
            actual: fields.len(),
        }
        .into());
    }
    Ok(fields)
}

fn decode_intent(fields: &[RlpItem]) -> TxResult<TransactionIntent> {
    let to = {
        let bytes = fields[5].as_bytes().ok_or(RlpError::ExpectedBytes)?;
        if bytes.is_empty() {
            None
        } else {
            Some(Address::from_slice(bytes)?)
        }
    };
    let data = fields[7].as_bytes().ok_or(RlpError::ExpectedBytes)?.to_vec();

    let mut builder = TransactionIntent::builder()
        .chain_id(uint(&fields[0], FieldWidth::ChainId)? as u64)
        .nonce(uint(&fields[1], FieldWidth::Nonce)? as u64)
        .max_priority_fee_per_gas(uint(&fields[2], FieldWidth::MaxPriorityFee)?)
        .max_fee_per_gas(uint(&fields[3], FieldWidth::MaxFee)?)
        .gas_limit(uint(&fields[4], FieldWidth::GasLimit)? as u64)
        .value(uint(&fields[6], FieldWidth::Value)?)
        .data(data)
        .access_list(decode_access_list(&fields[8])?);
    if let Some(to) = to {
        builder = builder.to(to);
    }

    Ok(builder.build()?)
}

/// Canonical integer no wider than `width`
fn uint(item: &RlpItem, width: FieldWidth) -> TxResult<u128> {
    let bytes = rlp::decode_uint_bytes(item, usize::MAX)?;
    if bytes.len() > width.bytes() {
        return Err(ValidationError::IntegerOverflow {
            field: width.name(),
            max_bytes: width.bytes(),
        }
        .into());
    }
    Ok(bytes.iter().fold(0u128, |acc, &b| (acc << 8) | b as u128))
}

fn decode_access_list(item: &RlpItem) -> TxResult<Vec<AccessListEntry>> {
    item.as_list()
        .ok_or(RlpError::ExpectedList)?
        .iter()
        .map(decode_access_list_entry)
        .collect()
}

fn decode_access_list_entry(entry: &RlpItem) -> TxResult<AccessListEntry> {
    let parts = entry.as_list().ok_or(RlpError::ExpectedList)?;
    if parts.len() != 2 {
        return Err(ValidationError::FieldCount {
            expected: 2,
            actual: parts.len(),
        }
        .into());
    }

    let address = Address::from_slice(parts[0].as_bytes().ok_or(RlpError::ExpectedBytes)?)?;
    let mut storage_keys = Vec::new();
    for key in parts[1].as_list().ok_or(RlpError::ExpectedList)? {
        let bytes = key.as_bytes().ok_or(RlpError::ExpectedBytes)?;
        storage_keys.push(StorageKey::from_slice(bytes)?);
    }
    Ok(AccessListEntry::new(address, storage_keys))
}
