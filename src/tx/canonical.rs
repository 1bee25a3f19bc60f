//! Field Canonicalization
//!
//! Turns intent fields into RLP leaves. This is the only place where
//! "absent" and "zero" are given a wire representation: both become the
//! empty byte string.

use super::types::{AccessListEntry, Address, TransactionIntent};
use crate::rlp::RlpItem;

/// Agreed maximum byte width per integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    ChainId,
    Nonce,
    MaxPriorityFee,
    MaxFee,
    GasLimit,
    Value,
    /// Signature scalars r and s
    Scalar,
    YParity,
}

impl FieldWidth {
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::ChainId | FieldWidth::Nonce | FieldWidth::GasLimit => 8,
            FieldWidth::MaxPriorityFee | FieldWidth::MaxFee | FieldWidth::Value => 16,
            FieldWidth::Scalar => 32,
            FieldWidth::YParity => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldWidth::ChainId => "chainId",
            FieldWidth::Nonce => "nonce",
            FieldWidth::MaxPriorityFee => "maxPriorityFeePerGas",
            FieldWidth::MaxFee => "maxFeePerGas",
            FieldWidth::GasLimit => "gasLimit",
            FieldWidth::Value => "value",
            FieldWidth::Scalar => "signature",
            FieldWidth::YParity => "yParity",
        }
    }
}

/// Strip leading zero bytes; zero becomes the empty slice
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Minimal big-endian encoding of a u64
pub fn uint_u64(value: u64) -> RlpItem {
    RlpItem::Bytes(trim_leading_zeros(&value.to_be_bytes()).to_vec())
}

/// Minimal big-endian encoding of a u128
pub fn uint_u128(value: u128) -> RlpItem {
    RlpItem::Bytes(trim_leading_zeros(&value.to_be_bytes()).to_vec())
}

/// Recipient, or the empty string for contract creation
pub fn destination(to: Option<&Address>) -> RlpItem {
    match to {
        Some(addr) => RlpItem::Bytes(addr.as_bytes().to_vec()),
        None => RlpItem::empty(),
    }
}

/// `[address, [storageKeys...]]`
pub fn access_list_entry(entry: &AccessListEntry) -> RlpItem {
    let keys = entry
        .storage_keys
        .iter()
        .map(|key| RlpItem::Bytes(key.as_bytes().to_vec()))
        .collect();
    RlpItem::List(vec![
        RlpItem::Bytes(entry.address.as_bytes().to_vec()),
        RlpItem::List(keys),
    ])
}

pub fn access_list(entries: &[AccessListEntry]) -> RlpItem {
    RlpItem::List(entries.iter().map(access_list_entry).collect())
}

/// Unsigned field sequence in wire order
///
/// `[chainId, nonce, maxPriorityFeePerGas, maxFeePerGas, gasLimit, to,
/// value, data, accessList]`
pub fn intent_fields(intent: &TransactionIntent) -> Vec<RlpItem> {
    vec![
        uint_u64(intent.chain_id),
        uint_u64(intent.nonce),
        uint_u128(intent.max_priority_fee_per_gas),
        uint_u128(intent.max_fee_per_gas),
        uint_u64(intent.gas_limit),
        destination(intent.to.as_ref()),
        uint_u128(intent.value),
        RlpItem::Bytes(intent.data.clone()),
        access_list(&intent.access_list),
    ]
}
