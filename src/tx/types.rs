//! Transaction Type Definitions
//!
//! Intent, address and access-list types for typed (0x02) transactions.
//! Every type validates its lengths at construction, so a value that
//! exists is already well-formed.

use std::fmt;

use serde_json::{json, Value};

use super::canonical::FieldWidth;
use super::hasher::keccak256;
use crate::error::ValidationError;

/// Typed transaction identifier (dynamic fee transaction)
pub const TYPED_TX_TYPE: u8 = 0x02;

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build from a slice that must be exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| ValidationError::InvalidAddressLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Parse a `0x`-prefixed (or bare) hex address
    ///
    /// Mixed-case input must carry a valid EIP-55 checksum.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = hex::decode(hex_part).map_err(|e| ValidationError::InvalidHex {
            field: "address",
            reason: e.to_string(),
        })?;
        let address = Self::from_slice(&bytes)?;

        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower {
            let checksummed = address.to_checksum();
            if checksummed[2..] != *hex_part {
                return Err(ValidationError::InvalidChecksum(trimmed.to_string()));
            }
        }

        Ok(address)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case checksum encoding
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut result = String::from("0x");
        for (i, ch) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

            if ch.is_ascii_digit() || nibble < 8 {
                result.push(ch);
            } else {
                result.push(ch.to_ascii_uppercase());
            }
        }

        result
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// A 32-byte storage slot key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StorageKey([u8; 32]);

impl StorageKey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a slice that must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ValidationError::InvalidStorageKeyLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let hex_part = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        let bytes = hex::decode(hex_part).map_err(|e| ValidationError::InvalidHex {
            field: "storageKey",
            reason: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey(0x{})", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for StorageKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Access list entry (address + storage keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<StorageKey>,
}

impl AccessListEntry {
    pub fn new(address: Address, storage_keys: Vec<StorageKey>) -> Self {
        Self {
            address,
            storage_keys,
        }
    }

    /// Build from raw slices, checking every length
    pub fn from_slices(address: &[u8], storage_keys: &[&[u8]]) -> Result<Self, ValidationError> {
        let address = Address::from_slice(address)?;
        let storage_keys = storage_keys
            .iter()
            .map(|key| StorageKey::from_slice(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(address, storage_keys))
    }
}

/// Everything needed to build one typed transaction
///
/// Network-dependent fields (nonce, fees, gas limit) must already be
/// resolved. Once built, an intent is never mutated; the pipeline
/// consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    pub(crate) chain_id: u64,
    pub(crate) nonce: u64,
    pub(crate) max_priority_fee_per_gas: u128,
    pub(crate) max_fee_per_gas: u128,
    pub(crate) gas_limit: u64,
    pub(crate) to: Option<Address>,
    pub(crate) value: u128,
    pub(crate) data: Vec<u8>,
    pub(crate) access_list: Vec<AccessListEntry>,
}

impl TransactionIntent {
    pub fn builder() -> TransactionIntentBuilder {
        TransactionIntentBuilder::default()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn max_priority_fee_per_gas(&self) -> u128 {
        self.max_priority_fee_per_gas
    }

    pub fn max_fee_per_gas(&self) -> u128 {
        self.max_fee_per_gas
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Recipient, or `None` for contract creation
    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn access_list(&self) -> &[AccessListEntry] {
        &self.access_list
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// Build an intent from RPC-style JSON
    ///
    /// Quantities may be JSON numbers, `0x` hex strings or decimal
    /// strings. `to` may be omitted or `null` for contract creation; any
    /// other non-string `to` is rejected rather than read as absent.
    pub fn from_json(json: &Value) -> Result<Self, ValidationError> {
        let mut builder = TransactionIntent::builder();

        if let Some(v) = json.get("chainId") {
            builder = builder.chain_id(parse_quantity(v, "chainId", FieldWidth::ChainId.bytes())? as u64);
        }
        if let Some(v) = json.get("nonce") {
            builder = builder.nonce(parse_quantity(v, "nonce", FieldWidth::Nonce.bytes())? as u64);
        }
        if let Some(v) = json.get("maxPriorityFeePerGas") {
            builder = builder.max_priority_fee_per_gas(parse_quantity(
                v,
                "maxPriorityFeePerGas",
                FieldWidth::MaxPriorityFee.bytes(),
            )?);
        }
        if let Some(v) = json.get("maxFeePerGas") {
            builder = builder.max_fee_per_gas(parse_quantity(v, "maxFeePerGas", FieldWidth::MaxFee.bytes())?);
        }
        // `gas` is the RPC spelling
        if let Some(v) = json.get("gasLimit").or_else(|| json.get("gas")) {
            builder = builder.gas_limit(parse_quantity(v, "gasLimit", FieldWidth::GasLimit.bytes())? as u64);
        }
        if let Some(to) = present(json, "to") {
            builder = builder.to(Address::from_hex(expect_str(to, "to")?)?);
        }
        if let Some(v) = json.get("value") {
            builder = builder.value(parse_quantity(v, "value", FieldWidth::Value.bytes())?);
        }
        if let Some(data) = present(json, "data").or_else(|| present(json, "input")) {
            let data = expect_str(data, "data")?;
            let data_hex = data.strip_prefix("0x").unwrap_or(data);
            let bytes = hex::decode(data_hex).map_err(|e| ValidationError::InvalidHex {
                field: "data",
                reason: e.to_string(),
            })?;
            builder = builder.data(bytes);
        }
        if let Some(list) = present(json, "accessList") {
            for entry in expect_array(list, "accessList")? {
                builder = builder.add_access_list_entry(parse_access_list_entry(entry)?);
            }
        }

        builder.build()
    }

    /// Render as RPC-style JSON (hex quantities)
    pub fn to_json(&self) -> Value {
        let access_list: Vec<Value> = self
            .access_list
            .iter()
            .map(|entry| {
                json!({
                    "address": entry.address.to_checksum(),
                    "storageKeys": entry
                        .storage_keys
                        .iter()
                        .map(|k| format!("0x{}", hex::encode(k.as_bytes())))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "type": format!("0x{:x}", TYPED_TX_TYPE),
            "chainId": format!("0x{:x}", self.chain_id),
            "nonce": format!("0x{:x}", self.nonce),
            "maxPriorityFeePerGas": format!("0x{:x}", self.max_priority_fee_per_gas),
            "maxFeePerGas": format!("0x{:x}", self.max_fee_per_gas),
            "gasLimit": format!("0x{:x}", self.gas_limit),
            "to": self.to.map(|a| a.to_checksum()),
            "value": format!("0x{:x}", self.value),
            "data": format!("0x{}", hex::encode(&self.data)),
            "accessList": access_list,
        })
    }
}

/// Builder for [`TransactionIntent`]
///
/// `chainId`, `nonce`, both fee caps and `gasLimit` are required; `to`
/// defaults to contract creation, `value` to zero, `data` and the access
/// list to empty.
#[derive(Debug, Clone, Default)]
pub struct TransactionIntentBuilder {
    chain_id: Option<u64>,
    nonce: Option<u64>,
    max_priority_fee_per_gas: Option<u128>,
    max_fee_per_gas: Option<u128>,
    gas_limit: Option<u64>,
    to: Option<Address>,
    value: u128,
    data: Vec<u8>,
    access_list: Vec<AccessListEntry>,
}

impl TransactionIntentBuilder {
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn max_priority_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_priority_fee_per_gas = Some(fee);
        self
    }

    pub fn max_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_fee_per_gas = Some(fee);
        self
    }

    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    pub fn to(mut self, address: Address) -> Self {
        self.to = Some(address);
        self
    }

    pub fn value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }

    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn access_list(mut self, access_list: Vec<AccessListEntry>) -> Self {
        self.access_list = access_list;
        self
    }

    pub fn add_access_list_entry(mut self, entry: AccessListEntry) -> Self {
        self.access_list.push(entry);
        self
    }

    pub fn build(self) -> Result<TransactionIntent, ValidationError> {
        Ok(TransactionIntent {
            chain_id: self.chain_id.ok_or(ValidationError::MissingField("chainId"))?,
            nonce: self.nonce.ok_or(ValidationError::MissingField("nonce"))?,
            max_priority_fee_per_gas: self
                .max_priority_fee_per_gas
                .ok_or(ValidationError::MissingField("maxPriorityFeePerGas"))?,
            max_fee_per_gas: self
                .max_fee_per_gas
                .ok_or(ValidationError::MissingField("maxFeePerGas"))?,
            gas_limit: self.gas_limit.ok_or(ValidationError::MissingField("gasLimit"))?,
            to: self.to,
            value: self.value,
            data: self.data,
            access_list: self.access_list,
        })
    }
}

/// Parse a JSON quantity no wider than `max_bytes`
pub(crate) fn parse_quantity(
    v: &Value,
    field: &'static str,
    max_bytes: usize,
) -> Result<u128, ValidationError> {
    let overflow = ValidationError::IntegerOverflow { field, max_bytes };

    let value = if let Some(n) = v.as_u64() {
        n as u128
    } else if let Some(s) = v.as_str() {
        let s = s.trim();
        if let Some(hex_digits) = s.strip_prefix("0x") {
            if !hex_digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ValidationError::InvalidHex {
                    field,
                    reason: format!("not a hex quantity: {}", s),
                });
            }
            let significant = hex_digits.trim_start_matches('0');
            if significant.len() > 32 {
                return Err(overflow);
            }
            if significant.is_empty() {
                0
            } else {
                u128::from_str_radix(significant, 16).map_err(|e| ValidationError::InvalidHex {
                    field,
                    reason: e.to_string(),
                })?
            }
        } else {
            if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::InvalidAmount(format!("{}: {}", field, s)));
            }
            s.parse::<u128>().map_err(|_| overflow.clone())?
        }
    } else {
        return Err(ValidationError::InvalidAmount(format!(
            "{}: expected number or string",
            field
        )));
    };

    if max_bytes < 16 && value >> (max_bytes * 8) != 0 {
        return Err(overflow);
    }

    Ok(value)
}

/// A key that is set to something other than `null`
fn present<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    json.get(key).filter(|v| !v.is_null())
}

fn expect_str<'a>(v: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    v.as_str().ok_or_else(|| ValidationError::InvalidHex {
        field,
        reason: format!("expected a hex string, got {}", json_kind(v)),
    })
}

fn expect_array<'a>(v: &'a Value, field: &'static str) -> Result<&'a Vec<Value>, ValidationError> {
    v.as_array().ok_or_else(|| ValidationError::InvalidHex {
        field,
        reason: format!("expected an array, got {}", json_kind(v)),
    })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_access_list_entry(v: &Value) -> Result<AccessListEntry, ValidationError> {
    let address = present(v, "address").ok_or(ValidationError::MissingField("accessList.address"))?;
    let address = Address::from_hex(expect_str(address, "accessList.address")?)?;

    let storage_keys = match present(v, "storageKeys") {
        Some(keys) => expect_array(keys, "accessList.storageKeys")?
            .iter()
            .map(|k| expect_str(k, "accessList.storageKeys").and_then(StorageKey::from_hex))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(AccessListEntry::new(address, storage_keys))
}
