//! Network Collaborators
//!
//! The codec itself performs no I/O. Network-dependent fields (chain id,
//! pending nonce, fee estimate) come from a [`ChainStateProvider`] handed
//! in by the caller, and signed payloads leave through a
//! [`RawTransactionBroadcaster`]. No transport is implemented here; this
//! module only fixes the contracts and the JSON-RPC shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NetworkError, TxResult};
use crate::tx::{AccessListEntry, Address, SignedTransaction, TransactionIntent};

/// Gas limit of a plain value transfer
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Fee caps suggested by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Read-only chain state needed to complete an intent
pub trait ChainStateProvider {
    fn chain_id(&self) -> Result<u64, NetworkError>;

    /// Next nonce for `address`, counting pending transactions
    fn pending_nonce(&self, address: &Address) -> Result<u64, NetworkError>;

    fn fee_estimate(&self) -> Result<FeeEstimate, NetworkError>;
}

/// Submits a signed envelope and returns the hash the node reports
pub trait RawTransactionBroadcaster {
    fn send_raw_transaction(&self, raw_hex: &str) -> Result<[u8; 32], NetworkError>;
}

/// An intent whose network-dependent fields may still be missing
///
/// Any field left as `None` is filled from the provider by
/// [`resolve_intent`]; explicit values always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentDraft {
    pub chain_id: Option<u64>,
    pub nonce: Option<u64>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub gas_limit: Option<u64>,
    pub to: Option<Address>,
    pub value: u128,
    pub data: Vec<u8>,
    pub access_list: Vec<AccessListEntry>,
}

impl IntentDraft {
    /// Plain value transfer
    pub fn transfer(to: Address, value: u128) -> Self {
        Self {
            to: Some(to),
            value,
            gas_limit: Some(TRANSFER_GAS_LIMIT),
            ..Self::default()
        }
    }
}

/// Complete a draft with chain state from `provider`
///
/// The provider is only queried for the fields the draft leaves open.
pub fn resolve_intent(
    draft: IntentDraft,
    sender: &Address,
    provider: &dyn ChainStateProvider,
) -> TxResult<TransactionIntent> {
    let chain_id = match draft.chain_id {
        Some(id) => id,
        None => provider.chain_id()?,
    };
    let nonce = match draft.nonce {
        Some(nonce) => nonce,
        None => provider.pending_nonce(sender)?,
    };

    let (max_fee, priority_fee) = match (draft.max_fee_per_gas, draft.max_priority_fee_per_gas) {
        (Some(max), Some(priority)) => (max, priority),
        (max, priority) => {
            let estimate = provider.fee_estimate()?;
            (
                max.unwrap_or(estimate.max_fee_per_gas),
                priority.unwrap_or(estimate.max_priority_fee_per_gas),
            )
        }
    };

    crate::log_debug!(
        "collaborators",
        "Intent resolved",
        chain_id = chain_id,
        nonce = nonce,
        sender = sender,
    );

    let mut builder = TransactionIntent::builder()
        .chain_id(chain_id)
        .nonce(nonce)
        .max_priority_fee_per_gas(priority_fee)
        .max_fee_per_gas(max_fee)
        .gas_limit(draft.gas_limit.unwrap_or(TRANSFER_GAS_LIMIT))
        .value(draft.value)
        .data(draft.data)
        .access_list(draft.access_list);
    if let Some(to) = draft.to {
        builder = builder.to(to);
    }

    Ok(builder.build()?)
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Vec<Value>,
    pub id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

/// `eth_sendRawTransaction` request for a signed transaction
pub fn send_raw_transaction_request(signed: &SignedTransaction, id: u64) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        method: "eth_sendRawTransaction",
        params: vec![Value::String(signed.to_raw_hex())],
        id,
    }
}

/// Extract the transaction hash from an `eth_sendRawTransaction` response
pub fn parse_send_raw_transaction_response(body: &str) -> Result<[u8; 32], NetworkError> {
    let response: RpcResponse =
        serde_json::from_str(body).map_err(|e| NetworkError::Unavailable(format!("malformed response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(NetworkError::Rejected(error.message));
    }

    let result = response
        .result
        .ok_or_else(|| NetworkError::Unavailable("no result in response".to_string()))?;
    let hex_part = result.strip_prefix("0x").unwrap_or(&result);
    let bytes = hex::decode(hex_part).map_err(|e| NetworkError::Unavailable(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| NetworkError::Unavailable(format!("unexpected hash length in {}", result)))
}

/// Hand a signed transaction to `broadcaster`
///
/// A node that reports a different hash than the envelope's own is
/// logged but not treated as a failure; the node's answer is returned.
pub fn broadcast(
    signed: &SignedTransaction,
    broadcaster: &dyn RawTransactionBroadcaster,
) -> Result<[u8; 32], NetworkError> {
    let reported = broadcaster
        .send_raw_transaction(&signed.to_raw_hex())
        .map_err(|e| {
            crate::log_error!("collaborators", "Broadcast failed", reason = e);
            e
        })?;
    crate::log_info!("collaborators", "Transaction broadcast", tx_hash = hex::encode(reported));
    if reported != signed.broadcast_hash() {
        crate::log_warn!(
            "collaborators",
            "Node reported an unexpected transaction hash",
            tx_hash = hex::encode(reported),
        );
    }
    Ok(reported)
}
