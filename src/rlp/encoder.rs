//! RLP Encoding
//!
//! Encoding never fails: every byte string and list has exactly one
//! canonical encoding.

use super::types::{
    RlpItem, LIST_LONG_OFFSET, LIST_SHORT_OFFSET, MAX_SHORT_LENGTH, STRING_LONG_OFFSET,
    STRING_SHORT_OFFSET,
};

/// Encode a node and all of its children
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(item));
    encode_into(item, &mut out);
    out
}

/// Encode a node, appending to `out`
pub fn encode_into(item: &RlpItem, out: &mut Vec<u8>) {
    match item {
        RlpItem::Bytes(data) => {
            if data.len() == 1 && data[0] < STRING_SHORT_OFFSET {
                out.push(data[0]);
            } else {
                encode_header(data.len(), STRING_SHORT_OFFSET, STRING_LONG_OFFSET, out);
                out.extend_from_slice(data);
            }
        }
        RlpItem::List(items) => {
            let payload_len: usize = items.iter().map(encoded_len).sum();
            encode_header(payload_len, LIST_SHORT_OFFSET, LIST_LONG_OFFSET, out);
            for child in items {
                encode_into(child, out);
            }
        }
    }
}

/// Encode a byte string
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 9);
    encode_into(&RlpItem::Bytes(data.to_vec()), &mut out);
    out
}

/// Wrap already-encoded children in a list header
pub fn encode_list(encoded_items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = encoded_items.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(payload_len + 9);
    encode_header(payload_len, LIST_SHORT_OFFSET, LIST_LONG_OFFSET, &mut out);
    for item in encoded_items {
        out.extend_from_slice(item);
    }
    out
}

/// Number of bytes `encode(item)` will produce
pub fn encoded_len(item: &RlpItem) -> usize {
    match item {
        RlpItem::Bytes(data) => {
            if data.len() == 1 && data[0] < STRING_SHORT_OFFSET {
                1
            } else {
                header_len(data.len()) + data.len()
            }
        }
        RlpItem::List(items) => {
            let payload_len: usize = items.iter().map(encoded_len).sum();
            header_len(payload_len) + payload_len
        }
    }
}

fn header_len(payload_len: usize) -> usize {
    if payload_len <= MAX_SHORT_LENGTH {
        1
    } else {
        1 + encode_length(payload_len).len()
    }
}

fn encode_header(payload_len: usize, short_offset: u8, long_offset: u8, out: &mut Vec<u8>) {
    if payload_len <= MAX_SHORT_LENGTH {
        out.push(short_offset + payload_len as u8);
    } else {
        let len_bytes = encode_length(payload_len);
        out.push(long_offset + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
}

/// Minimal big-endian representation of a length (no leading zeros)
pub(crate) fn encode_length(len: usize) -> Vec<u8> {
    let bytes = (len as u64).to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}
