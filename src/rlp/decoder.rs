//! RLP Decoding
//!
//! Strict inverse of the encoder: any input that the encoder could not
//! have produced is rejected.

use super::types::{
    RlpItem, LIST_LONG_OFFSET, LIST_SHORT_OFFSET, MAX_DEPTH, MAX_SHORT_LENGTH, STRING_LONG_OFFSET,
    STRING_SHORT_OFFSET,
};
use crate::error::RlpError;

/// Decoded item header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Whether the payload is a list
    pub list: bool,
    /// Bytes taken by the prefix itself
    pub header_len: usize,
    /// Bytes in the payload
    pub payload_len: usize,
}

/// Decode exactly one item spanning the whole input
pub fn decode(data: &[u8]) -> Result<RlpItem, RlpError> {
    let (item, consumed) = decode_prefix(data)?;
    if consumed != data.len() {
        return Err(RlpError::TrailingBytes(data.len() - consumed));
    }
    Ok(item)
}

/// Decode the first item of `data`, returning it with the bytes consumed
pub fn decode_prefix(data: &[u8]) -> Result<(RlpItem, usize), RlpError> {
    decode_at_depth(data, 0)
}

/// Decode an input that must be a list, returning its children
pub fn decode_list(data: &[u8]) -> Result<Vec<RlpItem>, RlpError> {
    match decode(data)? {
        RlpItem::List(items) => Ok(items),
        RlpItem::Bytes(_) => Err(RlpError::ExpectedList),
    }
}

fn decode_at_depth(data: &[u8], depth: usize) -> Result<(RlpItem, usize), RlpError> {
    if depth > MAX_DEPTH {
        return Err(RlpError::DepthLimitExceeded(MAX_DEPTH));
    }

    let header = decode_header(data)?;
    let end = header
        .header_len
        .checked_add(header.payload_len)
        .ok_or(RlpError::LengthOverflow)?;
    if data.len() < end {
        return Err(RlpError::UnexpectedEnd {
            needed: end,
            available: data.len(),
        });
    }

    // Single byte below 0x80 is its own encoding (no header)
    if header.header_len == 0 {
        return Ok((RlpItem::Bytes(vec![data[0]]), 1));
    }

    let payload = &data[header.header_len..end];

    if !header.list {
        if header.payload_len == 1 && payload[0] < STRING_SHORT_OFFSET {
            return Err(RlpError::NonCanonicalSingleByte);
        }
        return Ok((RlpItem::Bytes(payload.to_vec()), end));
    }

    let mut items = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let (child, consumed) = decode_at_depth(&payload[offset..], depth + 1)?;
        items.push(child);
        offset += consumed;
    }

    Ok((RlpItem::List(items), end))
}

/// Parse the prefix of the first item in `data`
pub fn decode_header(data: &[u8]) -> Result<Header, RlpError> {
    let first = *data.first().ok_or(RlpError::UnexpectedEnd {
        needed: 1,
        available: 0,
    })?;

    match first {
        0x00..=0x7f => Ok(Header {
            list: false,
            header_len: 0,
            payload_len: 1,
        }),
        0x80..=0xb7 => Ok(Header {
            list: false,
            header_len: 1,
            payload_len: (first - STRING_SHORT_OFFSET) as usize,
        }),
        0xb8..=0xbf => {
            let len_of_len = (first - STRING_LONG_OFFSET) as usize;
            let payload_len = decode_long_length(&data[1..], len_of_len)?;
            Ok(Header {
                list: false,
                header_len: 1 + len_of_len,
                payload_len,
            })
        }
        0xc0..=0xf7 => Ok(Header {
            list: true,
            header_len: 1,
            payload_len: (first - LIST_SHORT_OFFSET) as usize,
        }),
        0xf8..=0xff => {
            let len_of_len = (first - LIST_LONG_OFFSET) as usize;
            let payload_len = decode_long_length(&data[1..], len_of_len)?;
            Ok(Header {
                list: true,
                header_len: 1 + len_of_len,
                payload_len,
            })
        }
    }
}

fn decode_long_length(data: &[u8], len_of_len: usize) -> Result<usize, RlpError> {
    if data.len() < len_of_len {
        return Err(RlpError::UnexpectedEnd {
            needed: len_of_len + 1,
            available: data.len() + 1,
        });
    }

    let len_bytes = &data[..len_of_len];
    if len_bytes[0] == 0 {
        return Err(RlpError::NonCanonicalLength);
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }

    let len = len_bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);

    // Short form was available
    if len <= MAX_SHORT_LENGTH {
        return Err(RlpError::NonCanonicalLength);
    }

    Ok(len)
}

/// Interpret a byte string node as a canonical unsigned integer
///
/// Rejects leading zero bytes and values wider than `max_bytes`.
pub fn decode_uint_bytes<'a>(item: &'a RlpItem, max_bytes: usize) -> Result<&'a [u8], RlpError> {
    let bytes = item.as_bytes().ok_or(RlpError::ExpectedBytes)?;
    if bytes.first() == Some(&0) {
        return Err(RlpError::NonCanonicalInteger);
    }
    if bytes.len() > max_bytes {
        return Err(RlpError::LengthOverflow);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_single_byte() {
        let header = decode_header(&[0x7f]).unwrap();
        assert!(!header.list);
        assert_eq!(header.header_len, 0);
        assert_eq!(header.payload_len, 1);
    }

    #[test]
    fn test_header_long_list() {
        let header = decode_header(&[0xf8, 0x9c]).unwrap();
        assert!(header.list);
        assert_eq!(header.header_len, 2);
        assert_eq!(header.payload_len, 156);
    }

    #[test]
    fn test_header_empty_input() {
        assert_eq!(
            decode_header(&[]),
            Err(RlpError::UnexpectedEnd { needed: 1, available: 0 })
        );
    }

    #[test]
    fn test_decode_uint_bytes() {
        assert_eq!(decode_uint_bytes(&RlpItem::empty(), 8).unwrap(), &[] as &[u8]);
        assert_eq!(
            decode_uint_bytes(&RlpItem::bytes(vec![0x00, 0x01]), 8),
            Err(RlpError::NonCanonicalInteger)
        );
        assert_eq!(
            decode_uint_bytes(&RlpItem::bytes(vec![0x01; 9]), 8),
            Err(RlpError::LengthOverflow)
        );
        assert_eq!(
            decode_uint_bytes(&RlpItem::list(vec![]), 8),
            Err(RlpError::ExpectedBytes)
        );
    }
}
