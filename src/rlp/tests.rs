//! RLP Tests
//!
//! Vectors from the Ethereum RLP test suite plus the rejection cases
//! for non-canonical input.

#[cfg(test)]
mod tests {
    use crate::error::RlpError;
    use crate::rlp::*;

    fn hex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    // === Encoding ===

    #[test]
    fn test_encode_empty_string() {
        assert_eq!(encode(&RlpItem::empty()), vec![0x80]);
    }

    #[test]
    fn test_encode_single_low_byte() {
        assert_eq!(encode(&RlpItem::bytes(vec![0x00])), vec![0x00]);
        assert_eq!(encode(&RlpItem::bytes(vec![0x7f])), vec![0x7f]);
    }

    #[test]
    fn test_encode_single_high_byte() {
        assert_eq!(encode(&RlpItem::bytes(vec![0x80])), vec![0x81, 0x80]);
        assert_eq!(encode(&RlpItem::bytes(vec![0xff])), vec![0x81, 0xff]);
    }

    #[test]
    fn test_encode_short_string() {
        assert_eq!(encode(&RlpItem::bytes(b"dog".to_vec())), hex("83646f67"));
    }

    #[test]
    fn test_encode_55_byte_boundary() {
        let data = vec![0xaa; 55];
        let encoded = encode(&RlpItem::bytes(data.clone()));
        assert_eq!(encoded[0], 0x80 + 55);
        assert_eq!(&encoded[1..], &data[..]);

        let data = vec![0xaa; 56];
        let encoded = encode(&RlpItem::bytes(data.clone()));
        assert_eq!(&encoded[..2], &[0xb8, 56]);
        assert_eq!(&encoded[2..], &data[..]);
    }

    #[test]
    fn test_encode_long_string() {
        let text = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        let encoded = encode(&RlpItem::bytes(text.to_vec()));
        assert_eq!(&encoded[..2], &[0xb8, 0x38]);
        assert_eq!(&encoded[2..], &text[..]);
    }

    #[test]
    fn test_encode_two_byte_length() {
        let data = vec![0x01; 1024];
        let encoded = encode(&RlpItem::bytes(data));
        assert_eq!(&encoded[..3], &[0xb9, 0x04, 0x00]);
        assert_eq!(encoded.len(), 1027);
    }

    #[test]
    fn test_encode_empty_list() {
        assert_eq!(encode(&RlpItem::list(vec![])), vec![0xc0]);
    }

    #[test]
    fn test_encode_string_list() {
        let item = RlpItem::list(vec![
            RlpItem::bytes(b"cat".to_vec()),
            RlpItem::bytes(b"dog".to_vec()),
        ]);
        assert_eq!(encode(&item), hex("c88363617483646f67"));
    }

    #[test]
    fn test_encode_set_theoretical_three() {
        // [ [], [[]], [ [], [[]] ] ]
        let empty = RlpItem::list(vec![]);
        let one = RlpItem::list(vec![empty.clone()]);
        let two = RlpItem::list(vec![empty.clone(), one.clone()]);
        let item = RlpItem::list(vec![empty, one, two]);
        assert_eq!(encode(&item), hex("c7c0c1c0c3c0c1c0"));
    }

    #[test]
    fn test_encode_long_list() {
        let item = RlpItem::list(vec![RlpItem::bytes(b"asdf".to_vec()); 12]);
        let encoded = encode(&item);
        assert_eq!(&encoded[..2], &[0xf8, 60]);
        assert_eq!(encoded.len(), 62);
    }

    // === Decoding ===

    #[test]
    fn test_decode_vectors() {
        let cases: Vec<(&str, RlpItem)> = vec![
            ("80", RlpItem::empty()),
            ("00", RlpItem::bytes(vec![0x00])),
            ("7f", RlpItem::bytes(vec![0x7f])),
            ("8180", RlpItem::bytes(vec![0x80])),
            ("83646f67", RlpItem::bytes(b"dog".to_vec())),
            ("c0", RlpItem::list(vec![])),
            (
                "c88363617483646f67",
                RlpItem::list(vec![
                    RlpItem::bytes(b"cat".to_vec()),
                    RlpItem::bytes(b"dog".to_vec()),
                ]),
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(decode(&hex(input)).unwrap(), expected, "input {}", input);
        }
    }

    #[test]
    fn test_decode_nested() {
        let decoded = decode(&hex("c7c0c1c0c3c0c1c0")).unwrap();
        let items = decoded.as_list().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_decode_rejects_empty_input() {
        assert!(matches!(decode(&[]), Err(RlpError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_decode_rejects_truncated_string() {
        assert_eq!(
            decode(&hex("83646f")),
            Err(RlpError::UnexpectedEnd { needed: 4, available: 3 })
        );
    }

    #[test]
    fn test_decode_rejects_truncated_list() {
        assert!(matches!(
            decode(&hex("c88363617483646f")),
            Err(RlpError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_length_of_length() {
        assert!(matches!(decode(&hex("b9")), Err(RlpError::UnexpectedEnd { .. })));
        assert!(matches!(decode(&hex("b904")), Err(RlpError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert_eq!(decode(&hex("8000")), Err(RlpError::TrailingBytes(1)));
        assert_eq!(decode(&hex("c0c0")), Err(RlpError::TrailingBytes(1)));
    }

    #[test]
    fn test_decode_rejects_wrapped_single_byte() {
        assert_eq!(decode(&hex("8100")), Err(RlpError::NonCanonicalSingleByte));
        assert_eq!(decode(&hex("817f")), Err(RlpError::NonCanonicalSingleByte));
    }

    #[test]
    fn test_decode_rejects_long_form_for_short_string() {
        // 3-byte string using the long form
        assert_eq!(decode(&hex("b803646f67")), Err(RlpError::NonCanonicalLength));
        // 55-byte string using the long form
        let mut data = vec![0xb8, 55];
        data.extend_from_slice(&[0x01; 55]);
        assert_eq!(decode(&data), Err(RlpError::NonCanonicalLength));
    }

    #[test]
    fn test_decode_rejects_long_form_for_short_list() {
        assert_eq!(decode(&hex("f800")), Err(RlpError::NonCanonicalLength));
    }

    #[test]
    fn test_decode_rejects_length_with_leading_zero() {
        let mut data = vec![0xb9, 0x00, 0x38];
        data.extend_from_slice(&[0x01; 56]);
        assert_eq!(decode(&data), Err(RlpError::NonCanonicalLength));
    }

    #[test]
    fn test_decode_rejects_child_overrunning_list() {
        // list claims 2 bytes, child claims 3
        assert!(decode(&hex("c283646f")).is_err());
    }

    #[test]
    fn test_decode_depth_limit() {
        let mut item = RlpItem::list(vec![]);
        for _ in 0..(MAX_DEPTH + 1) {
            item = RlpItem::list(vec![item]);
        }
        let encoded = encode(&item);
        assert_eq!(decode(&encoded), Err(RlpError::DepthLimitExceeded(MAX_DEPTH)));
    }

    #[test]
    fn test_decode_list_helper() {
        let items = decode_list(&hex("c88363617483646f67")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(decode_list(&hex("83646f67")), Err(RlpError::ExpectedList));
    }

    #[test]
    fn test_roundtrip_long_payloads() {
        let item = RlpItem::list(vec![
            RlpItem::bytes(vec![0x42; 300]),
            RlpItem::list(vec![RlpItem::bytes(vec![0x99; 70]); 5]),
            RlpItem::empty(),
        ]);
        assert_eq!(decode(&encode(&item)).unwrap(), item);
    }
}
