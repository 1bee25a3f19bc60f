use proptest::prelude::*;
use typed_tx_signer::rlp::{self, RlpItem};
use typed_tx_signer::tx::canonical::{uint_u128, uint_u64};
use typed_tx_signer::tx::signature::is_low_s;
use typed_tx_signer::tx::{
    decode_signed, decode_unsigned, encode_signed, encode_unsigned, keccak256, recover_signer,
    sign_digest, AccessListEntry, Address, PrivateKey, StorageKey, TransactionIntent,
};

fn any_private_key() -> impl Strategy<Value = PrivateKey> {
    prop::array::uniform32(any::<u8>()).prop_filter_map("valid secp256k1 scalar", |bytes| {
        PrivateKey::from_slice(&bytes).ok()
    })
}

fn any_rlp_item() -> impl Strategy<Value = RlpItem> {
    let leaf = prop::collection::vec(any::<u8>(), 0..80).prop_map(RlpItem::Bytes);
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(RlpItem::List)
    })
}

fn any_access_list() -> impl Strategy<Value = Vec<AccessListEntry>> {
    prop::collection::vec(
        (
            prop::array::uniform20(any::<u8>()),
            prop::collection::vec(prop::array::uniform32(any::<u8>()), 0..3),
        ),
        0..3,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(addr, keys)| {
                AccessListEntry::new(
                    Address::new(addr),
                    keys.into_iter().map(StorageKey::new).collect(),
                )
            })
            .collect()
    })
}

prop_compose! {
    fn any_intent()(
        chain_id in any::<u64>(),
        nonce in any::<u64>(),
        max_priority_fee_per_gas in any::<u128>(),
        max_fee_per_gas in any::<u128>(),
        gas_limit in any::<u64>(),
        to in prop::option::of(prop::array::uniform20(any::<u8>())),
        value in any::<u128>(),
        data in prop::collection::vec(any::<u8>(), 0..200),
        access_list in any_access_list(),
    ) -> TransactionIntent {
        let mut builder = TransactionIntent::builder()
            .chain_id(chain_id)
            .nonce(nonce)
            .max_priority_fee_per_gas(max_priority_fee_per_gas)
            .max_fee_per_gas(max_fee_per_gas)
            .gas_limit(gas_limit)
            .value(value)
            .data(data)
            .access_list(access_list);
        if let Some(to) = to {
            builder = builder.to(Address::new(to));
        }
        builder.build().expect("all required fields set")
    }
}

proptest! {
    #[test]
    fn rlp_roundtrip(item in any_rlp_item()) {
        let encoded = rlp::encode(&item);
        prop_assert_eq!(encoded.len(), rlp::encoded_len(&item));
        prop_assert_eq!(rlp::decode(&encoded).unwrap(), item);
    }

    #[test]
    fn rlp_decoder_accepts_only_canonical(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        // Whatever decodes must re-encode to the exact input
        if let Ok(item) = rlp::decode(&bytes) {
            prop_assert_eq!(rlp::encode(&item), bytes);
        }
    }

    #[test]
    fn canonical_integer_law(value in any::<u128>()) {
        let item = uint_u128(value);
        let bytes = item.as_bytes().unwrap();

        prop_assert_eq!(bytes.is_empty(), value == 0);
        prop_assert!(bytes.first() != Some(&0));
        let restored = bytes.iter().fold(0u128, |acc, &b| (acc << 8) | b as u128);
        prop_assert_eq!(restored, value);
    }

    #[test]
    fn canonical_u64_matches_u128(value in any::<u64>()) {
        prop_assert_eq!(uint_u64(value), uint_u128(value as u128));
    }

    #[test]
    fn signatures_are_low_s_and_recoverable(key in any_private_key(), message in prop::collection::vec(any::<u8>(), 0..64)) {
        let digest = keccak256(&message);
        let sig = sign_digest(&digest, &key, None).unwrap();

        prop_assert!(is_low_s(sig.s()));
        prop_assert!(sig.y_parity() <= 1);
        prop_assert_eq!(recover_signer(&digest, &sig).unwrap(), key.address().unwrap());
    }

    #[test]
    fn signing_is_deterministic(key in any_private_key(), digest in prop::array::uniform32(any::<u8>())) {
        let a = sign_digest(&digest, &key, None).unwrap();
        let b = sign_digest(&digest, &key, None).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn address_length_guard(bytes in prop::collection::vec(any::<u8>(), 0..40)) {
        prop_assert_eq!(Address::from_slice(&bytes).is_ok(), bytes.len() == 20);
        prop_assert_eq!(StorageKey::from_slice(&bytes).is_ok(), bytes.len() == 32);
    }

    #[test]
    fn envelope_roundtrip(intent in any_intent()) {
        let unsigned = encode_unsigned(&intent);
        prop_assert_eq!(unsigned[0], 0x02);
        prop_assert_eq!(decode_unsigned(&unsigned).unwrap(), intent);
    }

    #[test]
    fn signed_envelope_recovers_signer(intent in any_intent(), key in any_private_key()) {
        let digest = keccak256(&encode_unsigned(&intent));
        let sig = sign_digest(&digest, &key, None).unwrap();
        let signed = encode_signed(&intent, &sig);

        let (decoded, decoded_sig) = decode_signed(&signed).unwrap();
        prop_assert_eq!(&decoded, &intent);
        prop_assert_eq!(decoded_sig, sig);
        prop_assert_eq!(recover_signer(&digest, &decoded_sig).unwrap(), key.address().unwrap());
    }
}
