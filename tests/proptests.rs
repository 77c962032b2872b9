// Property-based tests for ZiProto encode/decode roundtrips.
//
// Sizes and depths stay small to keep CI fast.
#![cfg(feature = "alloc")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use ziproto::{decode_value, encode, validate, DecodeLimits, Decoder, ZiValue};

fn arb_float() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("NaN never compares equal", |f| !f.is_nan())
}

fn arb_leaf() -> impl Strategy<Value = ZiValue> {
    prop_oneof![
        Just(ZiValue::Nil),
        any::<bool>().prop_map(ZiValue::Bool),
        any::<i64>().prop_map(ZiValue::from),
        any::<u64>().prop_map(ZiValue::from),
        arb_float().prop_map(ZiValue::Float),
        ".{0,40}".prop_map(ZiValue::Str),
        proptest::collection::vec(any::<u8>(), 0..300).prop_map(ZiValue::Bin),
    ]
}

fn arb_value() -> impl Strategy<Value = ZiValue> {
    arb_leaf().prop_recursive(4, 256, 20, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..20).prop_map(ZiValue::Array),
            proptest::collection::vec((inner.clone(), inner), 0..20).prop_map(ZiValue::Map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn encode_then_decode_is_identity(v in arb_value()) {
        let bytes = encode(&v).unwrap();
        let back = decode_value(&bytes, DecodeLimits::unlimited()).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn views_agree_with_materialization(v in arb_value()) {
        let bytes = encode(&v).unwrap();

        let root = validate(&bytes, DecodeLimits::unlimited()).unwrap();
        prop_assert_eq!(root.get_type().unwrap(), v.kind());
        prop_assert_eq!(root.get().unwrap(), v.clone());

        let d = Decoder::new(&bytes);
        let after = d.next().unwrap();
        prop_assert!(after.is_end());
        prop_assert_eq!(d.get_bytes().unwrap(), &bytes[..]);
    }

    #[test]
    fn children_are_reachable_by_index(items in proptest::collection::vec(arb_value(), 0..10)) {
        let bytes = encode(&ZiValue::Array(items.clone())).unwrap();
        let d = Decoder::new(&bytes);
        prop_assert_eq!(d.len().unwrap(), items.len());
        for (i, want) in items.iter().enumerate() {
            let child = d.get_index(i).unwrap().unwrap();
            prop_assert_eq!(&child.get().unwrap(), want);
        }
        prop_assert!(d.get_index(items.len()).unwrap().is_none());
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let limits = DecodeLimits::for_bytes(bytes.len());
        let validated = validate(&bytes, limits);
        let decoded = decode_value(&bytes, limits);
        prop_assert_eq!(validated.is_ok(), decoded.is_ok());
        if let (Err(a), Err(b)) = (validated, decoded) {
            prop_assert_eq!(a, b);
        }

        let d = Decoder::new(&bytes);
        let _ = d.get_type();
        let _ = d.next();
        if let Ok(it) = d.elements() {
            for child in it {
                if child.is_err() {
                    break;
                }
            }
        }
        let _ = d.get_key("a");
    }
}
