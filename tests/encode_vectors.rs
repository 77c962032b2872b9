#![cfg(feature = "alloc")]

use ziproto::{encode, zi, Decoder, Encoder, ErrorCode, ZiInteger, ZiValue};

fn bytes_of(f: impl FnOnce(&mut Encoder) -> Result<(), ziproto::ZiError>) -> Vec<u8> {
    let mut enc = Encoder::new();
    f(&mut enc).unwrap();
    enc.into_vec()
}

#[test]
fn unsigned_integers_use_the_smallest_form() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7f]),
        (128, &[0xcc, 0x80]),
        (255, &[0xcc, 0xff]),
        (256, &[0xcd, 0x01, 0x00]),
        (65_535, &[0xcd, 0xff, 0xff]),
        (65_536, &[0xce, 0x00, 0x01, 0x00, 0x00]),
        (u64::from(u32::MAX), &[0xce, 0xff, 0xff, 0xff, 0xff]),
        (
            1 << 32,
            &[0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00],
        ),
    ];
    for &(v, want) in cases {
        assert_eq!(bytes_of(|e| e.uint(v)), want, "{v}");
    }
}

#[test]
fn signed_integers_use_the_smallest_form() {
    let cases: &[(i64, &[u8])] = &[
        (5, &[0x05]),
        (300, &[0xcd, 0x01, 0x2c]),
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0xd0, 0xdf]),
        (-128, &[0xd0, 0x80]),
        (-129, &[0xd1, 0xff, 0x7f]),
        (-32_769, &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
        (
            i64::from(i32::MIN) - 1,
            &[0xd3, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff],
        ),
    ];
    for &(v, want) in cases {
        assert_eq!(bytes_of(|e| e.int(v)), want, "{v}");
    }
}

#[test]
fn integer_of_either_sign() {
    assert_eq!(
        bytes_of(|e| e.integer(ZiInteger::from(u64::MAX))),
        [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(bytes_of(|e| e.integer(ZiInteger::from(-2i64))), [0xfe]);
}

#[test]
fn floats_keep_their_width() {
    assert_eq!(
        bytes_of(|e| e.float(1.5)),
        [0xcb, 0x3f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        bytes_of(|e| e.float32(1.5)),
        [0xca, 0x3f, 0xc0, 0x00, 0x00]
    );
}

#[test]
fn string_headers_at_each_boundary() {
    let header = |len: usize| {
        let s = "x".repeat(len);
        let out = bytes_of(|e| e.str(&s));
        assert!(out.ends_with(s.as_bytes()));
        out[..out.len() - len].to_vec()
    };
    assert_eq!(header(0), [0xa0]);
    assert_eq!(header(31), [0xbf]);
    assert_eq!(header(32), [0xd9, 0x20]);
    assert_eq!(header(255), [0xd9, 0xff]);
    assert_eq!(header(256), [0xda, 0x01, 0x00]);
    assert_eq!(header(65_536), [0xdb, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn binary_headers_have_no_fix_form() {
    assert_eq!(bytes_of(|e| e.bin(&[])), [0xc4, 0x00]);
    assert_eq!(bytes_of(|e| e.bin(&[7])), [0xc4, 0x01, 0x07]);

    let big = vec![0u8; 256];
    let out = bytes_of(|e| e.bin(&big));
    assert_eq!(out[..3], [0xc5, 0x01, 0x00]);
    assert_eq!(out.len(), 259);
}

#[test]
fn container_headers_at_each_boundary() {
    let array_of = |n: usize| {
        bytes_of(|e| {
            e.array(n, |a| {
                for _ in 0..n {
                    a.nil()?;
                }
                Ok(())
            })
        })
    };
    assert_eq!(array_of(0), [0x90]);
    assert_eq!(array_of(15)[0], 0x9f);
    assert_eq!(array_of(16)[..3], [0xdc, 0x00, 0x10]);
    assert_eq!(array_of(65_536)[..5], [0xdd, 0x00, 0x01, 0x00, 0x00]);

    let map_of = |n: usize| {
        bytes_of(|e| {
            e.map(n, |m| {
                for i in 0..n {
                    m.entry_with(|k| k.uint(i as u64), |v| v.nil())?;
                }
                Ok(())
            })
        })
    };
    assert_eq!(map_of(0), [0x80]);
    assert_eq!(map_of(15)[0], 0x8f);
    assert_eq!(map_of(16)[..3], [0xde, 0x00, 0x10]);
}

#[test]
fn builders_write_in_call_order() {
    let out = bytes_of(|e| {
        e.map(2, |m| {
            m.entry("b", |v| v.int(1))?;
            m.entry("a", |v| {
                v.array(2, |a| {
                    a.bool(true)?;
                    a.nil()
                })
            })
        })
    });
    assert_eq!(
        out,
        [0x82, 0xa1, b'b', 0x01, 0xa1, b'a', 0x92, 0xc3, 0xc0]
    );
}

#[test]
fn array_builder_count_mismatch_leaves_no_output() {
    let mut enc = Encoder::new();
    enc.nil().unwrap();

    let err = enc.array(2, |a| a.int(1)).unwrap_err();
    assert_eq!(err.code, ErrorCode::ArrayLenMismatch);
    assert_eq!(enc.as_bytes(), [0xc0]);

    let err = enc
        .array(1, |a| {
            a.int(1)?;
            a.int(2)
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ArrayLenMismatch);
    assert_eq!(enc.as_bytes(), [0xc0]);
}

#[test]
fn map_builder_count_mismatch_leaves_no_output() {
    let mut enc = Encoder::new();
    let err = enc.map(1, |_| Ok(())).unwrap_err();
    assert_eq!(err.code, ErrorCode::MapLenMismatch);
    assert!(enc.is_empty());

    let err = enc
        .map(1, |m| {
            m.entry("a", |v| v.nil())?;
            assert_eq!(m.remaining(), 0);
            m.entry("b", |v| v.nil())
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MapLenMismatch);
    assert!(enc.is_empty());
}

#[test]
fn raw_splices_existing_encodings() {
    // {"keep": [1, 2], "drop": nil}
    let src = [
        0x82, 0xa4, b'k', b'e', b'e', b'p', 0x92, 0x01, 0x02, 0xa4, b'd', b'r', b'o', b'p', 0xc0,
    ];
    let keep = Decoder::new(&src).get_key("keep").unwrap().unwrap();

    let out = bytes_of(|e| e.array(2, |a| {
        a.raw(keep)?;
        a.str("new")
    }));
    assert_eq!(out, [0x92, 0x92, 0x01, 0x02, 0xa3, b'n', b'e', b'w']);
}

#[test]
fn value_trees_encode_like_the_builder() {
    let tree = ZiValue::Map(vec![
        (ZiValue::from("b"), ZiValue::from(1)),
        (
            ZiValue::from("a"),
            ZiValue::Array(vec![ZiValue::from(true), ZiValue::Nil]),
        ),
    ]);
    assert_eq!(
        encode(&tree).unwrap(),
        [0x82, 0xa1, b'b', 0x01, 0xa1, b'a', 0x92, 0xc3, 0xc0]
    );
    assert_eq!(tree.encode().unwrap(), encode(&tree).unwrap());
}

#[test]
fn macro_output_matches_the_wire_example() {
    let v = zi!([1, "a"]).unwrap();
    assert_eq!(encode(&v).unwrap(), [0x92, 0x01, 0xa1, 0x61]);
}

#[test]
fn encoded_values_decode_back_in_place() {
    let mut enc = Encoder::with_capacity(32);
    enc.array(3, |a| {
        a.int(-200)?;
        a.bin(b"\x00\x01")?;
        a.map(1, |m| m.entry("k", |v| v.float(0.25)))
    })
    .unwrap();
    let bytes = enc.into_vec();

    let d = ziproto::validate(&bytes, ziproto::DecodeLimits::unlimited()).unwrap();
    assert_eq!(d.get_index(0).unwrap().unwrap().get_int().unwrap(), -200);
    assert_eq!(
        d.get_index(1).unwrap().unwrap().get_bin().unwrap(),
        b"\x00\x01"
    );
    assert_eq!(
        d.at(ziproto::path!(2, "k"))
            .unwrap()
            .unwrap()
            .get_float()
            .unwrap(),
        0.25
    );
}

fn nested_arrays(levels: usize) -> ZiValue {
    let mut v = ZiValue::Nil;
    for _ in 0..levels {
        v = ZiValue::Array(vec![v]);
    }
    v
}

#[test]
fn value_encoding_is_depth_bounded() {
    let max = ziproto::DEFAULT_MAX_DEPTH;

    let deepest = encode(&nested_arrays(max)).unwrap();
    assert_eq!(deepest.len(), max + 1);
    ziproto::validate(&deepest, ziproto::DecodeLimits::unlimited()).unwrap();

    let err = encode(&nested_arrays(max + 1)).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);

    let mut enc = Encoder::new();
    assert!(enc.value(&nested_arrays(max + 1)).is_err());
    assert!(enc.is_empty());
}
