#![cfg(feature = "alloc")]

use ziproto::{zi, ErrorCode, ZiInteger, ZiKind, ZiValue};

#[test]
fn scalar_forms() {
    assert_eq!(zi!(nil).unwrap(), ZiValue::Nil);
    assert_eq!(zi!(null).unwrap(), ZiValue::Nil);
    assert_eq!(zi!(true).unwrap(), ZiValue::Bool(true));
    assert_eq!(zi!(false).unwrap(), ZiValue::Bool(false));
    assert_eq!(zi!("txt").unwrap(), ZiValue::Str("txt".into()));
    assert_eq!(zi!(b"\x00\xff").unwrap(), ZiValue::Bin(vec![0x00, 0xff]));
    assert_eq!(zi!(2.5).unwrap(), ZiValue::Float(2.5));
    assert_eq!(zi!('é').unwrap(), ZiValue::from("é"));
}

#[test]
fn integers_of_every_rust_width() {
    assert_eq!(zi!(7u8).unwrap(), zi!(7i64).unwrap());
    assert_eq!(zi!(u64::MAX).unwrap().kind(), ZiKind::Int);
    assert_eq!(zi!(i64::MIN).unwrap().as_i64(), Some(i64::MIN));
    assert_eq!(zi!(usize::MAX).unwrap(), ZiValue::from(u64::MAX));
    assert_eq!(zi!(-5isize).unwrap().as_i64(), Some(-5));
}

#[test]
fn wide_integers_out_of_range_fail() {
    let err = zi!(u128::MAX).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntegerOverflow);

    let err = zi!(i128::from(i64::MIN) - 1).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntegerOverflow);

    assert_eq!(
        zi!(u128::from(u64::MAX)).unwrap(),
        ZiValue::Int(ZiInteger::from(u64::MAX))
    );
}

#[test]
fn arrays_and_maps_keep_written_order() {
    let v = zi!([1, "a", [nil], {}]).unwrap();
    assert_eq!(
        v,
        ZiValue::Array(vec![
            ZiValue::from(1),
            ZiValue::from("a"),
            ZiValue::Array(vec![ZiValue::Nil]),
            ZiValue::Map(vec![]),
        ])
    );

    let m = zi!({ z: 1, a: 2, "z": 3 }).unwrap();
    let keys: Vec<&str> = m
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str().unwrap())
        .collect();
    assert_eq!(keys, ["z", "a", "z"]);
    assert_eq!(m.get("z").and_then(ZiValue::as_i64), Some(1));
}

#[test]
fn key_forms() {
    let name = String::from("dyn");
    let v = zi!({
        ident: 1,
        "literal": 2,
        7: 3,
        (name.as_str()): 4,
        (ZiValue::Nil): 5,
    })
    .unwrap();

    let entries = v.as_map().unwrap();
    assert_eq!(entries[0].0, ZiValue::from("ident"));
    assert_eq!(entries[1].0, ZiValue::from("literal"));
    assert_eq!(entries[2].0, ZiValue::from(7));
    assert_eq!(entries[3].0, ZiValue::from("dyn"));
    assert_eq!(entries[4].0, ZiValue::Nil);
}

#[test]
fn expression_values() {
    let owned = String::from("s");
    let list = vec![zi!(1).unwrap(), zi!(2).unwrap()];
    let none: Option<i32> = None;

    let v = zi!({
        a: owned,
        b: list,
        c: none,
        d: (Some(3)),
        e: (1 + 1),
        f: (-1),
    })
    .unwrap();

    assert_eq!(v.get("a").and_then(ZiValue::as_str), Some("s"));
    assert_eq!(v.get("b").and_then(ZiValue::as_array).map(<[_]>::len), Some(2));
    assert!(v.get("c").is_some_and(ZiValue::is_nil));
    assert_eq!(v.get("d").and_then(ZiValue::as_i64), Some(3));
    assert_eq!(v.get("e").and_then(ZiValue::as_i64), Some(2));
    assert_eq!(v.get("f").and_then(ZiValue::as_i64), Some(-1));
}

#[test]
fn nested_errors_propagate() {
    let err = zi!({ ok: [1, 2], bad: [(u128::MAX)] }).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntegerOverflow);
}
