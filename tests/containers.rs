use ziproto::{path, Decoder, ErrorCode, Expected, PathElem, ZiKind};

// {"a": 1, "b": [true, nil]}
const DOC: [u8; 9] = [0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0x92, 0xc3, 0xc0];

#[test]
fn map_lookup_by_string_key() {
    let d = Decoder::new(&DOC);
    assert!(d.is_map());
    assert_eq!(d.len().unwrap(), 2);

    assert_eq!(d.get_key("a").unwrap().unwrap().get_int().unwrap(), 1);
    let b = d.get_key("b").unwrap().unwrap();
    assert_eq!(b.len().unwrap(), 2);
    assert_eq!(b.position(), 6);

    assert!(d.get_key("missing").unwrap().is_none());
}

#[test]
fn map_items_in_wire_order() {
    let d = Decoder::new(&DOC);
    let keys: Vec<&str> = d
        .items()
        .unwrap()
        .map(|entry| entry.unwrap().0.get_str().unwrap())
        .collect();
    assert_eq!(keys, ["a", "b"]);

    let (k, v) = d.items().unwrap().nth(1).unwrap().unwrap();
    assert_eq!(k.get_str().unwrap(), "b");
    assert!(v.is_array());
}

#[test]
fn nested_paths() {
    let d = Decoder::new(&DOC);
    assert!(d.at(path!("b", 0)).unwrap().unwrap().get_bool().unwrap());
    assert!(d.at(path!("b", 1)).unwrap().unwrap().is_nil());
    assert!(d.at(path!("b", 2)).unwrap().is_none());
    assert!(d.at(path!("nope", 0)).unwrap().is_none());
    assert_eq!(d.at(&[]).unwrap().unwrap(), d);

    let explicit = [PathElem::Key("b"), PathElem::Index(0)];
    assert_eq!(d.at(&explicit).unwrap(), d.at(path!("b", 0)).unwrap());
}

#[test]
fn path_through_a_scalar_is_a_mismatch() {
    let err = Decoder::new(&DOC).at(path!("a", 0)).unwrap_err();
    assert_eq!(
        err.code,
        ErrorCode::TypeMismatch {
            expected: Expected::Kind(ZiKind::Array),
            actual: ZiKind::Int,
        }
    );
    assert_eq!(err.offset, 3);
}

#[test]
fn index_lookup() {
    // [10, 20, 30]
    let bytes = [0x93, 0x0a, 0x14, 0x1e];
    let d = Decoder::new(&bytes);
    assert_eq!(d.get_index(2).unwrap().unwrap().get_int().unwrap(), 30);
    assert!(d.get_index(3).unwrap().is_none());
    assert!(d.get_index(usize::MAX).unwrap().is_none());

    let err = Decoder::new(&DOC).get_index(0).unwrap_err();
    assert_eq!(
        err.code,
        ErrorCode::TypeMismatch {
            expected: Expected::Kind(ZiKind::Array),
            actual: ZiKind::Map,
        }
    );
}

#[test]
fn key_lookup_on_array_is_a_mismatch() {
    let err = Decoder::new(&[0x90]).get_key("a").unwrap_err();
    assert_eq!(
        err.code,
        ErrorCode::TypeMismatch {
            expected: Expected::Kind(ZiKind::Map),
            actual: ZiKind::Array,
        }
    );
}

#[test]
fn len_and_is_empty() {
    assert!(Decoder::new(&[0x90]).is_empty().unwrap());
    assert!(Decoder::new(&[0x80]).is_empty().unwrap());
    assert!(!Decoder::new(&DOC).is_empty().unwrap());

    // array16 with three elements, map16 with one pair
    assert_eq!(
        Decoder::new(&[0xdc, 0x00, 0x03, 0x01, 0x02, 0x03])
            .len()
            .unwrap(),
        3
    );
    assert_eq!(
        Decoder::new(&[0xde, 0x00, 0x01, 0xa1, 0x6b, 0xc0])
            .len()
            .unwrap(),
        1
    );

    let err = Decoder::new(&[0x05]).len().unwrap_err();
    assert_eq!(
        err.code,
        ErrorCode::TypeMismatch {
            expected: Expected::Container,
            actual: ZiKind::Int,
        }
    );
}

#[test]
fn declared_count_larger_than_input() {
    let huge = [0xdd, 0xff, 0xff, 0xff, 0xff];
    let err = Decoder::new(&huge).len().unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferUnderrun);
    assert_eq!(err.offset, 0);

    let map = [0x82, 0x01, 0x02, 0x03];
    assert_eq!(
        Decoder::new(&map).items().unwrap_err().code,
        ErrorCode::BufferUnderrun
    );
}

#[test]
fn non_string_keys_are_skipped_by_get_key() {
    // {1: "x", "x": 2}
    let bytes = [0x82, 0x01, 0xa1, 0x78, 0xa1, 0x78, 0x02];
    let d = Decoder::new(&bytes);
    assert_eq!(d.get_key("x").unwrap().unwrap().get_int().unwrap(), 2);
}

#[test]
fn first_duplicate_key_wins() {
    // {"k": 1, "k": 2}
    let bytes = [0x82, 0xa1, 0x6b, 0x01, 0xa1, 0x6b, 0x02];
    let d = Decoder::new(&bytes);
    assert_eq!(d.get_key("k").unwrap().unwrap().get_int().unwrap(), 1);
}

#[cfg(feature = "alloc")]
#[test]
fn lookup_by_arbitrary_key() {
    use ziproto::ZiValue;

    // {1: "x", [2]: "y", nil: "z"}
    let bytes = [0x83, 0x01, 0xa1, 0x78, 0x91, 0x02, 0xa1, 0x79, 0xc0, 0xa1, 0x7a];
    let d = Decoder::new(&bytes);

    let by_int = d.get_key_value(&ZiValue::from(1)).unwrap().unwrap();
    assert_eq!(by_int.get_str().unwrap(), "x");

    let by_array = d
        .get_key_value(&ZiValue::Array(vec![ZiValue::from(2u8)]))
        .unwrap()
        .unwrap();
    assert_eq!(by_array.get_str().unwrap(), "y");

    let by_nil = d.get_key_value(&ZiValue::Nil).unwrap().unwrap();
    assert_eq!(by_nil.get_str().unwrap(), "z");

    assert!(d.get_key_value(&ZiValue::from(3)).unwrap().is_none());
}

#[test]
fn array_iterator_yields_each_element() {
    // [1, "a", [2]]
    let bytes = [0x93, 0x01, 0xa1, 0x61, 0x91, 0x02];
    let it = Decoder::new(&bytes).elements().unwrap();
    assert_eq!(it.size_hint(), (0, Some(3)));

    let positions: Vec<usize> = it.map(|e| e.unwrap().position()).collect();
    assert_eq!(positions, [1, 2, 4]);
}

#[test]
fn iterator_stops_after_first_error() {
    // [1, <truncated uint16>]
    let bytes = [0x92, 0x01, 0xcd, 0x00];
    let mut it = Decoder::new(&bytes).elements().unwrap();

    assert_eq!(it.next().unwrap().unwrap().get_int().unwrap(), 1);
    let err = it.next().unwrap().unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferUnderrun);
    assert_eq!(err.offset, 2);
    assert!(it.next().is_none());
    assert_eq!(it.size_hint(), (0, Some(0)));
}

#[test]
fn iterating_the_wrong_container_kind() {
    assert!(Decoder::new(&DOC).elements().unwrap_err().is_type_mismatch());
    assert!(Decoder::new(&[0x90]).items().unwrap_err().is_type_mismatch());
}

#[test]
fn sibling_views_skip_nested_containers() {
    // [[[1, 2], {"a": [3]}], 4]
    let bytes = [
        0x92, 0x92, 0x92, 0x01, 0x02, 0x81, 0xa1, 0x61, 0x91, 0x03, 0x04,
    ];
    let d = Decoder::new(&bytes);
    assert_eq!(d.get_index(1).unwrap().unwrap().get_int().unwrap(), 4);
    assert_eq!(
        d.at(path!(0, 1, "a", 0))
            .unwrap()
            .unwrap()
            .get_int()
            .unwrap(),
        3
    );
}
