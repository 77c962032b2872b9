use ziproto::{Decoder, ErrorCode, ZiKind};

fn expected_kind(head: u8) -> Option<ZiKind> {
    match head {
        0x00..=0x7f | 0xcc..=0xd3 | 0xe0..=0xff => Some(ZiKind::Int),
        0x80..=0x8f | 0xde | 0xdf => Some(ZiKind::Map),
        0x90..=0x9f | 0xdc | 0xdd => Some(ZiKind::Array),
        0xa0..=0xbf | 0xd9..=0xdb => Some(ZiKind::Str),
        0xc0 => Some(ZiKind::Nil),
        0xc2 | 0xc3 => Some(ZiKind::Bool),
        0xc4..=0xc6 => Some(ZiKind::Bin),
        0xca | 0xcb => Some(ZiKind::Float),
        _ => None,
    }
}

#[test]
fn every_head_byte_is_classified() {
    let mut assigned = 0;
    for head in 0..=u8::MAX {
        let mut bytes = [0u8; 9];
        bytes[0] = head;
        let got = Decoder::new(&bytes).get_type();
        match expected_kind(head) {
            Some(kind) => {
                assert_eq!(got.unwrap(), kind, "head {head:#04x}");
                assigned += 1;
            }
            None => {
                let err = got.unwrap_err();
                assert_eq!(err.code, ErrorCode::UnknownHead(head), "head {head:#04x}");
                assert_eq!(err.offset, 0);
            }
        }
    }
    // c1, c7..=c9 and d4..=d8 are the only gaps
    assert_eq!(assigned, 256 - 9);
}

#[test]
fn fixed_width_headers_need_their_trailing_bytes() {
    let widths: &[(u8, usize)] = &[
        (0xcc, 1),
        (0xcd, 2),
        (0xce, 4),
        (0xcf, 8),
        (0xd0, 1),
        (0xd1, 2),
        (0xd2, 4),
        (0xd3, 8),
        (0xca, 4),
        (0xcb, 8),
        (0xc4, 1),
        (0xc5, 2),
        (0xc6, 4),
        (0xd9, 1),
        (0xda, 2),
        (0xdb, 4),
        (0xdc, 2),
        (0xdd, 4),
        (0xde, 2),
        (0xdf, 4),
    ];
    for &(head, width) in widths {
        let mut bytes = vec![head];
        bytes.resize(width, 0);
        let err = Decoder::new(&bytes).get_type().unwrap_err();
        assert_eq!(err.code, ErrorCode::BufferUnderrun, "head {head:#04x}");

        bytes.push(0);
        assert!(Decoder::new(&bytes).get_type().is_ok(), "head {head:#04x}");
    }
}

#[test]
fn single_byte_values_skip_to_the_next_byte() {
    for head in (0x00..=0x7f).chain(0xe0..=0xff).chain([0xc0, 0xc2, 0xc3, 0x80, 0x90, 0xa0]) {
        let bytes = [head, 0xc0];
        assert_eq!(Decoder::new(&bytes).end().unwrap(), 1, "head {head:#04x}");
    }
}
