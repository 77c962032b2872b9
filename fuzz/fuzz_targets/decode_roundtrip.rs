#![no_main]

use libfuzzer_sys::fuzz_target;

use ziproto::{decode_value, encode, DecodeLimits};

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits::for_bytes(data.len());
    let Ok(v) = decode_value(data, limits) else {
        return;
    };
    let bytes = encode(&v).expect("decoded value must re-encode");
    let again = decode_value(&bytes, DecodeLimits::for_bytes(bytes.len()))
        .expect("minimal encoding must decode");
    if v == again {
        // minimal-width encoding is a fixed point
        assert_eq!(encode(&again).expect("re-encode"), bytes);
    }
});
