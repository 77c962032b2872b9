#![no_main]

use libfuzzer_sys::fuzz_target;

use ziproto::{validate, DecodeLimits};

fn fuzz_limits(input_len: usize) -> DecodeLimits {
    let max = input_len.min(1 << 20);
    DecodeLimits {
        max_input_bytes: max,
        max_depth: 64,
        max_total_items: 1 << 16,
        max_array_len: 1 << 12,
        max_map_len: 1 << 12,
        max_bin_len: max,
        max_str_len: max,
    }
}

fuzz_target!(|data: &[u8]| {
    let _ = validate(data, fuzz_limits(data.len()));
});
