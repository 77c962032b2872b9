#![no_main]

use libfuzzer_sys::fuzz_target;

use ziproto::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut d = Decoder::new(data);
    let mut steps = 0;
    while !d.is_end() && steps < 64 {
        let _ = d.get_type();
        let _ = d.get_str();
        let _ = d.get_integer();
        if let Ok(items) = d.items() {
            for entry in items.take(16) {
                let Ok((k, v)) = entry else { break };
                let _ = k.get_bytes();
                let _ = v.len();
            }
        }
        let _ = d.get_index(3);
        let _ = d.get_key("a");
        match d.next() {
            Ok(next) => d = next,
            Err(_) => break,
        }
        steps += 1;
    }
});
