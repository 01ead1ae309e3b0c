#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::{decode_message, encode_message, Limits, ReadMode};

fuzz_target!(|data: &[u8]| {
    let limits = Limits::default();
    let _ = decode_message(data, ReadMode::Permissive, &limits);

    // Anything strict mode accepts must survive re-encoding.
    if let Ok(decoded) = decode_message(data, ReadMode::Strict, &limits) {
        let bytes = encode_message(&decoded.value);
        let again = decode_message(&bytes, ReadMode::Strict, &limits)
            .expect("re-encoded message decodes");
        assert_eq!(again.value, decoded.value);
    }
});
