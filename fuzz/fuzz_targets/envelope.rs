#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = envelope::decode_envelope(data) {
        let bytes = envelope::encode_envelope(&message);
        assert_eq!(envelope::decode_envelope(&bytes).ok(), Some(message));
    }
    if let Ok(answer) = envelope::decode_answer(data) {
        let bytes = envelope::encode_answer(&answer);
        assert_eq!(envelope::decode_answer(&bytes).ok(), Some(answer));
    }
});
