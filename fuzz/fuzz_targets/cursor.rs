#![no_main]

use bitstream::{ByteCursor, ReadMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let mode = if first & 1 == 0 {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };
    let mut cursor = ByteCursor::new(rest, mode);

    // Input bytes pick a bounded sequence of reads.
    for &op in rest.iter().take(1024) {
        match op % 8 {
            0 => {
                let _ = cursor.read_u8();
            }
            1 => {
                let _ = cursor.read_u16();
            }
            2 => {
                let _ = cursor.read_u32();
            }
            3 => {
                let _ = cursor.read_u64();
            }
            4 => {
                let _ = cursor.read_varu64();
            }
            5 => {
                let _ = cursor.read_varu32();
            }
            6 => {
                let _ = cursor.skip(usize::from(op >> 3));
            }
            _ => {
                let _ = cursor.read_bytes(usize::from(op >> 3));
            }
        }
        assert!(cursor.position() <= rest.len());
    }
});
