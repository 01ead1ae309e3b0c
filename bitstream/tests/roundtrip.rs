use bitstream::{ByteCursor, ByteWriter, CursorError, ReadMode};

#[test]
fn writer_roundtrip_mixed() {
    let mut writer = ByteWriter::new();
    writer.write_u8(1);
    writer.write_u16(0xBEEF);
    writer.write_varu64(300);
    writer.write_u64(0xDEAD_BEEF_0000_0001);
    let bytes = writer.finish();

    let mut cursor = ByteCursor::strict(&bytes);
    assert_eq!(cursor.read_u8().unwrap(), 1);
    assert_eq!(cursor.read_u16().unwrap(), 0xBEEF);
    assert_eq!(cursor.read_varu64().unwrap(), 300);
    assert_eq!(cursor.read_u64().unwrap(), 0xDEAD_BEEF_0000_0001);
}

#[test]
fn same_bytes_differ_only_on_underflow() {
    let mut writer = ByteWriter::new();
    writer.write_u32(7);
    writer.write_u8(9);
    let bytes = writer.finish();

    for mode in [ReadMode::Permissive, ReadMode::Strict] {
        let mut cursor = ByteCursor::new(&bytes, mode);
        assert_eq!(cursor.read_u32().unwrap(), 7);
        assert_eq!(cursor.read_u8().unwrap(), 9);
        let tail = cursor.read_u32();
        match mode {
            ReadMode::Permissive => {
                assert_eq!(tail.unwrap(), 0);
                assert!(cursor.truncated());
            }
            ReadMode::Strict => {
                assert_eq!(
                    tail.unwrap_err(),
                    CursorError::Truncated {
                        requested: 4,
                        available: 0
                    }
                );
            }
        }
    }
}
