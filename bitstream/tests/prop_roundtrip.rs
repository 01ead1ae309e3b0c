use bitstream::{ByteCursor, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    U16(u16),
    U32(u32),
    I32(i32),
    U64(u64),
    VarU64(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<u16>().prop_map(Op::U16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<u64>().prop_map(Op::U64),
        any::<u64>().prop_map(Op::VarU64),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = ByteWriter::new();
        for op in &ops {
            match op {
                Op::U8(v) => writer.write_u8(*v),
                Op::U16(v) => writer.write_u16(*v),
                Op::U32(v) => writer.write_u32(*v),
                Op::I32(v) => writer.write_i32(*v),
                Op::U64(v) => writer.write_u64(*v),
                Op::VarU64(v) => writer.write_varu64(*v),
            }
        }

        let bytes = writer.finish();
        let mut cursor = ByteCursor::strict(&bytes);
        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(cursor.read_u8().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(cursor.read_u16().unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(cursor.read_u32().unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(cursor.read_i32().unwrap(), *v),
                Op::U64(v) => prop_assert_eq!(cursor.read_u64().unwrap(), *v),
                Op::VarU64(v) => prop_assert_eq!(cursor.read_varu64().unwrap(), *v),
            }
        }
        prop_assert!(cursor.is_empty());
    }

    #[test]
    fn prop_permissive_never_panics(data in prop::collection::vec(any::<u8>(), 0..32), reads in prop::collection::vec(0u8..6, 0..32)) {
        let mut cursor = ByteCursor::permissive(&data);
        for read in reads {
            match read {
                0 => { let _ = cursor.read_u8(); }
                1 => { let _ = cursor.read_u16(); }
                2 => { let _ = cursor.read_u32(); }
                3 => { let _ = cursor.read_u64(); }
                4 => { let _ = cursor.read_varu64(); }
                _ => { let _ = cursor.skip(3); }
            }
            prop_assert!(cursor.position() <= data.len());
        }
    }
}
