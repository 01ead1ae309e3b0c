//! Protobuf-compatible field framing.
//!
//! Only the two wire types the schema uses are accepted: varint (0) and
//! length-delimited (2). Every read is strict.

use bitstream::{ByteCursor, ByteWriter};

use crate::error::{EnvelopeError, EnvelopeResult};

const WIRE_VARINT: u8 = 0;
const WIRE_LEN: u8 = 2;

#[derive(Debug, Clone, Copy)]
enum Value<'a> {
    Varint(u64),
    Bytes(&'a [u8]),
}

/// One decoded field of a named message.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field<'a> {
    message: &'static str,
    pub(crate) number: u64,
    value: Value<'a>,
}

impl<'a> Field<'a> {
    fn wrong_wire_type(&self) -> EnvelopeError {
        EnvelopeError::WrongWireType {
            message: self.message,
            field: self.number,
            wire_type: match self.value {
                Value::Varint(_) => WIRE_VARINT,
                Value::Bytes(_) => WIRE_LEN,
            },
        }
    }

    fn out_of_range(&self, value: u64) -> EnvelopeError {
        EnvelopeError::ValueOutOfRange {
            message: self.message,
            field: self.number,
            value,
        }
    }

    /// The error for a field number the enclosing message does not define.
    pub(crate) fn unknown(&self) -> EnvelopeError {
        EnvelopeError::UnknownField {
            message: self.message,
            field: self.number,
        }
    }

    pub(crate) fn duplicate(&self) -> EnvelopeError {
        EnvelopeError::DuplicateOneOf {
            message: self.message,
            field: self.number,
        }
    }

    pub(crate) fn u64(&self) -> EnvelopeResult<u64> {
        match self.value {
            Value::Varint(value) => Ok(value),
            Value::Bytes(_) => Err(self.wrong_wire_type()),
        }
    }

    pub(crate) fn u32(&self) -> EnvelopeResult<u32> {
        let value = self.u64()?;
        u32::try_from(value).map_err(|_| self.out_of_range(value))
    }

    pub(crate) fn u16(&self) -> EnvelopeResult<u16> {
        let value = self.u64()?;
        u16::try_from(value).map_err(|_| self.out_of_range(value))
    }

    pub(crate) fn u8(&self) -> EnvelopeResult<u8> {
        let value = self.u64()?;
        u8::try_from(value).map_err(|_| self.out_of_range(value))
    }

    pub(crate) fn bool(&self) -> EnvelopeResult<bool> {
        match self.u64()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.out_of_range(other)),
        }
    }

    /// Converts a varint through `parse`, reporting `None` as out of range.
    pub(crate) fn enumerated<T>(&self, parse: impl FnOnce(u64) -> Option<T>) -> EnvelopeResult<T> {
        let value = self.u64()?;
        parse(value).ok_or_else(|| self.out_of_range(value))
    }

    pub(crate) fn bytes(&self) -> EnvelopeResult<&'a [u8]> {
        match self.value {
            Value::Bytes(bytes) => Ok(bytes),
            Value::Varint(_) => Err(self.wrong_wire_type()),
        }
    }

    /// Opens this field as an embedded message named `name`.
    pub(crate) fn message(&self, name: &'static str) -> EnvelopeResult<FieldReader<'a>> {
        Ok(FieldReader::new(name, self.bytes()?))
    }

    /// Appends a repeated varint field, accepting packed and unpacked forms.
    pub(crate) fn push_varints(&self, out: &mut Vec<u64>) -> EnvelopeResult<()> {
        match self.value {
            Value::Varint(value) => out.push(value),
            Value::Bytes(bytes) => {
                let mut cursor = ByteCursor::strict(bytes);
                while !cursor.is_empty() {
                    out.push(cursor.read_varu64()?);
                }
            }
        }
        Ok(())
    }
}

/// Iterates the fields of one message in wire order.
pub(crate) struct FieldReader<'a> {
    message: &'static str,
    cursor: ByteCursor<'a>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(message: &'static str, bytes: &'a [u8]) -> Self {
        Self {
            message,
            cursor: ByteCursor::strict(bytes),
        }
    }

    pub(crate) fn next_field(&mut self) -> EnvelopeResult<Option<Field<'a>>> {
        if self.cursor.is_empty() {
            return Ok(None);
        }
        let key = self.cursor.read_varu64()?;
        let number = key >> 3;
        let wire_type = (key & 0x7) as u8;
        let value = match wire_type {
            WIRE_VARINT => Value::Varint(self.cursor.read_varu64()?),
            WIRE_LEN => {
                let len = self.cursor.read_varu64()?;
                let len = usize::try_from(len).unwrap_or(usize::MAX);
                Value::Bytes(self.cursor.read_bytes(len)?)
            }
            _ => {
                return Err(EnvelopeError::WrongWireType {
                    message: self.message,
                    field: number,
                    wire_type,
                })
            }
        };
        Ok(Some(Field {
            message: self.message,
            number,
            value,
        }))
    }
}

/// Writes fields in ascending order. Zero scalars are omitted, as proto3 does.
#[derive(Debug, Default)]
pub(crate) struct FieldWriter {
    out: ByteWriter,
}

impl FieldWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn key(&mut self, number: u64, wire_type: u8) {
        self.out.write_varu64((number << 3) | u64::from(wire_type));
    }

    pub(crate) fn varint(&mut self, number: u64, value: u64) {
        if value != 0 {
            self.key(number, WIRE_VARINT);
            self.out.write_varu64(value);
        }
    }

    pub(crate) fn bool(&mut self, number: u64, value: bool) {
        self.varint(number, u64::from(value));
    }

    pub(crate) fn bytes(&mut self, number: u64, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.len_prefixed(number, bytes);
        }
    }

    /// Writes an embedded message; present even when empty.
    pub(crate) fn message(&mut self, number: u64, build: impl FnOnce(&mut Self)) {
        let mut inner = Self::new();
        build(&mut inner);
        let bytes = inner.finish();
        self.len_prefixed(number, &bytes);
    }

    /// Writes a packed repeated varint field.
    pub(crate) fn packed(&mut self, number: u64, values: impl IntoIterator<Item = u64>) {
        let mut inner = ByteWriter::new();
        for value in values {
            inner.write_varu64(value);
        }
        self.bytes(number, &inner.finish());
    }

    fn len_prefixed(&mut self, number: u64, bytes: &[u8]) {
        self.key(number, WIRE_LEN);
        self.out.write_varu64(bytes.len() as u64);
        self.out.write_bytes(bytes);
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_scalars_are_omitted() {
        let mut w = FieldWriter::new();
        w.varint(1, 0);
        w.bool(2, false);
        w.bytes(3, &[]);
        assert!(w.finish().is_empty());
    }

    #[test]
    fn key_layout_matches_protobuf() {
        let mut w = FieldWriter::new();
        w.varint(1, 150);
        assert_eq!(w.finish(), vec![0x08, 0x96, 0x01]);

        let mut w = FieldWriter::new();
        w.message(2, |inner| inner.varint(1, 1));
        assert_eq!(w.finish(), vec![0x12, 0x02, 0x08, 0x01]);
    }

    #[test]
    fn empty_message_is_still_written() {
        let mut w = FieldWriter::new();
        w.message(3, |_| {});
        assert_eq!(w.finish(), vec![0x1A, 0x00]);
    }

    #[test]
    fn reader_walks_fields() {
        let bytes = [0x08, 0x96, 0x01, 0x12, 0x02, 0x08, 0x01];
        let mut reader = FieldReader::new("Test", &bytes);
        let first = reader.next_field().unwrap().unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(first.u32().unwrap(), 150);
        let second = reader.next_field().unwrap().unwrap();
        assert_eq!(second.number, 2);
        let mut inner = second.message("Inner").unwrap();
        assert!(inner.next_field().unwrap().unwrap().bool().unwrap());
        assert!(reader.next_field().unwrap().is_none());
    }

    #[test]
    fn fixed_width_wire_types_are_rejected() {
        let mut reader = FieldReader::new("Test", &[0x0D, 0, 0, 0, 0]);
        assert_eq!(
            reader.next_field().unwrap_err(),
            EnvelopeError::WrongWireType {
                message: "Test",
                field: 1,
                wire_type: 5
            }
        );
    }

    #[test]
    fn short_payload_is_truncated() {
        let mut reader = FieldReader::new("Test", &[0x12, 0x05, 0x01]);
        assert!(matches!(
            reader.next_field().unwrap_err(),
            EnvelopeError::Truncated { .. }
        ));
    }

    #[test]
    fn scalar_range_checks() {
        let bytes = [0x08, 0x80, 0x02];
        let mut reader = FieldReader::new("Test", &bytes);
        let field = reader.next_field().unwrap().unwrap();
        assert_eq!(
            field.u8().unwrap_err(),
            EnvelopeError::ValueOutOfRange {
                message: "Test",
                field: 1,
                value: 256
            }
        );
        assert_eq!(field.u16().unwrap(), 256);
        assert!(field.bool().is_err());
        assert!(field.bytes().is_err());
    }

    #[test]
    fn packed_and_unpacked_varints() {
        let mut w = FieldWriter::new();
        w.packed(1, [1, 300]);
        w.varint(1, 7);
        let bytes = w.finish();
        let mut reader = FieldReader::new("Test", &bytes);
        let mut values = Vec::new();
        while let Some(field) = reader.next_field().unwrap() {
            field.push_varints(&mut values).unwrap();
        }
        assert_eq!(values, vec![1, 300, 7]);
    }
}
