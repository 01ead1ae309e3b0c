//! Bounds-checked little-endian byte cursor.

use crate::error::{CursorError, CursorResult};

/// How a [`ByteCursor`] reacts when a read would run past the buffer end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Short reads yield zero, leave the offset untouched and latch
    /// [`ByteCursor::truncated`].
    #[default]
    Permissive,

    /// Short reads return [`CursorError::Truncated`].
    Strict,
}

/// A little-endian byte reader over a fixed buffer.
///
/// Fixed-width reads never panic. What happens on underflow is decided by the
/// cursor's [`ReadMode`]; varint decoding is always strict about overlong
/// encodings.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    mode: ReadMode,
    truncated: bool,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8], mode: ReadMode) -> Self {
        Self {
            data,
            pos: 0,
            mode,
            truncated: false,
        }
    }

    /// Creates a permissive cursor.
    #[must_use]
    pub const fn permissive(data: &'a [u8]) -> Self {
        Self::new(data, ReadMode::Permissive)
    }

    /// Creates a strict cursor.
    #[must_use]
    pub const fn strict(data: &'a [u8]) -> Self {
        Self::new(data, ReadMode::Strict)
    }

    /// Returns the read mode this cursor was built with.
    #[must_use]
    pub const fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Returns the number of bytes left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` once any permissive read came up short.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> CursorResult<u8> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> CursorResult<u16> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> CursorResult<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> CursorResult<i32> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> CursorResult<u64> {
        self.take::<8>().map(u64::from_le_bytes)
    }

    /// Skips `n` bytes.
    ///
    /// A short skip follows the read mode: it is a no-op that latches the
    /// truncated flag in permissive mode.
    pub fn skip(&mut self, n: usize) -> CursorResult<()> {
        if self.ensure(n)? {
            self.pos += n;
        }
        Ok(())
    }

    /// Borrows the next `n` bytes.
    ///
    /// In permissive mode a short read yields an empty slice.
    pub fn read_bytes(&mut self, n: usize) -> CursorResult<&'a [u8]> {
        if !self.ensure(n)? {
            return Ok(&[]);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Borrows everything left in the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos.min(self.data.len())..];
        self.pos = self.data.len();
        out
    }

    /// Reads a base-128 varint `u64`.
    pub fn read_varu64(&mut self) -> CursorResult<u64> {
        let mut result = 0u64;
        for shift in (0..64).step_by(7) {
            if self.is_empty() {
                return Err(CursorError::Truncated {
                    requested: 1,
                    available: 0,
                });
            }
            let byte = self.data[self.pos];
            self.pos += 1;
            let chunk = u64::from(byte & 0x7F);
            if shift == 63 && chunk > 1 {
                return Err(CursorError::InvalidVarint);
            }
            result |= chunk << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(CursorError::InvalidVarint)
    }

    /// Reads a base-128 varint that must fit in a `u32`.
    pub fn read_varu32(&mut self) -> CursorResult<u32> {
        let value = self.read_varu64()?;
        u32::try_from(value).map_err(|_| CursorError::InvalidVarint)
    }

    /// Returns `Ok(true)` if `n` bytes are available, `Ok(false)` after a
    /// permissive underflow.
    fn ensure(&mut self, n: usize) -> CursorResult<bool> {
        let available = self.remaining();
        if n <= available {
            return Ok(true);
        }
        match self.mode {
            ReadMode::Permissive => {
                self.truncated = true;
                Ok(false)
            }
            ReadMode::Strict => Err(CursorError::Truncated {
                requested: n,
                available,
            }),
        }
    }

    fn take<const N: usize>(&mut self) -> CursorResult<[u8; N]> {
        let mut out = [0u8; N];
        if self.ensure(N)? {
            out.copy_from_slice(&self.data[self.pos..self.pos + N]);
            self.pos += N;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor() {
        let cursor = ByteCursor::permissive(&[]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.truncated());
    }

    #[test]
    fn read_little_endian_widths() {
        let bytes = [
            0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02,
            0x01,
        ];
        let mut cursor = ByteCursor::strict(&bytes);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_u64().unwrap(), 0x0102_0304_0506_0708);
        assert!(cursor.is_empty());
    }

    #[test]
    fn permissive_underflow_returns_zero_without_moving() {
        let mut cursor = ByteCursor::permissive(&[0xAA, 0xBB]);
        assert_eq!(cursor.read_u32().unwrap(), 0);
        assert_eq!(cursor.position(), 0);
        assert!(cursor.truncated());
        // The short read did not consume the tail.
        assert_eq!(cursor.read_u8().unwrap(), 0xAA);
    }

    #[test]
    fn permissive_underflow_at_end() {
        let mut cursor = ByteCursor::permissive(&[0x01]);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u8().unwrap(), 0);
        assert_eq!(cursor.read_u64().unwrap(), 0);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn strict_underflow_errors() {
        let mut cursor = ByteCursor::strict(&[0x01, 0x02, 0x03]);
        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            CursorError::Truncated {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.truncated());
    }

    #[test]
    fn read_i32_negative() {
        let mut cursor = ByteCursor::strict(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(cursor.read_i32().unwrap(), -1);
    }

    #[test]
    fn skip_and_read_bytes() {
        let mut cursor = ByteCursor::strict(&[1, 2, 3, 4, 5]);
        cursor.skip(2).unwrap();
        assert_eq!(cursor.read_bytes(2).unwrap(), &[3, 4]);
        assert_eq!(cursor.read_rest(), &[5]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn permissive_short_skip_is_noop() {
        let mut cursor = ByteCursor::permissive(&[1, 2]);
        cursor.skip(3).unwrap();
        assert_eq!(cursor.position(), 0);
        assert!(cursor.truncated());
        assert!(cursor.read_bytes(5).unwrap().is_empty());
    }

    #[test]
    fn read_varu64() {
        let mut cursor = ByteCursor::strict(&[0xAC, 0x02]);
        assert_eq!(cursor.read_varu64().unwrap(), 300);
    }

    #[test]
    fn read_varu64_max() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let mut cursor = ByteCursor::strict(&bytes);
        assert_eq!(cursor.read_varu64().unwrap(), u64::MAX);
    }

    #[test]
    fn read_varu64_overlong() {
        let bytes = [0xFF; 11];
        let mut cursor = ByteCursor::strict(&bytes);
        assert_eq!(cursor.read_varu64().unwrap_err(), CursorError::InvalidVarint);
    }

    #[test]
    fn read_varu32_out_of_range() {
        let mut cursor = ByteCursor::strict(&[0x80, 0x80, 0x80, 0x80, 0x10]);
        assert_eq!(cursor.read_varu32().unwrap_err(), CursorError::InvalidVarint);
    }

    #[test]
    fn varint_truncated_even_when_permissive() {
        let mut cursor = ByteCursor::permissive(&[0x80]);
        assert!(matches!(
            cursor.read_varu64(),
            Err(CursorError::Truncated { .. })
        ));
    }
}
