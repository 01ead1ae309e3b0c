//! Counted sections shared by the legacy layouts.

use bitstream::ByteCursor;
use protocol::CardLocation;

use crate::error::{DecodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// Bytes taken by a `loc_info` record.
pub(crate) const LOCATION_LEN: usize = 1 + 1 + 4 + 4;

/// Reads `count` records after checking `count` against the limits.
///
/// Capacity is clamped to what the remaining bytes could hold, so a lying
/// count cannot force a large allocation. Missing records still come back
/// zero-filled when the cursor is permissive.
pub(crate) fn read_records<'a, T>(
    cursor: &mut ByteCursor<'a>,
    count: usize,
    record_len: usize,
    limits: &Limits,
    mut read: impl FnMut(&mut ByteCursor<'a>) -> WireResult<T>,
) -> WireResult<Vec<T>> {
    if count > limits.max_section_entries {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::SectionEntries,
            limit: limits.max_section_entries,
            actual: count,
        });
    }
    let capacity = count.min(cursor.remaining() / record_len.max(1));
    let mut out = Vec::with_capacity(capacity);
    for _ in 0..count {
        out.push(read(cursor)?);
    }
    Ok(out)
}

/// Reads a section prefixed by a `u32` count.
pub(crate) fn read_section<'a, T>(
    cursor: &mut ByteCursor<'a>,
    record_len: usize,
    limits: &Limits,
    read: impl FnMut(&mut ByteCursor<'a>) -> WireResult<T>,
) -> WireResult<Vec<T>> {
    let count = cursor.read_u32()? as usize;
    read_records(cursor, count, record_len, limits, read)
}

pub(crate) fn read_location(cursor: &mut ByteCursor<'_>) -> WireResult<CardLocation> {
    Ok(CardLocation {
        controller: cursor.read_u8()?,
        location: cursor.read_u8()?,
        sequence: cursor.read_u32()?,
        position: cursor.read_u32()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_over_limit_is_rejected() {
        let bytes = 100u32.to_le_bytes();
        let mut cursor = ByteCursor::permissive(&bytes);
        let err = read_section(&mut cursor, 4, &Limits::for_testing(), |c| {
            Ok(c.read_u32()?)
        })
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::SectionEntries,
                actual: 100,
                ..
            }
        ));
    }

    #[test]
    fn lying_count_is_rejected_even_without_size_bound() {
        let mut bytes = u32::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 8]);
        let mut cursor = ByteCursor::permissive(&bytes);
        let err = read_section(&mut cursor, LOCATION_LEN, &Limits::unlimited(), read_location)
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::SectionEntries,
                limit: Limits::SECTION_CEILING,
                actual: u32::MAX as usize,
            }
        );
    }

    #[test]
    fn short_section_zero_fills_when_permissive() {
        let mut bytes = 3u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&9u32.to_le_bytes());
        let mut cursor = ByteCursor::permissive(&bytes);
        let values = read_section(&mut cursor, 4, &Limits::default(), |c| Ok(c.read_u32()?))
            .unwrap();
        assert_eq!(values, vec![9, 0, 0]);
        assert!(cursor.truncated());
    }

    #[test]
    fn short_section_errors_when_strict() {
        let mut bytes = 2u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&9u32.to_le_bytes());
        let mut cursor = ByteCursor::strict(&bytes);
        let err = read_section(&mut cursor, 4, &Limits::default(), |c| Ok(c.read_u32()?))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn location_layout() {
        let mut bytes = vec![1, 0x04];
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&0x5u32.to_le_bytes());
        assert_eq!(bytes.len(), LOCATION_LEN);
        let mut cursor = ByteCursor::strict(&bytes);
        let location = read_location(&mut cursor).unwrap();
        assert_eq!(
            location,
            CardLocation {
                controller: 1,
                location: 0x04,
                sequence: 3,
                position: 0x5,
            }
        );
    }
}
