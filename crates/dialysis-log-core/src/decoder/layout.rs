//! Byte layout of one session record.
//!
//! ```text
//! 0      1      2      4      5      6            17                48            59   60        64   65        88
//! ┌──────┬──────┬──────┬──────┬──────┬────────────┬─────────────────┬─────────────┬────┬─────────┬────┬─────────┐
//! │ day  │month │ year │ hour │ min  │ patient_id │  patient_name   │ dialyzer_id │ -- │ volume  │ PF │ padding │
//! │  u8  │  u8  │u16 LE│  u8  │  u8  │  11 bytes  │    31 bytes     │  11 bytes   │    │ i32 LE  │ u8 │ 23 bytes│
//! └──────┴──────┴──────┴──────┴──────┴────────────┴─────────────────┴─────────────┴────┴─────────┴────┴─────────┘
//! ```

use std::ops::Range;

/// Size of one record in bytes.
pub const RECORD_SIZE: usize = 88;

pub const DAY: usize = 0;
pub const MONTH: usize = 1;
pub const YEAR: Range<usize> = 2..4;
pub const HOUR: usize = 4;
pub const MINUTE: usize = 5;
pub const PATIENT_ID: Range<usize> = 6..17;
pub const PATIENT_NAME: Range<usize> = 17..48;
pub const DIALYZER_ID: Range<usize> = 48..59;
/// Reserved byte, never read.
pub const RESERVED: usize = 59;
pub const VOLUME: Range<usize> = 60..64;
pub const PASS_FAIL: usize = 64;
/// Trailing padding, never read.
pub const PADDING: Range<usize> = 65..RECORD_SIZE;

/// Number of complete records in a buffer of `len` bytes.
pub fn record_count(len: usize) -> usize {
    len / RECORD_SIZE
}

/// Bytes left over after the last complete record.
pub fn trailing_bytes(len: usize) -> usize {
    len % RECORD_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_tile_the_record() {
        assert_eq!(YEAR.start, MONTH + 1);
        assert_eq!(HOUR, YEAR.end);
        assert_eq!(PATIENT_ID.start, MINUTE + 1);
        assert_eq!(PATIENT_NAME.start, PATIENT_ID.end);
        assert_eq!(DIALYZER_ID.start, PATIENT_NAME.end);
        assert_eq!(RESERVED, DIALYZER_ID.end);
        assert_eq!(VOLUME.start, RESERVED + 1);
        assert_eq!(PASS_FAIL, VOLUME.end);
        assert_eq!(PADDING.start, PASS_FAIL + 1);
        assert_eq!(PADDING.len(), 23);
    }

    #[test]
    fn test_record_count() {
        assert_eq!(record_count(0), 0);
        assert_eq!(record_count(87), 0);
        assert_eq!(record_count(88), 1);
        assert_eq!(record_count(176), 2);
        assert_eq!(record_count(263), 2);
        assert_eq!(trailing_bytes(263), 87);
    }
}
