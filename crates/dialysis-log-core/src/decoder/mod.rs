//! Binary record decoder for dialysis-session logs.
//!
//! A log is a flat run of fixed 88-byte records with no header, checksum or
//! version byte. Decoding is positional and total: every byte pattern maps
//! to some record, and bytes after the last complete record are dropped.

pub mod fields;
pub mod layout;

use std::iter::FusedIterator;
use std::slice::ChunksExact;
use std::thread;

use crate::config::ConverterConfig;
use crate::models::{PassFail, SessionDate, SessionRecord, SessionTime};

pub use layout::{record_count, trailing_bytes, RECORD_SIZE};

/// Decode one 88-byte record window.
///
/// Panics if `window` is shorter than [`RECORD_SIZE`]; the iterators in this
/// module only ever hand out full windows.
pub fn decode_record(window: &[u8]) -> SessionRecord {
    debug_assert!(window.len() >= RECORD_SIZE);

    SessionRecord {
        date: SessionDate {
            year: fields::read_u16_le(window, layout::YEAR),
            month: window[layout::MONTH],
            day: window[layout::DAY],
        },
        time: SessionTime {
            hour: window[layout::HOUR],
            minute: window[layout::MINUTE],
        },
        patient_id: fields::padded_string(&window[layout::PATIENT_ID]),
        patient_name: fields::padded_string(&window[layout::PATIENT_NAME]),
        dialyzer_id: fields::c_string(&window[layout::DIALYZER_ID]),
        volume: fields::read_i32_le(window, layout::VOLUME),
        pass_fail: PassFail::from_byte(window[layout::PASS_FAIL]),
    }
}

/// Lazily decode the records of `buffer` in file order.
pub fn records(buffer: &[u8]) -> SessionRecordIter<'_> {
    SessionRecordIter {
        chunks: buffer.chunks_exact(RECORD_SIZE),
    }
}

/// Eagerly decode every complete record of `buffer`.
pub fn decode(buffer: &[u8]) -> Vec<SessionRecord> {
    let decoded: Vec<SessionRecord> = records(buffer).collect();
    tracing::debug!(
        records = decoded.len(),
        trailing_bytes = trailing_bytes(buffer.len()),
        "decoded session log"
    );
    decoded
}

/// Decode using up to `shards` scoped threads.
///
/// Each shard covers a contiguous range of record indices; results are
/// concatenated in index order, so the output equals [`decode`]. The shard
/// count is capped at the record count and the available parallelism.
pub fn decode_sharded(buffer: &[u8], shards: usize) -> Vec<SessionRecord> {
    let total = record_count(buffer.len());
    let shards = shards.min(total).min(max_shards());
    if shards <= 1 || total < 2 {
        return decode(buffer);
    }

    let per_shard = total.div_ceil(shards);
    let usable = &buffer[..total * RECORD_SIZE];

    let decoded: Vec<SessionRecord> = thread::scope(|scope| {
        let handles: Vec<_> = usable
            .chunks(per_shard * RECORD_SIZE)
            .map(|shard| scope.spawn(move || records(shard).collect::<Vec<_>>()))
            .collect();

        let mut out = Vec::with_capacity(total);
        for handle in handles {
            match handle.join() {
                Ok(part) => out.extend(part),
                // Field decoders cannot panic on full windows; re-raise if one did
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        out
    });

    tracing::debug!(
        records = decoded.len(),
        shards,
        trailing_bytes = trailing_bytes(buffer.len()),
        "decoded session log in shards"
    );
    decoded
}

fn max_shards() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Decode, sharding only when the buffer is large enough per `config`.
pub fn decode_with_config(buffer: &[u8], config: &ConverterConfig) -> Vec<SessionRecord> {
    if record_count(buffer.len()) >= config.parallel_threshold_records {
        decode_sharded(buffer, config.effective_shards())
    } else {
        decode(buffer)
    }
}

/// Iterator over the records of a buffer.
#[derive(Debug, Clone)]
pub struct SessionRecordIter<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl<'a> SessionRecordIter<'a> {
    /// Bytes after the last complete record.
    pub fn remainder(&self) -> &'a [u8] {
        self.chunks.remainder()
    }
}

impl Iterator for SessionRecordIter<'_> {
    type Item = SessionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(decode_record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.chunks.nth(n).map(decode_record)
    }
}

impl DoubleEndedIterator for SessionRecordIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.chunks.next_back().map(decode_record)
    }
}

impl ExactSizeIterator for SessionRecordIter<'_> {}

impl FusedIterator for SessionRecordIter<'_> {}
