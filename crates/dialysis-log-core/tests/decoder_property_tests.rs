//! Property tests for the record decoder.

use dialysis_log_core::decoder::{self, fields, RECORD_SIZE};
use dialysis_log_core::models::PassFail;
use proptest::collection::vec;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_record_count_is_floor_of_length(bytes in vec(any::<u8>(), 0..2000)) {
        let decoded = decoder::decode(&bytes);
        prop_assert_eq!(decoded.len(), bytes.len() / RECORD_SIZE);
        prop_assert_eq!(decoder::records(&bytes).len(), bytes.len() / RECORD_SIZE);
    }

    #[test]
    fn prop_every_window_decodes(window in vec(any::<u8>(), RECORD_SIZE)) {
        let record = decoder::decode_record(&window);
        prop_assert!(record.patient_id.chars().count() <= 11);
        prop_assert!(record.patient_name.chars().count() <= 31);
        prop_assert!(record.dialyzer_id.chars().count() <= 11);
        prop_assert_eq!(record.pass_fail == PassFail::Pass, window[64] == 0xFF);
        prop_assert_eq!(record.date.year, u16::from_le_bytes([window[2], window[3]]));
    }

    #[test]
    fn prop_text_decoders_are_total(field in vec(any::<u8>(), 0..64)) {
        let c = fields::c_string(&field);
        let padded = fields::padded_string(&field);
        prop_assert!(!c.contains('\0'));
        prop_assert!(!padded.contains('\0'));
        prop_assert!(c.chars().count() <= field.len());
        prop_assert!(padded.chars().count() <= field.len());
    }

    #[test]
    fn prop_second_record_is_independent(
        first in vec(any::<u8>(), RECORD_SIZE),
        second_a in vec(any::<u8>(), RECORD_SIZE),
        second_b in vec(any::<u8>(), RECORD_SIZE),
    ) {
        let mut a = first.clone();
        a.extend_from_slice(&second_a);
        let mut b = first;
        b.extend_from_slice(&second_b);

        prop_assert_eq!(&decoder::decode(&a)[0], &decoder::decode(&b)[0]);
    }

    #[test]
    fn prop_sharded_matches_sequential(
        bytes in vec(any::<u8>(), 0..(RECORD_SIZE * 40)),
        shards in 0usize..12,
    ) {
        prop_assert_eq!(decoder::decode_sharded(&bytes, shards), decoder::decode(&bytes));
    }
}
