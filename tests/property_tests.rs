use keytrace::decoder::RecordDecoder;
use keytrace::error::DecodeError;
use keytrace::evaluator::Evaluator;
use keytrace::layout::{self, Finger, Modifier};
use keytrace::record::{EventKind, Record, Timestamp};
use proptest::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use strum::IntoEnumIterator;

// --- STRATEGIES ---

const MAPPED: &str = "qwertyuiopasdfghjklzxcvbnm,./;'QWERTYUIOPASDFGHJKL:\"ZXCVBNM<>?1234567890!@#$%^&*() ";
const UNMAPPED: &str = "é€ßñ\t";

fn arb_char() -> impl Strategy<Value = char> {
    let mapped: Vec<char> = MAPPED.chars().collect();
    let unmapped: Vec<char> = UNMAPPED.chars().collect();
    let markers: Vec<char> = Modifier::iter().map(|m| m.marker()).collect();
    prop_oneof![
        8 => proptest::sample::select(mapped),
        1 => proptest::sample::select(unmapped),
        2 => proptest::sample::select(markers),
    ]
}

fn arb_session() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_char(), 0..60).prop_map(|v| v.into_iter().collect())
}

prop_compose! {
    fn arb_record()(
        micros in -4_000_000_000_000_000i64..4_000_000_000_000_000i64,
        key_down in any::<bool>(),
        flags in any::<u64>(),
        key_code in any::<u16>(),
        keys in "[a-z⇧⌘é😀 ]{0,6}",
    ) -> Record {
        Record {
            timestamp: Timestamp::from_micros(micros),
            event_kind: if key_down { EventKind::KeyDown } else { EventKind::KeyUp },
            flags,
            key_code,
            keys,
        }
    }
}

fn is_marker(c: char) -> bool {
    Modifier::from_marker(c).is_some()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn test_total_counts_every_non_marker(sessions in proptest::collection::vec(arb_session(), 1..5)) {
        let mut ev = Evaluator::new();
        let mut expected = 0u64;
        for s in &sessions {
            ev.evaluate(s);
            expected += s.chars().filter(|c| !is_marker(*c)).count() as u64;
        }
        prop_assert_eq!(ev.total(), expected);
        prop_assert_eq!(
            ev.total(),
            ev.char_frequency().occurrences()
                + ev.unmapped_frequency().occurrences()
                + suppressed_repeats(&sessions)
        );
    }

    #[test]
    fn test_own_finger_covers_char_frequency(session in arb_session()) {
        let mut ev = Evaluator::new();
        ev.evaluate(&session);

        let mut per_finger: HashMap<Finger, u64> = HashMap::new();
        for (c, count) in ev.char_frequency().sorted() {
            let coord = layout::lookup(c).unwrap();
            *per_finger.entry(coord.finger).or_default() += count;
        }
        for (finger, expected_min) in per_finger {
            prop_assert!(ev.finger_count(finger) >= expected_min);
        }
    }

    #[test]
    fn test_repeating_last_key_only_bumps_total(session in arb_session(), extra in proptest::sample::select(MAPPED.chars().collect::<Vec<_>>())) {
        let base = format!("{}{}", session, extra);
        let repeated = format!("{}{}", base, extra);

        let mut a = Evaluator::new();
        a.evaluate(&base);
        let mut b = Evaluator::new();
        b.evaluate(&repeated);

        prop_assert_eq!(b.total(), a.total() + 1);
        prop_assert_eq!(b.finger_counts(), a.finger_counts());
        prop_assert_eq!(b.sfb_count(), a.sfb_count());
        prop_assert_eq!(b.dsfb_count(), a.dsfb_count());
        prop_assert_eq!(b.char_frequency().sorted(), a.char_frequency().sorted());
    }

    #[test]
    fn test_sfb_bounded_by_processed_keystrokes(session in arb_session()) {
        let mut ev = Evaluator::new();
        ev.evaluate(&session);
        let processed = ev.char_frequency().occurrences();
        prop_assert!(ev.sfb_count() <= processed.saturating_sub(1));
        prop_assert!(ev.dsfb_count() <= ev.sfb_count());
    }

    #[test]
    fn test_truncated_record_never_decodes(record in arb_record(), cut in 0usize..64) {
        let bytes = record.to_bytes();
        let cut = cut % bytes.len();
        let mut dec = RecordDecoder::new(Cursor::new(bytes[..cut].to_vec()));
        let result = dec.next_record();
        if cut == 0 {
            prop_assert_eq!(result, Err(DecodeError::EndOfInput));
        } else {
            let is_malformed = matches!(result, Err(DecodeError::MalformedRecord { .. }));
            prop_assert!(is_malformed);
        }
    }

    #[test]
    fn test_whole_record_decodes(record in arb_record()) {
        let mut dec = RecordDecoder::new(Cursor::new(record.to_bytes()));
        prop_assert_eq!(dec.next_record(), Ok(record));
        prop_assert_eq!(dec.next_record(), Err(DecodeError::EndOfInput));
    }
}

/// Count of mapped characters the evaluator treats as repeats of the
/// previous keystroke, worked out independently from the layout table.
fn suppressed_repeats(sessions: &[String]) -> u64 {
    let mut repeats = 0;
    for s in sessions {
        let mut prev = None;
        for c in s.chars().filter(|c| !is_marker(*c)) {
            if let Some(coord) = layout::lookup(c) {
                if matches!(prev, Some(p) if layout::KeyCoord::same_key(&p, &coord)) {
                    repeats += 1;
                } else {
                    prev = Some(coord);
                }
            }
        }
    }
    repeats
}
