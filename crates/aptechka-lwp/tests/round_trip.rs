//! Round-trip law of the positional codec over generated medicine records.

use aptechka_lwp::medicine::field;
use aptechka_lwp::{decode_record, encode_record, parse_frame, render_frame, units};
use aptechka_record::{Record, Value};
use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Zа-я0-9 .,]{1,24}")
}

fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..=2100, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap())
}

prop_compose! {
    fn medicine_record()(
        pharmacy_id in "[a-z0-9-]{1,16}",
        id in prop::option::of(1i64..1_000_000),
        name in optional_text(),
        expiry in prop::option::of(calendar_date()),
        quantity in prop::option::of(0i64..10_000),
        unit in prop::option::of(prop::sample::select(units::UNITS.to_vec())),
        instructions in optional_text(),
        min_threshold in prop::option::of(0i64..100),
        notes in optional_text(),
        stamps in prop::option::of((prop::option::of(timestamp()), prop::option::of(timestamp()))),
    ) -> Record {
        let mut record = Record::new();
        record.insert(field::PHARMACY_ID, pharmacy_id);
        record.insert(field::ID, id);
        record.insert(field::NAME, name);
        record.insert(field::EXPIRY_DATE, expiry);
        record.insert(field::QUANTITY, quantity);
        record.insert(field::UNIT, unit);
        record.insert(field::INSTRUCTIONS, instructions);
        record.insert(field::MIN_THRESHOLD, min_threshold);
        record.insert(field::NOTES, notes);
        if let Some((created, updated)) = stamps {
            record.insert(field::CREATED_AT, created);
            record.insert(field::UPDATED_AT, updated);
        }
        record
    }
}

fn truncate_to_second(value: &Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::Timestamp(DateTime::from_timestamp(ts.timestamp(), 0).unwrap()),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn decode_after_encode_preserves_fields(record in medicine_record()) {
        let frame = encode_record(&record).unwrap();
        let expected_len = if record.contains_key(field::CREATED_AT) { 15 } else { 13 };
        prop_assert_eq!(frame.len(), expected_len);

        let decoded = decode_record(&frame).unwrap();
        for (key, value) in record.iter() {
            let expected = truncate_to_second(value);
            prop_assert_eq!(decoded.get(key), Some(&expected), "field {}", key);
        }
    }

    #[test]
    fn text_wrapper_is_transparent(record in medicine_record()) {
        let frame = encode_record(&record).unwrap();
        let text = render_frame(&frame).unwrap();
        prop_assert_eq!(parse_frame(&text).unwrap(), frame);
    }
}
