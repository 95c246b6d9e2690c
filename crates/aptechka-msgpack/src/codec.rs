use aptechka_record::{Record, Value};
use bytes::Bytes;
use chrono::NaiveTime;
use rmpv::Value as Packed;
use tracing::{debug, warn};

use crate::config::MsgpackConfig;
use crate::error::{MsgpackError, Result};
use crate::recovery::useful_length;
use crate::timestamp::{decode_timestamp, encode_timestamp, TIMESTAMP_EXT};

/// Encodes records as MessagePack maps and decodes them back.
#[derive(Debug, Clone, Default)]
pub struct MsgpackCodec {
    config: MsgpackConfig,
}

impl MsgpackCodec {
    /// Create a codec with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit config.
    pub fn with_config(config: MsgpackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MsgpackConfig {
        &self.config
    }

    /// Encode a record as one MessagePack map.
    ///
    /// Dates are written as timestamps at UTC midnight.
    pub fn encode(&self, record: &Record) -> Result<Bytes> {
        let entries = record
            .iter()
            .map(|(key, value)| (Packed::from(key), pack_value(value)))
            .collect();

        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &Packed::Map(entries))
            .map_err(|err| MsgpackError::Encode(err.to_string()))?;
        Ok(Bytes::from(buf))
    }

    /// Decode a payload, ignoring trailing bytes after a complete map when
    /// recovery is enabled.
    pub fn decode(&self, payload: &[u8]) -> Result<Record> {
        let err = match self.decode_strict(payload) {
            Ok(record) => return Ok(record),
            Err(err) => err,
        };
        if !self.config.recover_trailing_bytes {
            return Err(err);
        }
        let Some(useful) = useful_length(&err, payload.len()) else {
            return Err(err);
        };

        let record = self.decode_strict(&payload[..useful])?;
        warn!(
            useful,
            total = payload.len(),
            "msgpack: ignored {} trailing byte(s)",
            payload.len() - useful
        );
        Ok(record)
    }

    /// Decode a payload that must hold exactly one map and nothing else.
    pub fn decode_strict(&self, payload: &[u8]) -> Result<Record> {
        if payload.is_empty() {
            return Err(MsgpackError::EmptyPayload);
        }
        if payload.len() > self.config.max_payload_size {
            return Err(MsgpackError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        let mut reader = payload;
        let packed = rmpv::decode::read_value(&mut reader)?;
        let record = unpack_record(packed)?;

        let consumed = payload.len() - reader.len();
        if consumed < payload.len() {
            debug!(consumed, total = payload.len(), "msgpack: bytes after map");
            return Err(MsgpackError::ExtraBytes {
                extra: payload.len() - consumed,
                total: payload.len(),
                offset: consumed,
            });
        }
        Ok(record)
    }
}

/// Encode a record with default config.
pub fn encode(record: &Record) -> Result<Bytes> {
    MsgpackCodec::new().encode(record)
}

/// Decode a payload with default config.
pub fn decode(payload: &[u8]) -> Result<Record> {
    MsgpackCodec::new().decode(payload)
}

fn pack_value(value: &Value) -> Packed {
    match value {
        Value::Null => Packed::Nil,
        Value::Bool(flag) => Packed::from(*flag),
        Value::Integer(number) => Packed::from(*number),
        Value::Decimal(number) => Packed::from(*number),
        Value::String(text) => Packed::from(text.as_str()),
        Value::Date(date) => {
            let midnight = date.and_time(NaiveTime::MIN).and_utc();
            Packed::Ext(TIMESTAMP_EXT, encode_timestamp(&midnight))
        }
        Value::Timestamp(ts) => Packed::Ext(TIMESTAMP_EXT, encode_timestamp(ts)),
    }
}

fn unpack_record(packed: Packed) -> Result<Record> {
    let entries = match packed {
        Packed::Map(entries) => entries,
        other => {
            return Err(MsgpackError::NotAMap {
                found: packed_kind(&other),
            })
        }
    };

    let mut record = Record::with_capacity(entries.len());
    for (key, value) in entries {
        let key = match key {
            Packed::String(text) => text.into_str().ok_or(MsgpackError::NonStringKey {
                found: "invalid utf-8 string",
            })?,
            other => {
                return Err(MsgpackError::NonStringKey {
                    found: packed_kind(&other),
                })
            }
        };
        let value = unpack_value(&key, value)?;
        record.insert(key, value);
    }
    Ok(record)
}

fn unpack_value(field: &str, packed: Packed) -> Result<Value> {
    let unsupported = |found| MsgpackError::Unsupported {
        field: field.to_string(),
        found,
    };

    match packed {
        Packed::Nil => Ok(Value::Null),
        Packed::Boolean(flag) => Ok(Value::Bool(flag)),
        Packed::Integer(number) => number
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| unsupported("integer beyond i64")),
        Packed::F32(number) => Ok(Value::Decimal(f64::from(number))),
        Packed::F64(number) => Ok(Value::Decimal(number)),
        Packed::String(text) => text
            .into_str()
            .map(Value::String)
            .ok_or_else(|| unsupported("invalid utf-8 string")),
        Packed::Ext(TIMESTAMP_EXT, data) => decode_timestamp(&data)
            .map(Value::Timestamp)
            .ok_or_else(|| MsgpackError::InvalidTimestamp {
                field: field.to_string(),
            }),
        Packed::Ext(type_id, _) => Err(MsgpackError::UnknownExtension {
            field: field.to_string(),
            type_id,
        }),
        other => Err(unsupported(packed_kind(&other))),
    }
}

fn packed_kind(packed: &Packed) -> &'static str {
    match packed {
        Packed::Nil => "nil",
        Packed::Boolean(_) => "boolean",
        Packed::Integer(_) => "integer",
        Packed::F32(_) | Packed::F64(_) => "float",
        Packed::String(_) => "string",
        Packed::Binary(_) => "binary",
        Packed::Array(_) => "array",
        Packed::Map(_) => "map",
        Packed::Ext(..) => "extension",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn sample() -> Record {
        [
            ("pharmacy_id", Value::from("p1")),
            ("id", Value::from(7)),
            ("name", Value::from("Аспирин")),
            ("quantity", Value::from(-3)),
            ("ratio", Value::from(0.25)),
            ("active", Value::from(true)),
            ("notes", Value::Null),
            (
                "created_at",
                Value::from(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn raw(value: Packed) -> Vec<u8> {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &value).unwrap();
        buf
    }

    #[test]
    fn encodes_compact_map() {
        let record: Record = [("a", 1)].into_iter().collect();
        let bytes = encode(&record).unwrap();
        assert_eq!(bytes.as_ref(), &[0x81, 0xa1, b'a', 0x01]);
    }

    #[test]
    fn round_trip_preserves_fields() {
        let record = sample();
        let decoded = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn date_encodes_as_midnight_timestamp() {
        let record: Record = [("expiry_date", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())]
            .into_iter()
            .collect();
        let bytes = encode(&record).unwrap();
        assert!(bytes.ends_with(&[0xd6, 0xff, 0x65, 0x92, 0x00, 0x80]));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(
            decoded.get("expiry_date"),
            Some(&Value::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
        );
    }

    #[test]
    fn strict_decode_reports_trailing_bytes() {
        let valid = encode(&sample()).unwrap();
        let mut padded = valid.to_vec();
        padded.extend([0x00, 0x01, 0x02]);

        let codec = MsgpackCodec::with_config(MsgpackConfig {
            recover_trailing_bytes: false,
            ..MsgpackConfig::default()
        });
        let err = codec.decode(&padded).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Extra 3 of {} byte(s) found at buffer[{}]",
                padded.len(),
                valid.len()
            )
        );
        assert!(matches!(
            codec.decode_strict(&padded),
            Err(MsgpackError::ExtraBytes { extra: 3, .. })
        ));
    }

    #[test]
    fn internal_corruption_is_not_recovered() {
        let record: Record = [("a", 1), ("b", 2)].into_iter().collect();
        let mut bytes = encode(&record).unwrap().to_vec();
        assert_eq!(bytes[0], 0x82);
        bytes[0] = 0x8f;
        assert!(matches!(decode(&bytes), Err(MsgpackError::Malformed(_))));

        let mut truncated_key = encode(&record).unwrap().to_vec();
        truncated_key[1] = 0xbf;
        assert!(matches!(
            decode(&truncated_key),
            Err(MsgpackError::Malformed(_))
        ));
    }

    #[test]
    fn empty_and_oversized_payloads_fail() {
        assert!(matches!(decode(&[]), Err(MsgpackError::EmptyPayload)));

        let codec = MsgpackCodec::with_config(MsgpackConfig {
            max_payload_size: 4,
            ..MsgpackConfig::default()
        });
        let bytes = encode(&sample()).unwrap();
        assert!(matches!(
            codec.decode(&bytes),
            Err(MsgpackError::PayloadTooLarge { max: 4, .. })
        ));
    }

    #[test]
    fn top_level_must_be_a_map() {
        let bytes = raw(Packed::Array(vec![Packed::from(1)]));
        assert!(matches!(
            decode(&bytes),
            Err(MsgpackError::NotAMap { found: "array" })
        ));

        let bytes = raw(Packed::Map(vec![(Packed::from(1), Packed::from(2))]));
        assert!(matches!(
            decode(&bytes),
            Err(MsgpackError::NonStringKey { found: "integer" })
        ));
    }

    #[test]
    fn unsupported_values_fail() {
        let nested = raw(Packed::Map(vec![(
            Packed::from("tags"),
            Packed::Array(vec![Packed::from("a")]),
        )]));
        assert!(matches!(
            decode(&nested),
            Err(MsgpackError::Unsupported { found: "array", .. })
        ));

        let binary = raw(Packed::Map(vec![(
            Packed::from("blob"),
            Packed::Binary(vec![1, 2]),
        )]));
        assert!(matches!(
            decode(&binary),
            Err(MsgpackError::Unsupported { found: "binary", .. })
        ));

        let huge = raw(Packed::Map(vec![(Packed::from("n"), Packed::from(u64::MAX))]));
        assert!(matches!(
            decode(&huge),
            Err(MsgpackError::Unsupported { .. })
        ));
    }

    #[test]
    fn unknown_extension_fails() {
        let bytes = raw(Packed::Map(vec![(
            Packed::from("x"),
            Packed::Ext(5, vec![0; 4]),
        )]));
        assert!(matches!(
            decode(&bytes),
            Err(MsgpackError::UnknownExtension { type_id: 5, .. })
        ));

        let bad_ts = raw(Packed::Map(vec![(
            Packed::from("x"),
            Packed::Ext(TIMESTAMP_EXT, vec![0; 3]),
        )]));
        assert!(matches!(
            decode(&bad_ts),
            Err(MsgpackError::InvalidTimestamp { .. })
        ));
    }
}
