//! Typed medicine shapes and their conversion to and from records.
//!
//! The write shape ([`Medicine`]) is what a client sends to create or update
//! a medicine. The read shape ([`StoredMedicine`]) adds the two
//! server-assigned timestamps. Which shape a record maps to is decided by the
//! presence of the timestamp keys, never by their values.

use aptechka_record::{Record, Value};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::error::{LwpError, Result};
use crate::scalar::{date_from_value, timestamp_from_value};

/// Record field names, in slot order.
pub mod field {
    pub const PHARMACY_ID: &str = "pharmacy_id";
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const QUANTITY: &str = "quantity";
    pub const UNIT: &str = "unit";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const DOSAGE: &str = "dosage";
    pub const FREQUENCY: &str = "frequency";
    pub const MIN_THRESHOLD: &str = "min_threshold";
    pub const STORAGE_LOCATION: &str = "storage_location";
    pub const NOTES: &str = "notes";
    pub const IMAGE_URL: &str = "image_url";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// A medicine as sent by a client (write shape, 13 slots).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Medicine {
    pub pharmacy_id: String,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub quantity: Option<i64>,
    /// Unit string; only units in the code table survive encoding.
    pub unit: Option<String>,
    pub instructions: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub min_threshold: Option<i64>,
    pub storage_location: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// A medicine as returned by the server (read shape, 15 slots).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredMedicine {
    pub medicine: Medicine,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Either medicine shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicineShape {
    Write(Medicine),
    Read(StoredMedicine),
}

impl MedicineShape {
    /// Build a typed shape from a record.
    ///
    /// Fails only when `pharmacy_id` is absent, null, empty or blank. Every
    /// other field that cannot be interpreted becomes `None` with a warning.
    /// The record is the read shape if it carries either timestamp key.
    pub fn from_record(record: &Record) -> Result<Self> {
        let pharmacy_id = record
            .get(field::PHARMACY_ID)
            .and_then(scalar_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LwpError::MissingPharmacyId)?;

        let medicine = Medicine {
            pharmacy_id,
            id: integer_field(record, field::ID),
            name: text_field(record, field::NAME),
            expiry_date: date_field(record, field::EXPIRY_DATE),
            quantity: integer_field(record, field::QUANTITY),
            unit: text_field(record, field::UNIT),
            instructions: text_field(record, field::INSTRUCTIONS),
            dosage: text_field(record, field::DOSAGE),
            frequency: text_field(record, field::FREQUENCY),
            min_threshold: integer_field(record, field::MIN_THRESHOLD),
            storage_location: text_field(record, field::STORAGE_LOCATION),
            notes: text_field(record, field::NOTES),
            image_url: text_field(record, field::IMAGE_URL),
        };

        if record.contains_key(field::CREATED_AT) || record.contains_key(field::UPDATED_AT) {
            Ok(Self::Read(StoredMedicine {
                medicine,
                created_at: timestamp_field(record, field::CREATED_AT),
                updated_at: timestamp_field(record, field::UPDATED_AT),
            }))
        } else {
            Ok(Self::Write(medicine))
        }
    }

    /// The medicine fields shared by both shapes.
    pub fn medicine(&self) -> &Medicine {
        match self {
            Self::Write(medicine) => medicine,
            Self::Read(stored) => &stored.medicine,
        }
    }

    /// Convert back into a record. The read shape always carries both
    /// timestamp keys, possibly null.
    pub fn into_record(self) -> Record {
        match self {
            Self::Write(medicine) => medicine.into_record(),
            Self::Read(stored) => stored.into_record(),
        }
    }
}

impl Medicine {
    pub fn into_record(self) -> Record {
        let mut record = Record::with_capacity(15);
        record.insert(field::PHARMACY_ID, self.pharmacy_id);
        record.insert(field::ID, self.id);
        record.insert(field::NAME, self.name);
        record.insert(field::EXPIRY_DATE, self.expiry_date);
        record.insert(field::QUANTITY, self.quantity);
        record.insert(field::UNIT, self.unit);
        record.insert(field::INSTRUCTIONS, self.instructions);
        record.insert(field::DOSAGE, self.dosage);
        record.insert(field::FREQUENCY, self.frequency);
        record.insert(field::MIN_THRESHOLD, self.min_threshold);
        record.insert(field::STORAGE_LOCATION, self.storage_location);
        record.insert(field::NOTES, self.notes);
        record.insert(field::IMAGE_URL, self.image_url);
        record
    }
}

impl StoredMedicine {
    pub fn into_record(self) -> Record {
        let mut record = self.medicine.into_record();
        record.insert(field::CREATED_AT, self.created_at);
        record.insert(field::UPDATED_AT, self.updated_at);
        record
    }
}

/// Canonical text form of a scalar. Null has none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Integer(number) => Some(number.to_string()),
        Value::Decimal(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Date(_) | Value::Timestamp(_) => value.to_json().as_str().map(str::to_string),
    }
}

fn text_field(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(scalar_text)
        .filter(|text| !text.is_empty())
}

fn integer_field(record: &Record, key: &str) -> Option<i64> {
    let value = record.get(key)?;
    let parsed = match value {
        Value::Null => return None,
        Value::Integer(number) => Some(*number),
        Value::Decimal(number) => integral(*number),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warn!(field = key, kind = value.kind(), "LWP: non-integer value encoded as null");
    }
    parsed
}

fn date_field(record: &Record, key: &str) -> Option<NaiveDate> {
    let value = record.get(key).filter(|value| !value.is_null())?;
    let date = date_from_value(value);
    if date.is_none() {
        warn!(field = key, kind = value.kind(), "LWP: unparseable date encoded as null");
    }
    date
}

fn timestamp_field(record: &Record, key: &str) -> Option<DateTime<Utc>> {
    let value = record.get(key).filter(|value| !value.is_null())?;
    let ts = timestamp_from_value(value);
    if ts.is_none() {
        warn!(field = key, kind = value.kind(), "LWP: unparseable timestamp encoded as null");
    }
    ts
}

/// Whole-number decimals convert to integers; anything else does not.
pub(crate) fn integral(number: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    if number.is_finite() && number.fract() == 0.0 && number.abs() <= LIMIT {
        Some(number as i64)
    } else {
        None
    }
}
