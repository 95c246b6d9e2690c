use aptechka_record::{json_kind, Record};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Slot;
use tracing::warn;

use crate::error::{LwpError, Result};
use crate::medicine::{integral, Medicine, MedicineShape, StoredMedicine};
use crate::scalar::{
    day_code_to_date, epoch_seconds_to_timestamp, format_day_code, timestamp_to_epoch_seconds,
};
use crate::units;

/// Slot count of the write shape (client to server).
pub const WRITE_FRAME_LEN: usize = 13;

/// Slot count of the read shape (server to client).
pub const READ_FRAME_LEN: usize = 15;

const SLOT_PHARMACY_ID: usize = 0;
const SLOT_ID: usize = 1;
const SLOT_NAME: usize = 2;
const SLOT_EXPIRY: usize = 3;
const SLOT_QUANTITY: usize = 4;
const SLOT_UNIT: usize = 5;
const SLOT_INSTRUCTIONS: usize = 6;
const SLOT_DOSAGE: usize = 7;
const SLOT_FREQUENCY: usize = 8;
const SLOT_MIN_THRESHOLD: usize = 9;
const SLOT_STORAGE: usize = 10;
const SLOT_NOTES: usize = 11;
const SLOT_IMAGE_URL: usize = 12;
const SLOT_CREATED_AT: usize = 13;
const SLOT_UPDATED_AT: usize = 14;

/// An ordered sequence of scalar slots.
///
/// Serializes as a bare JSON array. A frame of any length can be held, but
/// only 13- and 15-slot frames decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalFrame {
    slots: Vec<Slot>,
}

impl PositionalFrame {
    /// Wrap raw slots without checking their count.
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }

    /// True when the frame carries the two server timestamp slots.
    pub fn is_read_shape(&self) -> bool {
        self.slots.len() == READ_FRAME_LEN
    }
}

/// Encode either medicine shape.
pub fn encode(shape: &MedicineShape) -> Result<PositionalFrame> {
    match shape {
        MedicineShape::Write(medicine) => encode_write(medicine),
        MedicineShape::Read(stored) => encode_read(stored),
    }
}

/// Encode the write shape into a 13-slot frame.
pub fn encode_write(medicine: &Medicine) -> Result<PositionalFrame> {
    Ok(PositionalFrame::new(medicine_slots(medicine)?))
}

/// Encode the read shape into a 15-slot frame.
pub fn encode_read(stored: &StoredMedicine) -> Result<PositionalFrame> {
    let mut slots = medicine_slots(&stored.medicine)?;
    slots.push(timestamp_slot(stored.created_at.as_ref()));
    slots.push(timestamp_slot(stored.updated_at.as_ref()));
    Ok(PositionalFrame::new(slots))
}

/// Encode a medicine record.
///
/// The frame has 15 slots if the record carries a `created_at` or
/// `updated_at` key (even a null one), 13 otherwise.
pub fn encode_record(record: &Record) -> Result<PositionalFrame> {
    encode(&MedicineShape::from_record(record)?)
}

/// Decode a frame into the shape its length selects.
///
/// The only failure is a frame that is not 13 or 15 slots long. Slots that
/// cannot be interpreted decode as `None` and are logged.
pub fn decode(frame: &PositionalFrame) -> Result<MedicineShape> {
    let slots = frame.slots();
    if slots.len() != WRITE_FRAME_LEN && slots.len() != READ_FRAME_LEN {
        return Err(LwpError::InvalidFrameLength { len: slots.len() });
    }

    let medicine = Medicine {
        pharmacy_id: identity_slot(&slots[SLOT_PHARMACY_ID]),
        id: integer_slot(slots, SLOT_ID),
        name: text_slot(slots, SLOT_NAME),
        expiry_date: day_code_slot(slots, SLOT_EXPIRY),
        quantity: integer_slot(slots, SLOT_QUANTITY),
        unit: unit_slot(slots, SLOT_UNIT),
        instructions: text_slot(slots, SLOT_INSTRUCTIONS),
        dosage: text_slot(slots, SLOT_DOSAGE),
        frequency: text_slot(slots, SLOT_FREQUENCY),
        min_threshold: integer_slot(slots, SLOT_MIN_THRESHOLD),
        storage_location: text_slot(slots, SLOT_STORAGE),
        notes: text_slot(slots, SLOT_NOTES),
        image_url: text_slot(slots, SLOT_IMAGE_URL),
    };

    if slots.len() == READ_FRAME_LEN {
        Ok(MedicineShape::Read(StoredMedicine {
            medicine,
            created_at: epoch_slot(slots, SLOT_CREATED_AT),
            updated_at: epoch_slot(slots, SLOT_UPDATED_AT),
        }))
    } else {
        Ok(MedicineShape::Write(medicine))
    }
}

/// Decode a frame into a medicine record.
pub fn decode_record(frame: &PositionalFrame) -> Result<Record> {
    decode(frame).map(MedicineShape::into_record)
}

fn medicine_slots(medicine: &Medicine) -> Result<Vec<Slot>> {
    if medicine.pharmacy_id.trim().is_empty() {
        return Err(LwpError::MissingPharmacyId);
    }

    let mut slots = Vec::with_capacity(READ_FRAME_LEN);
    slots.push(Slot::String(medicine.pharmacy_id.clone()));
    slots.push(medicine.id.map(Slot::from).unwrap_or(Slot::Null));
    slots.push(text(medicine.name.as_deref()));
    slots.push(day_code(medicine.expiry_date));
    slots.push(medicine.quantity.map(Slot::from).unwrap_or(Slot::Null));
    slots.push(unit_code(medicine));
    slots.push(text(medicine.instructions.as_deref()));
    slots.push(text(medicine.dosage.as_deref()));
    slots.push(text(medicine.frequency.as_deref()));
    slots.push(medicine.min_threshold.map(Slot::from).unwrap_or(Slot::Null));
    slots.push(text(medicine.storage_location.as_deref()));
    slots.push(text(medicine.notes.as_deref()));
    slots.push(text(medicine.image_url.as_deref()));
    Ok(slots)
}

fn text(value: Option<&str>) -> Slot {
    match value {
        Some(text) if !text.is_empty() => Slot::String(text.to_string()),
        _ => Slot::Null,
    }
}

fn day_code(date: Option<NaiveDate>) -> Slot {
    let Some(date) = date else {
        return Slot::Null;
    };
    match format_day_code(date) {
        Some(code) => Slot::String(code),
        None => {
            warn!(%date, "LWP encode: date outside day-code range, sent as null");
            Slot::Null
        }
    }
}

fn unit_code(medicine: &Medicine) -> Slot {
    let Some(unit) = medicine.unit.as_deref() else {
        return Slot::Null;
    };
    match units::code_of(unit) {
        Some(code) => Slot::from(code),
        None => {
            warn!(
                unit,
                pharmacy_id = %medicine.pharmacy_id,
                "LWP encode: unknown unit, sent as null"
            );
            Slot::Null
        }
    }
}

fn timestamp_slot(ts: Option<&DateTime<Utc>>) -> Slot {
    ts.map(|ts| Slot::from(timestamp_to_epoch_seconds(ts)))
        .unwrap_or(Slot::Null)
}

fn identity_slot(slot: &Slot) -> String {
    match slot {
        Slot::String(text) => text.clone(),
        Slot::Number(number) => number.to_string(),
        Slot::Bool(flag) => flag.to_string(),
        other => {
            warn!(
                slot = SLOT_PHARMACY_ID,
                kind = json_kind(other),
                "LWP decode: pharmacy_id slot is not a scalar"
            );
            String::new()
        }
    }
}

fn slot_integer(slot: &Slot) -> Option<i64> {
    match slot {
        Slot::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral)),
        _ => None,
    }
}

fn integer_slot(slots: &[Slot], index: usize) -> Option<i64> {
    let slot = &slots[index];
    if slot.is_null() {
        return None;
    }
    let value = slot_integer(slot);
    if value.is_none() {
        warn!(slot = index, %slot, "LWP decode: expected an integer, field set to null");
    }
    value
}

fn text_slot(slots: &[Slot], index: usize) -> Option<String> {
    match &slots[index] {
        Slot::Null => None,
        Slot::String(text) => Some(text.clone()),
        other => {
            warn!(slot = index, %other, "LWP decode: expected a string, field set to null");
            None
        }
    }
}

fn day_code_slot(slots: &[Slot], index: usize) -> Option<NaiveDate> {
    let slot = &slots[index];
    if slot.is_null() {
        return None;
    }
    let date = slot.as_str().and_then(day_code_to_date);
    if date.is_none() {
        warn!(slot = index, %slot, "LWP decode: invalid day code, field set to null");
    }
    date
}

fn unit_slot(slots: &[Slot], index: usize) -> Option<String> {
    let slot = &slots[index];
    if slot.is_null() {
        return None;
    }
    let unit = slot_integer(slot).and_then(units::name_of);
    if unit.is_none() {
        warn!(slot = index, %slot, "LWP decode: unknown unit code, field set to null");
    }
    unit.map(str::to_string)
}

fn epoch_slot(slots: &[Slot], index: usize) -> Option<DateTime<Utc>> {
    let slot = &slots[index];
    if slot.is_null() {
        return None;
    }
    let ts = slot_integer(slot).and_then(epoch_seconds_to_timestamp);
    if ts.is_none() {
        warn!(slot = index, %slot, "LWP decode: invalid epoch seconds, field set to null");
    }
    ts
}
