//! Positional fixed-schema (LWP) encoding of medicine records.
//!
//! A medicine record travels as an ordered array of scalar slots whose
//! meaning is fixed by index:
//!
//! ```text
//!  0 pharmacy_id   4 quantity       8 frequency          12 image_url
//!  1 id            5 unit code      9 min_threshold      13 created_at (read only)
//!  2 name          6 instructions  10 storage_location   14 updated_at (read only)
//!  3 expiry day    7 dosage        11 notes
//! ```
//!
//! Frame length is the only structural discriminant: 13 slots for the
//! write shape, 15 for the read shape. Anything else is rejected. Problems
//! inside a slot never reject the frame; the field becomes null and a
//! warning is logged.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod medicine;
pub mod scalar;
pub mod units;

pub use codec::{
    decode, decode_record, encode, encode_read, encode_record, encode_write, PositionalFrame,
    READ_FRAME_LEN, WRITE_FRAME_LEN,
};
pub use envelope::{parse_document, parse_frame, render_frame, render_frames, Document};
pub use error::{LwpError, Result};
pub use medicine::{Medicine, MedicineShape, StoredMedicine};
