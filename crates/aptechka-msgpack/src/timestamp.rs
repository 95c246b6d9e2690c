//! MessagePack timestamp extension (type -1).
//!
//! Three layouts, smallest that fits is used when encoding:
//!
//! ```text
//! timestamp 32:  seconds u32                        (4 bytes)
//! timestamp 64:  nanos u30 | seconds u34            (8 bytes)
//! timestamp 96:  nanos u32, seconds i64             (12 bytes)
//! ```
//!
//! All integers are big-endian.

use bytes::{Buf, BufMut};
use chrono::{DateTime, Utc};

/// Extension type id reserved for timestamps.
pub const TIMESTAMP_EXT: i8 = -1;

const SECONDS_34_BITS: i64 = 1 << 34;

/// Encode a timestamp into extension data.
pub fn encode_timestamp(ts: &DateTime<Utc>) -> Vec<u8> {
    let seconds = ts.timestamp();
    let nanos = ts.timestamp_subsec_nanos();

    if (0..SECONDS_34_BITS).contains(&seconds) {
        if nanos == 0 && seconds <= i64::from(u32::MAX) {
            let mut data = Vec::with_capacity(4);
            data.put_u32(seconds as u32);
            return data;
        }
        let mut data = Vec::with_capacity(8);
        data.put_u64((u64::from(nanos) << 34) | seconds as u64);
        return data;
    }

    let mut data = Vec::with_capacity(12);
    data.put_u32(nanos);
    data.put_i64(seconds);
    data
}

/// Decode extension data into a timestamp.
///
/// Returns `None` for lengths other than 4, 8 or 12 and for out-of-range
/// nanoseconds or seconds.
pub fn decode_timestamp(mut data: &[u8]) -> Option<DateTime<Utc>> {
    let (seconds, nanos) = match data.len() {
        4 => (i64::from(data.get_u32()), 0),
        8 => {
            let packed = data.get_u64();
            ((packed & (SECONDS_34_BITS as u64 - 1)) as i64, (packed >> 34) as u32)
        }
        12 => {
            let nanos = data.get_u32();
            (data.get_i64(), nanos)
        }
        _ => return None,
    };
    if nanos >= 1_000_000_000 {
        return None;
    }
    DateTime::from_timestamp(seconds, nanos)
}
