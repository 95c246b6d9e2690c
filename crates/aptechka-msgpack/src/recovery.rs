//! Trailing-bytes recovery.
//!
//! Some clients deliver a well-formed map followed by padding. The strict
//! decoder reports that case as [`MsgpackError::ExtraBytes`] with the offset
//! where the valid value ends; this module decides whether that prefix can
//! be decoded on its own. Nothing else is ever recovered.

use crate::error::MsgpackError;

/// Length of the usable prefix of a payload that failed strict decoding.
///
/// Returns `Some(k)` only for a trailing-bytes failure whose offset lies
/// strictly inside the payload (`0 < k < total`).
pub fn useful_length(err: &MsgpackError, total: usize) -> Option<usize> {
    match *err {
        MsgpackError::ExtraBytes { offset, .. } if offset > 0 && offset < total => Some(offset),
        _ => None,
    }
}
