/// Structural failures of the positional codec.
///
/// Slot-level problems are not errors; they degrade the field to null.
#[derive(Debug, thiserror::Error)]
pub enum LwpError {
    /// The record has no usable `pharmacy_id`, so slot 0 cannot be filled.
    #[error("pharmacy_id is missing or blank")]
    MissingPharmacyId,

    /// The frame is neither the write shape nor the read shape.
    #[error("invalid LWP frame length {len} (expected 13 or 15)")]
    InvalidFrameLength { len: usize },

    /// The JSON text does not hold an array where a frame was expected.
    #[error("expected an LWP array, found {found}")]
    NotAFrame { found: &'static str },

    /// The JSON text wrapper could not be parsed or produced.
    #[error("LWP text is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LwpError>;
