/// Errors that can occur while encoding or decoding MessagePack records.
#[derive(Debug, thiserror::Error)]
pub enum MsgpackError {
    /// The payload has no bytes.
    #[error("MessagePack payload is empty")]
    EmptyPayload,

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The bytes are not a well-formed MessagePack value.
    #[error("malformed MessagePack: {0}")]
    Malformed(#[from] rmpv::decode::Error),

    /// A complete value was decoded but bytes remain after it.
    #[error("Extra {extra} of {total} byte(s) found at buffer[{offset}]")]
    ExtraBytes {
        extra: usize,
        total: usize,
        offset: usize,
    },

    /// The top-level value is not a map.
    #[error("expected a MessagePack map, found {found}")]
    NotAMap { found: &'static str },

    /// A map key is not a UTF-8 string.
    #[error("map key is not a UTF-8 string ({found})")]
    NonStringKey { found: &'static str },

    /// A field holds a value records cannot represent.
    #[error("field '{field}' holds unsupported {found}")]
    Unsupported { field: String, found: &'static str },

    /// A field holds an extension type other than the timestamp.
    #[error("field '{field}' holds unknown extension type {type_id}")]
    UnknownExtension { field: String, type_id: i8 },

    /// A timestamp extension has a bad length or out-of-range parts.
    #[error("field '{field}' holds an invalid timestamp extension")]
    InvalidTimestamp { field: String },

    /// Writing the encoded value failed.
    #[error("failed to encode MessagePack: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, MsgpackError>;
