use crate::kind::ContentKind;

/// Errors that can occur while negotiating or routing payloads.
#[derive(Debug, thiserror::Error)]
pub enum NegotiateError {
    /// The declared content type is absent or not one of the known kinds,
    /// and the payload cannot be taken as plain JSON.
    #[error("unsupported content type: {0}")]
    UnsupportedKind(String),

    /// The entity name is not known.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The payload carries no data.
    #[error("{kind} payload is empty")]
    EmptyPayload { kind: ContentKind },

    /// The payload arrived in a physical form the kind cannot read.
    #[error("{kind} payload must be {expected}, found {found}")]
    WrongPayloadType {
        kind: ContentKind,
        expected: &'static str,
        found: &'static str,
    },

    /// The decoded record has no fields.
    #[error("decoded record has no fields")]
    EmptyRecord,

    /// Record model error.
    #[error("record error: {0}")]
    Record(#[from] aptechka_record::RecordError),

    /// Positional codec error.
    #[error("LWP error: {0}")]
    Lwp(#[from] aptechka_lwp::LwpError),

    /// MessagePack codec error.
    #[error("MessagePack error: {0}")]
    Msgpack(#[from] aptechka_msgpack::MsgpackError),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NegotiateError>;
