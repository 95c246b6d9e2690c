use aptechka_record::Record;
use bytes::Bytes;

use crate::kind::ContentKind;

/// A request or response body as handed over by the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundPayload {
    /// No body.
    Empty,
    /// Body read as text.
    Text(String),
    /// Body read as raw bytes.
    Bytes(Bytes),
    /// Body already parsed as JSON by an upstream body parser.
    Parsed(serde_json::Value),
}

impl InboundPayload {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty body",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Parsed(_) => "parsed JSON",
        }
    }

    /// True for an already-parsed JSON object with at least one key.
    pub(crate) fn is_parsed_record(&self) -> bool {
        matches!(self, Self::Parsed(serde_json::Value::Object(map)) if !map.is_empty())
    }
}

impl From<String> for InboundPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for InboundPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Bytes> for InboundPayload {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for InboundPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<serde_json::Value> for InboundPayload {
    fn from(value: serde_json::Value) -> Self {
        Self::Parsed(value)
    }
}

/// Body of an encoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    /// A record for the caller's own JSON serializer.
    Record(Record),
    /// A list of records for the caller's own JSON serializer.
    Records(Vec<Record>),
    /// Ready-to-send text.
    Text(String),
    /// Ready-to-send bytes.
    Bytes(Bytes),
    /// One encoded buffer per record.
    Batch(Vec<Bytes>),
}

/// An encoded response with its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub kind: ContentKind,
    pub body: OutboundBody,
    content_type: &'static str,
}

impl Outbound {
    /// Label the body with the canonical media type of `kind`.
    pub fn new(kind: ContentKind, body: OutboundBody) -> Self {
        Self {
            kind,
            body,
            content_type: kind.label(),
        }
    }

    /// Replace the media type, e.g. with the alias a caller negotiated.
    ///
    /// A label naming a different kind is ignored.
    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        if ContentKind::from_label(content_type) == Some(self.kind) {
            self.content_type = content_type;
        }
        self
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    One(Record),
    Many(Vec<Record>),
}

impl Decoded {
    /// All records in body order.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::One(record) => vec![record],
            Self::Many(records) => records,
        }
    }
}
