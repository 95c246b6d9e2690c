use aptechka_lwp::{
    decode_record, encode_record, parse_document, parse_frame, render_frame, render_frames, Document,
};
use aptechka_msgpack::MsgpackCodec;
use aptechka_record::Record;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::NegotiatorConfig;
use crate::entity::Entity;
use crate::error::{NegotiateError, Result};
use crate::kind::{accepted_label, parse_accept, ContentKind};
use crate::payload::{Decoded, InboundPayload, Outbound, OutboundBody};

/// Pick the response kind: the first accepted kind that is available,
/// otherwise plain.
pub fn select_for_response(accepted: &[ContentKind], available: &[ContentKind]) -> ContentKind {
    accepted
        .iter()
        .copied()
        .find(|kind| available.contains(kind))
        .unwrap_or(ContentKind::Plain)
}

/// How an inbound payload will be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundRoute {
    /// The declared content type names a known kind.
    Declared(ContentKind),
    /// No usable content type, but the body was already parsed into a JSON
    /// object, so it is read as plain.
    BestEffortPlain,
}

impl InboundRoute {
    /// Resolve the route for a declared content type and payload.
    pub fn resolve(content_type: Option<&str>, payload: &InboundPayload) -> Result<Self> {
        if let Some(kind) = content_type.and_then(ContentKind::from_label) {
            return Ok(Self::Declared(kind));
        }
        if payload.is_parsed_record() {
            return Ok(Self::BestEffortPlain);
        }
        Err(NegotiateError::UnsupportedKind(
            content_type.unwrap_or("<none>").to_string(),
        ))
    }

    pub fn kind(self) -> ContentKind {
        match self {
            Self::Declared(kind) => kind,
            Self::BestEffortPlain => ContentKind::Plain,
        }
    }
}

/// Routes payloads between records and their wire representations.
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    config: NegotiatorConfig,
    msgpack: MsgpackCodec,
}

impl Negotiator {
    /// Create a negotiator with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a negotiator with explicit config.
    pub fn with_config(config: NegotiatorConfig) -> Self {
        Self {
            msgpack: MsgpackCodec::with_config(config.msgpack),
            config,
        }
    }

    pub fn config(&self) -> &NegotiatorConfig {
        &self.config
    }

    /// Rank the kinds a caller accepts, from an Accept header.
    pub fn accepted(&self, accept: Option<&str>) -> Vec<ContentKind> {
        parse_accept(accept, &self.config.server_preference)
    }

    /// Choose the response kind for an entity from an Accept header.
    pub fn negotiate(&self, entity: Entity, accept: Option<&str>) -> ContentKind {
        let accepted = self.accepted(accept);
        let kind = select_for_response(&accepted, entity.available());
        debug!(%entity, ?accepted, %kind, "negotiated response kind");
        kind
    }

    /// Decode a request body into a record.
    ///
    /// `content_type` is the declared Content-Type header, if any.
    pub fn decode_inbound(
        &self,
        entity: Entity,
        content_type: Option<&str>,
        payload: InboundPayload,
    ) -> Result<Record> {
        let route = InboundRoute::resolve(content_type, &payload)?;
        if route == InboundRoute::BestEffortPlain {
            debug!(%entity, ?content_type, "reading parsed body as plain JSON");
        }
        self.decode_as(entity, route.kind(), payload)
    }

    /// Decode a request body known to be of `kind`.
    pub fn decode_as(&self, entity: Entity, kind: ContentKind, payload: InboundPayload) -> Result<Record> {
        let record = match kind {
            ContentKind::Plain => plain_record(kind, payload)?,
            ContentKind::Positional => {
                let text = payload_text(kind, payload)?;
                match entity {
                    Entity::Medicine => decode_record(&parse_frame(&text)?)?,
                    // Only medicines have a slot layout; others send an object.
                    Entity::Reminder | Entity::UsageEvent => Record::from_json_slice(text.as_bytes())?,
                }
            }
            ContentKind::GeneralBinary => match payload {
                InboundPayload::Bytes(bytes) if bytes.is_empty() => {
                    return Err(NegotiateError::EmptyPayload { kind })
                }
                InboundPayload::Bytes(bytes) => self.msgpack.decode(&bytes)?,
                InboundPayload::Empty => return Err(NegotiateError::EmptyPayload { kind }),
                other => {
                    return Err(NegotiateError::WrongPayloadType {
                        kind,
                        expected: "bytes",
                        found: other.kind(),
                    })
                }
            },
        };
        if record.is_empty() {
            return Err(NegotiateError::EmptyRecord);
        }
        Ok(record)
    }

    /// Encode one record as `kind`.
    ///
    /// An entity without a positional layout falls back to plain.
    pub fn encode_outbound(&self, entity: Entity, kind: ContentKind, record: Record) -> Result<Outbound> {
        let kind = effective_kind(entity, kind);
        let body = match kind {
            ContentKind::Plain => OutboundBody::Record(record),
            ContentKind::Positional => OutboundBody::Text(render_frame(&encode_record(&record)?)?),
            ContentKind::GeneralBinary => OutboundBody::Bytes(self.msgpack.encode(&record)?),
        };
        Ok(Outbound::new(kind, body))
    }

    /// Encode a list of records as `kind`.
    ///
    /// MessagePack lists are one map per record, never a single buffer.
    pub fn encode_outbound_list(
        &self,
        entity: Entity,
        kind: ContentKind,
        records: Vec<Record>,
    ) -> Result<Outbound> {
        let kind = effective_kind(entity, kind);
        let body = match kind {
            ContentKind::Plain => OutboundBody::Records(records),
            ContentKind::Positional => {
                let frames = records
                    .iter()
                    .map(encode_record)
                    .collect::<aptechka_lwp::Result<Vec<_>>>()?;
                OutboundBody::Text(render_frames(&frames)?)
            }
            ContentKind::GeneralBinary => OutboundBody::Batch(
                records
                    .iter()
                    .map(|record| self.msgpack.encode(record))
                    .collect::<aptechka_msgpack::Result<Vec<Bytes>>>()?,
            ),
        };
        Ok(Outbound::new(kind, body))
    }

    /// Negotiate from an Accept header and encode one record.
    ///
    /// The response carries the media type the caller asked for, so a
    /// client accepting only `application/x-lwp-v1` gets that label back.
    pub fn respond(&self, entity: Entity, accept: Option<&str>, record: Record) -> Result<Outbound> {
        let kind = self.negotiate(entity, accept);
        let outbound = self.encode_outbound(entity, kind, record)?;
        let content_type = accepted_label(accept, outbound.kind);
        Ok(outbound.with_content_type(content_type))
    }

    /// Decode a response body on the client side.
    ///
    /// Understands single records and lists in every kind: JSON arrays of
    /// objects, LWP array-of-arrays documents, and MessagePack maps.
    pub fn decode_response(
        &self,
        entity: Entity,
        content_type: &str,
        payload: InboundPayload,
    ) -> Result<Decoded> {
        let kind = ContentKind::from_label(content_type)
            .ok_or_else(|| NegotiateError::UnsupportedKind(content_type.to_string()))?;

        match kind {
            ContentKind::Plain => plain_document(kind, payload),
            ContentKind::Positional if entity == Entity::Medicine => {
                let text = payload_text(kind, payload)?;
                match parse_document(&text)? {
                    Document::One(frame) => Ok(Decoded::One(decode_record(&frame)?)),
                    Document::Many(frames) => frames
                        .iter()
                        .map(decode_record)
                        .collect::<aptechka_lwp::Result<Vec<_>>>()
                        .map(Decoded::Many)
                        .map_err(NegotiateError::from),
                }
            }
            ContentKind::Positional => plain_document(kind, payload),
            ContentKind::GeneralBinary => self
                .decode_as(entity, kind, payload)
                .map(Decoded::One),
        }
    }
}

fn effective_kind(entity: Entity, kind: ContentKind) -> ContentKind {
    if entity.supports(kind) {
        return kind;
    }
    warn!(%entity, %kind, "representation unavailable for entity, using plain JSON");
    ContentKind::Plain
}

/// Text of a payload that must be textual. UTF-8 bytes are accepted.
fn payload_text(kind: ContentKind, payload: InboundPayload) -> Result<String> {
    match payload {
        InboundPayload::Text(text) => Ok(text),
        InboundPayload::Bytes(bytes) => {
            String::from_utf8(bytes.to_vec()).map_err(|_| NegotiateError::WrongPayloadType {
                kind,
                expected: "text",
                found: "non-UTF-8 bytes",
            })
        }
        InboundPayload::Empty => Err(NegotiateError::EmptyPayload { kind }),
        InboundPayload::Parsed(_) => Err(NegotiateError::WrongPayloadType {
            kind,
            expected: "text",
            found: "parsed JSON",
        }),
    }
}

fn parse_json(kind: ContentKind, payload: InboundPayload) -> Result<serde_json::Value> {
    match payload {
        InboundPayload::Parsed(value) => Ok(value),
        InboundPayload::Text(text) => Ok(serde_json::from_str(&text)?),
        InboundPayload::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
        InboundPayload::Empty => Err(NegotiateError::EmptyPayload { kind }),
    }
}

fn plain_record(kind: ContentKind, payload: InboundPayload) -> Result<Record> {
    Ok(Record::from_json(&parse_json(kind, payload)?)?)
}

fn plain_document(kind: ContentKind, payload: InboundPayload) -> Result<Decoded> {
    match parse_json(kind, payload)? {
        serde_json::Value::Array(items) => items
            .iter()
            .map(Record::from_json)
            .collect::<aptechka_record::Result<Vec<_>>>()
            .map(Decoded::Many)
            .map_err(NegotiateError::from),
        document => Ok(Decoded::One(Record::from_json(&document)?)),
    }
}
