//! Representation negotiation for aptechka payloads.
//!
//! Three interchangeable wire representations exist for a record:
//!
//! - plain JSON (`application/json`)
//! - positional LWP frames (`application/lwp`, medicine only)
//! - MessagePack maps (`application/msgpack`)
//!
//! A [`Negotiator`] picks one per exchange from the caller's ranked Accept
//! list and routes payloads to the matching codec. It holds no state
//! between calls.

pub mod config;
pub mod entity;
pub mod error;
pub mod kind;
pub mod negotiator;
pub mod payload;

pub use config::NegotiatorConfig;
pub use entity::Entity;
pub use error::{NegotiateError, Result};
pub use kind::{accepted_label, parse_accept, ContentKind};
pub use negotiator::{select_for_response, InboundRoute, Negotiator};
pub use payload::{Decoded, InboundPayload, Outbound, OutboundBody};
