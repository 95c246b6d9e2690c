//! Wire representations and content negotiation for the aptechka medicine
//! inventory.
//!
//! A record travels in one of three interchangeable representations: plain
//! JSON, a positional LWP frame (medicines only), or a MessagePack map. This
//! crate ties the codecs together and picks one per exchange.
//!
//! # Crate Structure
//!
//! - [`record`]: the scalar record model every codec decodes into
//! - [`lwp`]: unit codes, day codes and the positional frame codec
//! - [`msgpack`]: MessagePack maps with trailing-bytes recovery
//! - [`negotiate`]: Accept parsing and per-entity routing (behind `negotiate` feature)

/// Re-export record types.
pub mod record {
    pub use aptechka_record::*;
}

/// Re-export positional codec types.
pub mod lwp {
    pub use aptechka_lwp::*;
}

/// Re-export MessagePack codec types.
pub mod msgpack {
    pub use aptechka_msgpack::*;
}

/// Re-export negotiation types (requires `negotiate` feature).
#[cfg(feature = "negotiate")]
pub mod negotiate {
    pub use aptechka_negotiate::*;
}
