//! MessagePack map encoding of records.
//!
//! Each payload holds exactly one encoded map. Decoding is strict about
//! bytes left over after that map, with one narrow exception: an upstream
//! framing layer is known to pad otherwise valid payloads, so when the only
//! problem is trailing bytes the leading value is decoded on its own (see
//! [`recovery`]). Every other malformation is a hard failure.

pub mod codec;
pub mod config;
pub mod error;
pub mod recovery;
pub mod timestamp;

pub use codec::{decode, encode, MsgpackCodec};
pub use config::{MsgpackConfig, DEFAULT_MAX_PAYLOAD};
pub use error::{MsgpackError, Result};
