//! Transient domain records exchanged by the aptechka wire layer.
//!
//! A [`Record`] is an ordered mapping of field names to scalar [`Value`]s.
//! Records are built fresh for every request or response and carry no
//! identity beyond the fields they hold. Every representation in the wire
//! layer decodes into a `Record` and encodes from one.

pub mod error;
pub mod record;
pub mod value;

pub use error::{RecordError, Result};
pub use record::Record;
pub use value::{json_kind, Value};
