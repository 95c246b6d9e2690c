//! JSON text wrapper for positional frames.
//!
//! A single record travels as one JSON array, a list response as a JSON
//! array of arrays.

use aptechka_record::json_kind;
use serde_json::Value as Slot;

use crate::codec::PositionalFrame;
use crate::error::{LwpError, Result};

/// A parsed LWP document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// A single frame.
    One(PositionalFrame),
    /// A list of frames. `[]` parses as an empty list.
    Many(Vec<PositionalFrame>),
}

/// Render one frame as JSON text.
pub fn render_frame(frame: &PositionalFrame) -> Result<String> {
    Ok(serde_json::to_string(frame)?)
}

/// Render a list of frames as a JSON array of arrays.
pub fn render_frames(frames: &[PositionalFrame]) -> Result<String> {
    Ok(serde_json::to_string(frames)?)
}

/// Parse JSON text holding exactly one frame.
pub fn parse_frame(text: &str) -> Result<PositionalFrame> {
    let document: Slot = serde_json::from_str(text)?;
    into_frame(document)
}

/// Parse JSON text holding either one frame or a list of frames.
///
/// The outer array is a list when its first element is itself an array.
pub fn parse_document(text: &str) -> Result<Document> {
    let document: Slot = serde_json::from_str(text)?;
    let items = match document {
        Slot::Array(items) => items,
        other => {
            return Err(LwpError::NotAFrame {
                found: json_kind(&other),
            })
        }
    };

    match items.first() {
        None => Ok(Document::Many(Vec::new())),
        Some(Slot::Array(_)) => items
            .into_iter()
            .map(into_frame)
            .collect::<Result<Vec<_>>>()
            .map(Document::Many),
        Some(_) => Ok(Document::One(PositionalFrame::new(items))),
    }
}

fn into_frame(value: Slot) -> Result<PositionalFrame> {
    match value {
        Slot::Array(slots) => Ok(PositionalFrame::new(slots)),
        other => Err(LwpError::NotAFrame {
            found: json_kind(&other),
        }),
    }
}
