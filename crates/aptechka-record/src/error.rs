/// Errors raised while building a record from an untyped document.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The document is not a key/value object.
    #[error("expected a key/value record, found {found}")]
    NotAnObject { found: &'static str },

    /// A field holds an array or object; records are flat.
    #[error("field '{field}' holds a nested {found}")]
    NestedValue { field: String, found: &'static str },

    /// The document is not valid JSON.
    #[error("record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecordError>;
