use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PiiError {
    #[error("invalid detector definition: {reason}")]
    InvalidDefinition { reason: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("invalid pii task type for {category}: {kind}")]
    InvalidTaskType { category: String, kind: String },

    #[error("invalid pattern for {name}: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("missing implementation for pii task: {task}")]
    Unimplemented { task: String },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("cannot parse document {path}: {reason}")]
    DocumentParse { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PiiError {
    /// Shorthand for a definition error naming the record and field at fault.
    pub fn definition(record: usize, field: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidDefinition {
            reason: format!("record #{record}, field '{field}': {reason}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, PiiError>;
