use thiserror::Error;

/// A record type's declared column metadata is inconsistent.
///
/// Raised on the first resolution of the offending type. The type's records
/// cannot be exported until its declarations are fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("record `{record}`: index cannot be repeated: {index}")]
    DuplicateIndex { record: String, index: u32 },

    #[error("record `{record}`: title cannot be repeated: {title:?}")]
    DuplicateTitle { record: String, title: String },

    #[error("record `{record}` has no field with column metadata")]
    NoColumnMetadata { record: String },

    #[error("record `{record}` declares field `{field}` more than once")]
    DuplicateField { record: String, field: String },
}

/// A descriptor could not read from the instance it was handed.
///
/// This means the descriptor and the instance do not belong together. Retrying
/// will not help.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("field `{field}` expects an instance of `{expected}`")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("field `{field}` could not be read: {message}")]
    ReadFailed { field: String, message: String },

    #[error("record `{record}` has no registered constructor")]
    NotInstantiable { record: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
