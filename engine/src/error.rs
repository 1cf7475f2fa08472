//! Error types for the Ferrand engine.

use thiserror::Error;

/// All possible errors from the Ferrand engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Input errors
    #[error("input must be in the form name=value: {0:?}")]
    Format(String),

    #[error("name and value may only contain the characters 0-9, A-Z and a-z: {0:?}")]
    Charset(String),

    #[error("name must not be numeric: {name}")]
    NameIsNumeric { name: String },

    // Markup errors
    #[error("markup input is not a sequence of records: {0}")]
    NotASequence(String),

    // Sort errors
    #[error("unknown sort field: {0} (expected id, name or value)")]
    UnknownField(String),

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl Error {
    /// Stable identifier of the error variant, used at the JSON boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Format(_) => "format",
            Error::Charset(_) => "charset",
            Error::NameIsNumeric { .. } => "nameIsNumeric",
            Error::NotASequence(_) => "notASequence",
            Error::UnknownField(_) => "unknownField",
            Error::InvalidSnapshot(_) => "invalidSnapshot",
        }
    }

    /// Short heading shown above the message in a user-facing notification.
    pub fn title(&self) -> &'static str {
        match self {
            Error::Format(_) => "Hmm... your input does not look right",
            Error::Charset(_) => "Oops! We only allow letters and numbers",
            Error::NameIsNumeric { .. } => "Ahh. That's a bad name",
            Error::NotASequence(_) => "Data error",
            Error::UnknownField(_) => "Cannot sort by that",
            Error::InvalidSnapshot(_) => "Snapshot rejected",
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
