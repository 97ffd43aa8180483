//! Error types for flash message validation and parsing.

use thiserror::Error;

/// Errors returned while constructing flash message values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlashDomainError {
    /// The message body is empty.
    #[error("message text must not be empty")]
    EmptyText,

    /// A field exceeds its configured maximum length.
    #[error("{field} is {length} characters long, the maximum is {max}")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Actual length in characters.
        length: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// The session key is malformed.
    #[error("invalid session key '{0}'")]
    InvalidSessionKey(String),
}

/// Error returned while parsing a level name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message level: {0}")]
pub struct ParseLevelError(pub String);

/// Error returned while parsing an ordering expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported ordering field: {0}")]
pub struct ParseOrderingError(pub String);
