use thiserror::Error;

/// Unified error type for the table-schema library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The type tree itself is malformed (duplicate field id, duplicate path,
    /// a projection root that is not a struct).
    #[error("Invalid Schema: {0}")]
    InvalidSchema(String),

    /// The projection API was misused by the caller.
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of an [`Error`], for callers that branch on the
/// failure without looking at the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSchema,
    InvalidArgument,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSchema(_) => ErrorKind::InvalidSchema,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the bare message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidSchema(msg) | Error::InvalidArgument(msg) => msg,
        }
    }
}

/// A specialized `Result` type for schema operations.
pub type Result<T> = std::result::Result<T, Error>;

/*
Error handling policy:

Malformed trees and API misuse are reported through Result<T, Error> and
propagated with `?` out of every recursive walk, so no partial index or
partially projected schema ever escapes. A missing field is not an error:
lookups return Ok(None) and projections of unknown names or ids return an
empty schema.
*/
