//! Error types for Quoted-Printable operations

use std::io;

use thiserror::Error;

/// A malformed Quoted-Printable input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// `=` followed by something other than two hex digits or CRLF
    #[error("Invalid escape sequence \"{}\" at offset {offset}", .sequence.escape_ascii())]
    InvalidEscape {
        /// Source offset of the `=`
        offset: u64,
        /// The `=` and the bytes read after it
        sequence: Vec<u8>,
    },
    /// Input ended in the middle of an escape sequence
    #[error("Input ended with incomplete escape sequence at offset {offset}")]
    TruncatedEscape {
        /// Source offset of the `=`
        offset: u64,
    },
}

/// Main error type for Quoted-Printable operations
#[derive(Debug, Error)]
pub enum QpError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
    /// Invalid Quoted-Printable data
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<io::Error> for QpError {
    /// Recovers a [`DecodeError`] that travelled through an `io::Read` impl
    fn from(err: io::Error) -> Self {
        match err.downcast::<DecodeError>() {
            Ok(decode) => QpError::Decode(decode),
            Err(err) => QpError::Io(err),
        }
    }
}

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// A specialized `Result` type for Quoted-Printable operations
pub type Result<T> = std::result::Result<T, QpError>;
