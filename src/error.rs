//! Crate-level error type

use std::path::PathBuf;

use crate::network::error::Error as TransportError;
use crate::serialization::SerializationError;

/// Any failure of a call or a document conversion.
///
/// A call either completes fully or fails at the first failing stage; nothing
/// is retried or downgraded on the way to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A payload or response did not match the expected format and type.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    /// A file could not be opened, read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The request could not be delivered or the server rejected it.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
