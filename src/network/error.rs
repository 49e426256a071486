//! Common error types for network operations

/// A common error type for network operations.
///
/// This enum defines the errors that can occur while delivering a request and
/// reading its response. It is propagated unchanged through the HTTP layer.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    #[error("connection is not open")]
    NotOpen,
    /// An error occurred during a write operation.
    #[error("write failed")]
    WriteError,
    /// An error occurred during a read operation.
    #[error("read failed")]
    ReadError,
    /// A connection attempt was refused.
    #[error("connection refused")]
    ConnectionRefused,
    /// A timeout occurred.
    #[error("timed out")]
    Timeout,
    /// The connection was closed.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// An invalid address was provided.
    #[error("invalid address")]
    InvalidAddress,
    /// A protocol-specific error occurred.
    #[error("protocol error")]
    ProtocolError,
    /// The server answered with a non-success status code.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
            Error::UnexpectedStatus(code) => defmt::write!(f, "UnexpectedStatus({=u16})", code),
        }
    }
}
