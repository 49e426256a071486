use std::io::{ErrorKind, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use super::error::Error;
use super::{Close, Connect, Connection, Read, Write};

fn classify(err: std::io::Error, fallback: Error) -> Error {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Timeout,
        ErrorKind::ConnectionRefused => Error::ConnectionRefused,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
            Error::ConnectionClosed
        }
        _ => fallback,
    }
}

/// A plain TCP connection.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Wraps an established stream.
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Read for TcpConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream
            .read(buf)
            .map_err(|e| classify(e, Error::ReadError))
    }
}

impl Write for TcpConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream
            .write(buf)
            .map_err(|e| classify(e, Error::WriteError))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream
            .flush()
            .map_err(|e| classify(e, Error::WriteError))
    }
}

impl Close for TcpConnection {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // The peer may already have closed its side after a `Connection: close` response.
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(classify(e, Error::ConnectionClosed)),
        }
    }
}

impl Connection for TcpConnection {}

/// Opens [`TcpConnection`]s with optional timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector {
    /// Timeout applied to every read.
    pub read_timeout: Option<Duration>,
    /// Timeout applied to every write.
    pub write_timeout: Option<Duration>,
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let stream = TcpStream::connect(remote).map_err(|e| match e.kind() {
            ErrorKind::InvalidInput => Error::InvalidAddress,
            _ => classify(e, Error::ConnectionRefused),
        })?;
        stream
            .set_read_timeout(self.read_timeout)
            .map_err(|e| classify(e, Error::ProtocolError))?;
        stream
            .set_write_timeout(self.write_timeout)
            .map_err(|e| classify(e, Error::ProtocolError))?;
        Ok(TcpConnection::new(stream))
    }
}
