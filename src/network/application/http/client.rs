use crate::network::error::Error;
use crate::network::tcp::TcpConnector;
use crate::network::{Connect, Connection};
use crate::serialization::Encoding;
use core::fmt::Write as _;

use super::url::Url;

const MAX_REQUEST_HEADERS: usize = 32;
const MAX_HEAD_LEN: usize = 64 * 1024;
const READ_CHUNK_LEN: usize = 2048;

/// Bounded header list of an outgoing request.
pub type Headers = heapless::Vec<Header, MAX_REQUEST_HEADERS>;

/// Header list of a response, as long as the server sends it.
pub type ResponseHeaders = Vec<Header>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    /// Whether a missing body is still announced with `Content-Length: 0`.
    fn expects_body(&self) -> bool {
        matches!(self, Method::Put | Method::Post)
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Method {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    /// Creates a header, failing with [`Error::ProtocolError`] when the name
    /// is not an HTTP token or the value would break the header line.
    pub fn new(name: &str, value: &str) -> Result<Self, Error> {
        let token = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);
        if name.is_empty() || !name.chars().all(token) || value.contains(['\r', '\n']) {
            return Err(Error::ProtocolError);
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

fn find_header<'h>(headers: &'h [Header], name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
}

/// An outgoing request.
///
/// Built once per call and immutable afterwards; an [`Executor`] consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(
        method: Method,
        url: impl Into<String>,
        headers: Headers,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
            body,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The encoding named by the `charset` parameter of `Content-Type`, if
    /// there is one. Labels `encoding_rs` does not know read as ISO-8859-1.
    pub fn charset(&self) -> Option<Encoding> {
        let content_type = self.header("Content-Type")?;
        content_type
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| Encoding::from_label_or_latin1(value))
    }
}

/// Performs a single buffered request/response exchange.
pub trait Executor {
    /// Sends `request` and returns the complete response.
    fn execute(&mut self, request: Request) -> Result<Response, Error>;
}

/// HTTP/1.1 client over an established connection.
pub struct Client<C: Connection> {
    connection: C,
}

impl<C: Connection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Gives the connection back, e.g. to close it.
    pub fn into_inner(self) -> C {
        self.connection
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn request(&mut self, request: &Request) -> Result<Response, Error> {
        let url = Url::parse(request.url())?;

        // --- Send Request ---
        let head = encode_head(request, &url)?;
        self.write_all(head.as_bytes())?;
        if let Some(body) = request.body() {
            self.write_all(body)?;
        }
        self.connection.flush().map_err(|_| Error::WriteError)?;

        // --- Receive Response ---
        self.read_response(request.method())
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), Error> {
        while !data.is_empty() {
            match self.connection.write(data) {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => data = &data[n..],
                Err(e) => {
                    tracing::debug!(error = ?e, "connection write failed");
                    return Err(Error::WriteError);
                }
            }
        }
        Ok(())
    }

    fn read_chunk(&mut self, chunk: &mut [u8]) -> Result<usize, Error> {
        self.connection.read(chunk).map_err(|e| {
            tracing::debug!(error = ?e, "connection read failed");
            Error::ReadError
        })
    }

    fn read_response(&mut self, method: Method) -> Result<Response, Error> {
        let mut buffer = Vec::with_capacity(READ_CHUNK_LEN);
        let mut chunk = [0u8; READ_CHUNK_LEN];

        let header_end = loop {
            if let Some(pos) = find_slice(&buffer, b"\r\n\r\n") {
                break pos;
            }
            if buffer.len() > MAX_HEAD_LEN {
                return Err(Error::ProtocolError);
            }
            match self.read_chunk(&mut chunk)? {
                0 if buffer.is_empty() => return Err(Error::ConnectionClosed),
                0 => return Err(Error::ProtocolError), // Closed in the middle of the head
                n => buffer.extend_from_slice(&chunk[..n]),
            }
        };

        let mut body = buffer.split_off(header_end + 4);
        let (status_code, headers) = parse_head(&buffer[..header_end])?;

        if find_header(&headers, "Transfer-Encoding")
            .is_some_and(|value| value.to_ascii_lowercase().contains("chunked"))
        {
            return Err(Error::ProtocolError);
        }

        let bodiless = (100..200).contains(&status_code) || status_code == 204 || status_code == 304;
        let content_length = match find_header(&headers, "Content-Length") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| Error::ProtocolError)?,
            ),
            None => None,
        };

        if bodiless {
            body.clear();
        } else if let Some(len) = content_length {
            while body.len() < len {
                match self.read_chunk(&mut chunk)? {
                    0 => return Err(Error::ConnectionClosed), // Prematurely closed
                    n => body.extend_from_slice(&chunk[..n]),
                }
            }
            // Truncate to ensure we have exactly `len` bytes.
            body.truncate(len);
        } else {
            // No length: the body runs until the server closes the connection.
            loop {
                match self.read_chunk(&mut chunk)? {
                    0 => break,
                    n => body.extend_from_slice(&chunk[..n]),
                }
            }
        }

        tracing::trace!(%method, status_code, body_len = body.len(), "response read");
        Ok(Response {
            status_code,
            headers,
            body,
        })
    }
}

impl<C: Connection> Executor for Client<C> {
    fn execute(&mut self, request: Request) -> Result<Response, Error> {
        self.request(&request)
    }
}

impl<C: Connection + core::fmt::Debug> core::fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .finish()
    }
}

fn encode_head(request: &Request, url: &Url) -> Result<String, Error> {
    let mut head = String::new();

    // Request line
    write!(head, "{} {} HTTP/1.1\r\n", request.method(), url.target()).map_err(|_| Error::WriteError)?;

    // Headers
    if request.header("Host").is_none() {
        write!(head, "Host: {}\r\n", url.authority()).map_err(|_| Error::WriteError)?;
    }
    for header in request.headers() {
        if header.name.eq_ignore_ascii_case("Content-Length") {
            continue;
        }
        write!(head, "{}: {}\r\n", header.name, header.value).map_err(|_| Error::WriteError)?;
    }
    if request.header("User-Agent").is_none() {
        write!(head, "User-Agent: {}\r\n", env!("CARGO_PKG_NAME")).map_err(|_| Error::WriteError)?;
    }
    if request.header("Connection").is_none() {
        head.push_str("Connection: close\r\n");
    }

    // Body
    match request.body() {
        Some(body) => write!(head, "Content-Length: {}\r\n", body.len()).map_err(|_| Error::WriteError)?,
        None if request.method().expects_body() => head.push_str("Content-Length: 0\r\n"),
        None => {}
    }
    head.push_str("\r\n");
    Ok(head)
}

fn parse_head(head: &[u8]) -> Result<(u16, ResponseHeaders), Error> {
    let header_str = core::str::from_utf8(head).map_err(|_| Error::ProtocolError)?;
    let mut lines = header_str.lines();

    // Parse status line
    let status_line = lines.next().ok_or(Error::ProtocolError)?;
    let mut status_parts = status_line.splitn(3, ' ');
    let version = status_parts.next().ok_or(Error::ProtocolError)?;
    if !version.starts_with("HTTP/") {
        return Err(Error::ProtocolError);
    }
    let status_code = status_parts
        .next()
        .ok_or(Error::ProtocolError)?
        .parse::<u16>()
        .map_err(|_| Error::ProtocolError)?;

    // Parse headers
    let mut headers = ResponseHeaders::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or(Error::ProtocolError)?;
        headers.push(Header::new(name.trim(), value.trim())?);
    }
    Ok((status_code, headers))
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Opens a fresh connection for every request and closes it afterwards,
/// whether the exchange succeeded or not.
#[derive(Debug, Clone, Default)]
pub struct NetworkExecutor<N> {
    connector: N,
}

/// The executor used when none is supplied: plain TCP.
pub type HttpExecutor = NetworkExecutor<TcpConnector>;

impl<N> NetworkExecutor<N> {
    pub fn new(connector: N) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &N {
        &self.connector
    }
}

impl<N> Executor for NetworkExecutor<N>
where
    N: Connect,
    N::Error: Into<Error>,
{
    fn execute(&mut self, request: Request) -> Result<Response, Error> {
        let url = Url::parse(request.url())?;
        let remote = url.remote();
        let connection = self.connector.connect(&remote).map_err(Into::into)?;

        let mut client = Client::new(connection);
        let outcome = client.request(&request);
        if let Err(e) = crate::network::Close::close(client.into_inner()) {
            tracing::warn!(error = ?e, %remote, "failed to close connection");
        }
        outcome
    }
}
