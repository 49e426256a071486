//! URL parsing and construction for plain `http://` endpoints.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::network::error::Error;

const DEFAULT_PORT: u16 = 80;

/// Everything but the RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A parsed `http://host[:port]/path?query` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    host: String,
    port: u16,
    target: String,
}

impl Url {
    /// Parses an absolute `http` URL. Other schemes, user info and empty hosts
    /// are rejected with [`Error::InvalidAddress`].
    pub fn parse(url: &str) -> Result<Self, Error> {
        let url = url.trim();
        let scheme_end = url.find("://").ok_or(Error::InvalidAddress)?;
        if !url[..scheme_end].eq_ignore_ascii_case("http") {
            return Err(Error::InvalidAddress);
        }
        let rest = &url[scheme_end + 3..];
        let rest = rest.split('#').next().unwrap_or(rest);

        let (authority, target) = match rest.find(['/', '?']) {
            Some(pos) if rest[pos..].starts_with('?') => (&rest[..pos], format!("/{}", &rest[pos..])),
            Some(pos) => (&rest[..pos], rest[pos..].to_string()),
            None => (rest, String::from("/")),
        };
        if authority.contains('@') {
            return Err(Error::InvalidAddress);
        }

        let (host, port) = split_authority(authority)?;
        if host.is_empty() {
            return Err(Error::InvalidAddress);
        }

        Ok(Self {
            host: host.to_string(),
            port,
            target,
        })
    }

    /// Host name or address, without brackets for IPv6 literals.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path and query, as sent on the request line.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Value of the `Host` header.
    pub fn authority(&self) -> String {
        let host = self.bracketed_host();
        if self.port == DEFAULT_PORT {
            host
        } else {
            format!("{host}:{}", self.port)
        }
    }

    /// `host:port` as understood by a [`Connect`](crate::network::Connect)
    /// implementation.
    pub fn remote(&self) -> String {
        format!("{}:{}", self.bracketed_host(), self.port)
    }

    fn bracketed_host(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }
}

fn split_authority(authority: &str) -> Result<(&str, u16), Error> {
    let parse_port = |port: &str| port.parse::<u16>().map_err(|_| Error::InvalidAddress);

    if let Some(literal) = authority.strip_prefix('[') {
        let close = literal.find(']').ok_or(Error::InvalidAddress)?;
        let host = &literal[..close];
        return match literal[close + 1..].strip_prefix(':') {
            Some(port) => Ok((host, parse_port(port)?)),
            None if literal[close + 1..].is_empty() => Ok((host, DEFAULT_PORT)),
            None => Err(Error::InvalidAddress),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => Ok((host, parse_port(port)?)),
        None => Ok((authority, DEFAULT_PORT)),
    }
}

/// Assembles an `http` URL from its parts.
///
/// Path segments and query pairs are percent-encoded when the URL is built.
///
/// ```rust
/// use librest::network::application::http::UrlBuilder;
///
/// let url = UrlBuilder::new()
///     .host("api.example.com")
///     .port(8080)
///     .path("v1/devices")
///     .segment("north wing")
///     .query("limit", "10")
///     .build();
/// assert_eq!(url, "http://api.example.com:8080/v1/devices/north%20wing?limit=10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlBuilder {
    host: String,
    port: Option<u16>,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl UrlBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets a non-default port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Appends every non-empty `/`-separated segment of `path`.
    pub fn path(mut self, path: &str) -> Self {
        self.segments.extend(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Appends a single segment; a `/` inside it is encoded.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Renders the URL.
    pub fn build(&self) -> String {
        let mut url = format!("http://{}", self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        url.push('/');
        let path: Vec<String> = self.segments.iter().map(|s| percent_encode(s)).collect();
        url.push_str(&path.join("/"));
        if !self.query.is_empty() {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }
}

fn percent_encode(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}
