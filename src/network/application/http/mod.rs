//! HTTP/1.1 call pipeline.
//!
//! A call flows through four stages:
//!
//! 1. the payload stage ([`payload`]) turns a typed value or verbatim text
//!    into a body and its `Content-Type`;
//! 2. the [`Executor`] delivers the [`Request`] and returns the buffered
//!    [`Response`];
//! 3. the response stage ([`response`]) checks the status and either passes
//!    the body text through or decodes it into the caller's type;
//! 4. the verb facades ([`Get`], [`Put`], [`Post`], [`Delete`]) tie the stages
//!    together behind one [`Options`] value.
//!
//! The default executor opens a TCP connection per call and closes it
//! afterwards. [`Client`] works with any type implementing
//! [`Connection`](crate::network::Connection), so tests and TLS wrappers can
//! supply their own transport.
//!
//! ```rust,no_run
//! use librest::network::application::http::{Client, Headers, Method, Request};
//! use librest::network::Connect;
//! use librest::network::tcp::TcpConnector;
//!
//! let connection = TcpConnector::default().connect("192.168.1.20:80")?;
//! let mut client = Client::new(connection);
//!
//! let request = Request::new(Method::Get, "http://192.168.1.20/api/status", Headers::new(), None);
//! let response = client.request(&request)?;
//! assert!(response.is_success());
//! # Ok::<(), librest::network::error::Error>(())
//! ```

/// HTTP client, request and response types, and executors.
pub mod client;
/// Global defaults and per-call options.
pub mod options;
/// Request body preparation.
pub mod payload;
/// Response interpretation.
pub mod response;
/// URL parsing and building.
pub mod url;
/// The `Get`, `Put`, `Post` and `Delete` facades.
pub mod verb;

pub use client::{
    Client, Executor, Header, Headers, HttpExecutor, Method, NetworkExecutor, Request, Response, ResponseHeaders,
};
pub use options::{Config, Options};
pub use payload::{Payload, PreparedBody};
pub use url::{Url, UrlBuilder};
pub use verb::{Delete, Get, Http, Post, Put};
