//! # Application Layer Protocols
//!
//! Protocols built on top of the [`Connection`](crate::network::Connection)
//! traits. Each one is connection agnostic: it takes any transport that can
//! read, write and close.
//!
//! - **[`http`]**: HTTP/1.1 client with typed request and response bodies

/// HTTP client and verb facades.
///
/// Provides the HTTP/1.1 client, the per-connection executor and the typed
/// `Get`/`Put`/`Post`/`Delete` facades.
pub mod http;
