//! # librest - typed HTTP client helper
//!
//! Issues `GET`, `PUT`, `POST` and `DELETE` calls against a URL, serializes a
//! typed payload into the request body and deserializes the response body
//! into a caller-chosen type. A companion XML serializer with namespace and
//! DOCTYPE control works independently of HTTP.
//!
//! ## Features
//!
//! ### Serialization
//! - **XML** and **JSON** wire formats
//! - Contract-based (serde attributes) and reflection-based (naming by
//!   convention) serializers
//! - UTF-8, UTF-16, US-ASCII and ISO-8859-1 documents
//! - String, byte and file entry points
//!
//! ### HTTP
//! - One buffered request and response per call over plain `http://`
//! - Verb facades with per-call format and serializer options
//! - Pluggable transport through the [`network`] traits
//!
//! ## Usage
//!
//! ```rust,no_run
//! use librest::network::application::http::{Get, Put};
//! use librest::serialization::{Format, SerializerKind};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! #[serde(rename = "setpoint")]
//! struct Setpoint {
//!     celsius: f32,
//! }
//!
//! let current: Setpoint = Get::new("http://10.0.0.5/thermostat").fetch()?;
//!
//! Put::new("http://10.0.0.5/thermostat")
//!     .format(Format::Json)
//!     .serializer(SerializerKind::ContractBased)
//!     .send_payload(&Setpoint { celsius: current.celsius + 0.5 })?;
//! # Ok::<(), librest::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! - `defmt`: Enable defmt formatting of the error and option enums

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

/// Crate-level error type.
pub mod error;

/// Network abstraction layer: transport traits, TCP transport and the HTTP
/// client.
pub mod network;

/// Codec registry for XML and JSON documents.
pub mod serialization;

pub use error::{Error, Result};
