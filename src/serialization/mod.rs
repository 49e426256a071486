//! # Codec registry
//!
//! Pure functions that turn a typed value into a document and back,
//! parameterized by [`Format`], [`SerializerKind`] and [`Encoding`].
//!
//! | Format | ContractBased            | ReflectionBased                     |
//! |--------|--------------------------|-------------------------------------|
//! | XML    | `quick_xml` serde, root from the serde name | convention-driven tree, root from the Rust type name |
//! | JSON   | `serde_json`             | `serde-json-core`                   |
//!
//! Serialization always writes into an in-memory byte buffer in the chosen
//! encoding; [`Codec::serialize_to_string`] transcodes that buffer back into
//! text. Deserialization from a string parses the text directly.
//!
//! XML documents start with a prolog, optionally followed by a DOCTYPE, and
//! carry no namespace declarations unless a [`Namespaces`] set asks for them.
//!
//! ```rust
//! use librest::serialization::{Codec, Format, SerializerKind};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! #[serde(rename = "status")]
//! struct Status {
//!     code: u16,
//! }
//!
//! let codec = Codec::new(Format::Xml, SerializerKind::ContractBased);
//! let bytes = codec.encode(&Status { code: 7 }).unwrap();
//! let back: Status = codec.decode(&bytes).unwrap();
//! assert_eq!(back, Status { code: 7 });
//! ```

/// Codec selection and the string, byte and file entry points.
pub mod codec;
/// DOCTYPE directives and namespace sets.
pub mod document;
/// Byte/text transcodings.
pub mod encoding;
/// Serialization errors.
pub mod error;
/// Typed XML helper.
pub mod helper;

mod json;
mod xml;


pub use codec::Codec;
pub use document::{DocType, Namespaces};
pub use encoding::Encoding;
pub use error::SerializationError;
pub use helper::XmlSerializer;

/// Wire format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// XML documents.
    #[default]
    Xml,
    /// JSON documents.
    Json,
}

impl Format {
    /// Media type sent in `Content-Type` and `Accept`.
    pub fn media_type(&self) -> &'static str {
        match self {
            Format::Xml => "application/xml",
            Format::Json => "application/json",
        }
    }

    /// `Content-Type` value for a body in `encoding`.
    pub fn content_type(&self, encoding: Encoding) -> String {
        format!("{}; charset={}", self.media_type(), encoding.label())
    }
}

impl core::fmt::Display for Format {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Format::Xml => f.write_str("XML"),
            Format::Json => f.write_str("JSON"),
        }
    }
}

/// Strategy used to map a type onto its document within a [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SerializerKind {
    /// Follows the serde attributes declared on the type.
    #[default]
    ContractBased,
    /// Derives names from the shape and Rust type of the value.
    ReflectionBased,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Format {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Format::Xml => defmt::write!(f, "XML"),
            Format::Json => defmt::write!(f, "JSON"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SerializerKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SerializerKind::ContractBased => defmt::write!(f, "ContractBased"),
            SerializerKind::ReflectionBased => defmt::write!(f, "ReflectionBased"),
        }
    }
}
