use core::marker::PhantomData;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::codec::Codec;
use super::document::{DocType, Namespaces};
use super::error::SerializationError;
use super::{Encoding, Format, SerializerKind};
use crate::error::Error;

/// Typed XML document serializer, independent of the HTTP layer.
///
/// Defaults to the contract strategy, UTF-8 and the empty namespace set.
///
/// ```rust
/// use librest::serialization::{DocType, XmlSerializer};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// #[serde(rename = "note")]
/// struct Note {
///     to: String,
/// }
///
/// let xml = XmlSerializer::<Note>::new()
///     .doc_type(DocType::new("note").system_id("note.dtd"))
///     .serialize_to_string(&Note { to: "ops".into() })
///     .unwrap();
/// assert!(xml.starts_with("<?xml"));
/// ```
pub struct XmlSerializer<T> {
    codec: Codec,
    _entity: PhantomData<fn() -> T>,
}

impl<T> XmlSerializer<T> {
    /// Creates a serializer with the default document settings.
    pub fn new() -> Self {
        Self {
            codec: Codec::new(Format::Xml, SerializerKind::ContractBased),
            _entity: PhantomData,
        }
    }

    /// Selects the serialization strategy.
    pub fn serializer(mut self, serializer: SerializerKind) -> Self {
        self.codec.serializer = serializer;
        self
    }

    /// Selects the document encoding.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.codec.encoding = encoding;
        self
    }

    /// Declares namespaces on the root element.
    pub fn namespaces(mut self, namespaces: Namespaces) -> Self {
        self.codec.namespaces = namespaces;
        self
    }

    /// Emits a DOCTYPE after the prolog.
    pub fn doc_type(mut self, doc_type: DocType) -> Self {
        self.codec.doc_type = Some(doc_type);
        self
    }

    /// The underlying codec.
    pub fn codec(&self) -> &Codec {
        &self.codec
    }
}

impl<T: Serialize> XmlSerializer<T> {
    /// Serializes `entity` to a string.
    pub fn serialize_to_string(&self, entity: &T) -> Result<String, SerializationError> {
        self.codec.serialize_to_string(entity)
    }

    /// Serializes `entity` to the file at `path`.
    pub fn serialize_to_file(&self, path: impl AsRef<Path>, entity: &T) -> Result<(), Error> {
        self.codec.serialize_to_file(path, entity)
    }
}

impl<T: DeserializeOwned> XmlSerializer<T> {
    /// Deserializes an entity from a string.
    pub fn deserialize_from_string(&self, xml: &str) -> Result<T, SerializationError> {
        self.codec.deserialize_from_string(xml)
    }

    /// Deserializes an entity from the file at `path`.
    pub fn deserialize_from_file(&self, path: impl AsRef<Path>) -> Result<T, Error> {
        self.codec.deserialize_from_file(path)
    }
}

impl<T> Clone for XmlSerializer<T> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> core::fmt::Debug for XmlSerializer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("XmlSerializer")
            .field("entity", &core::any::type_name::<T>())
            .field("codec", &self.codec)
            .finish()
    }
}

impl<T> Default for XmlSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}
