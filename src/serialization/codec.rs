use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::document::{DocType, Namespaces};
use super::error::SerializationError;
use super::{Encoding, Format, SerializerKind, json, xml};
use crate::error::Error;

/// A fully resolved conversion: one (format, serializer) pair plus the
/// encoding and document settings that go with it.
///
/// The pair is fixed before any bytes are produced or read, so a single
/// conversion never switches strategy half-way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Codec {
    /// Wire format.
    pub format: Format,
    /// Strategy used within the format.
    pub serializer: SerializerKind,
    /// Transcoding applied to produced documents.
    pub encoding: Encoding,
    /// Namespace declarations for the XML root element.
    pub namespaces: Namespaces,
    /// DOCTYPE emitted after the XML prolog.
    pub doc_type: Option<DocType>,
}

impl Codec {
    /// Creates a codec with UTF-8 and no document extras.
    pub fn new(format: Format, serializer: SerializerKind) -> Self {
        Self {
            format,
            serializer,
            ..Self::default()
        }
    }

    /// Sets the encoding.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the namespace set applied to the XML root.
    pub fn namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Sets the DOCTYPE directive.
    pub fn doc_type(mut self, doc_type: DocType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    /// Produces the document as text, before transcoding.
    fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializationError> {
        tracing::trace!(format = %self.format, serializer = ?self.serializer, "encoding value");
        match self.format {
            Format::Xml => {
                let frame = xml::Frame {
                    encoding: self.encoding,
                    namespaces: &self.namespaces,
                    doc_type: self.doc_type.as_ref(),
                };
                match self.serializer {
                    SerializerKind::ContractBased => xml::write_contract(value, &frame),
                    SerializerKind::ReflectionBased => xml::write_reflection(value, &frame),
                }
            }
            Format::Json => {
                if self.doc_type.is_some() {
                    return Err(SerializationError::DocTypeRequiresXml);
                }
                match self.serializer {
                    SerializerKind::ContractBased => json::write_contract(value),
                    SerializerKind::ReflectionBased => json::write_reflection(value),
                }
            }
        }
    }

    /// Serializes `value` into bytes in the configured encoding.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SerializationError> {
        let text = self.write(value)?;
        Ok(self.encoding.encode(&text))
    }

    /// Deserializes bytes into `T`. A leading byte-order mark takes precedence
    /// over the configured encoding.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SerializationError> {
        let (encoding, offset) = Encoding::sniff_bom(bytes).unwrap_or((self.encoding, 0));
        let text = encoding.decode(&bytes[offset..])?;
        self.decode_str(&text)
    }

    /// Deserializes text into `T`.
    pub fn decode_str<T: DeserializeOwned>(&self, text: &str) -> Result<T, SerializationError> {
        tracing::trace!(format = %self.format, serializer = ?self.serializer, len = text.len(), "decoding document");
        match (self.format, self.serializer) {
            (Format::Xml, _) => xml::read(text),
            (Format::Json, SerializerKind::ContractBased) => json::read_contract(text),
            (Format::Json, SerializerKind::ReflectionBased) => json::read_reflection(text),
        }
    }

    /// Serializes into an in-memory byte buffer, then transcodes the buffer
    /// back into a string with the configured encoding.
    pub fn serialize_to_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializationError> {
        let buffer = self.encode(value)?;
        self.encoding.decode(&buffer)
    }

    /// Parses a string directly, without a byte stage.
    pub fn deserialize_from_string<T: DeserializeOwned>(&self, text: &str) -> Result<T, SerializationError> {
        self.decode_str(text)
    }

    /// Writes the encoded document to `path`, replacing any existing file.
    pub fn serialize_to_file<T, P>(&self, path: P, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = self.encode(value)?;
        std::fs::write(path, bytes).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and decodes the document stored at `path`.
    pub fn deserialize_from_file<T, P>(&self, path: P) -> Result<T, Error>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.decode(&bytes)?)
    }
}
