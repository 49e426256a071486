//! Error types for codec operations

use super::{Encoding, Format};

/// An error raised while turning a value into a document or back.
///
/// Every variant aborts the conversion as a whole; no codec ever hands back a
/// partially decoded value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializationError {
    /// The value could not be written in the requested format.
    #[error("{format} encoding failed: {message}")]
    Encode {
        /// Format that was being produced.
        format: Format,
        /// Message reported by the underlying serializer.
        message: String,
    },
    /// The document does not match the shape of the target type.
    #[error("{format} decoding failed: {message}")]
    Decode {
        /// Format that was being read.
        format: Format,
        /// Message reported by the underlying deserializer.
        message: String,
    },
    /// The input is not a well-formed document of the declared format.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// The bytes are not valid text in the given encoding.
    #[error("bytes are not valid {0} text")]
    Transcode(Encoding),
    /// A DOCTYPE was requested together with explicit namespace declarations.
    #[error("a DOCTYPE declaration cannot be combined with explicit namespace declarations")]
    DocTypeWithNamespaces,
    /// A DOCTYPE was requested for a non-XML format.
    #[error("a DOCTYPE declaration requires the XML format")]
    DocTypeRequiresXml,
    /// The DOCTYPE name is not a valid XML name.
    #[error("`{0}` is not a valid DOCTYPE name")]
    InvalidDocTypeName(String),
}

impl SerializationError {
    pub(crate) fn encode(format: Format, err: impl core::fmt::Display) -> Self {
        Self::Encode {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(format: Format, err: impl core::fmt::Display) -> Self {
        Self::Decode {
            format,
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SerializationError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SerializationError::Encode { format, .. } => defmt::write!(f, "Encode({})", format),
            SerializationError::Decode { format, .. } => defmt::write!(f, "Decode({})", format),
            SerializationError::Malformed(_) => defmt::write!(f, "Malformed"),
            SerializationError::Transcode(encoding) => defmt::write!(f, "Transcode({})", encoding),
            SerializationError::DocTypeWithNamespaces => defmt::write!(f, "DocTypeWithNamespaces"),
            SerializationError::DocTypeRequiresXml => defmt::write!(f, "DocTypeRequiresXml"),
            SerializationError::InvalidDocTypeName(_) => defmt::write!(f, "InvalidDocTypeName"),
        }
    }
}
