//! Call configuration.
//!
//! [`Config`] carries the explicit global defaults. [`Options`] carries the
//! per-facade or per-call choices; every field left as `None` falls through to
//! the next layer, ending at the [`Config`].

use crate::serialization::{Codec, Encoding, Format, Namespaces, SerializerKind};

/// Global defaults shared by every call of a facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Format used when neither the call nor the facade picks one.
    pub format: Format,
    /// Serializer used when neither the call nor the facade picks one.
    pub serializer: SerializerKind,
    /// Encoding for serialized payloads.
    pub encoding: Encoding,
    /// Namespace declarations added to XML payload roots.
    pub namespaces: Namespaces,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Xml,
            serializer: SerializerKind::ContractBased,
            encoding: Encoding::Utf8,
            namespaces: Namespaces::empty(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Per-facade or per-call choices.
///
/// `format` and `serializer` govern the response; the `payload_*` fields
/// govern the request body and fall back to `format` and `serializer` when
/// unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub format: Option<Format>,
    pub serializer: Option<SerializerKind>,
    pub payload_encoding: Option<Encoding>,
    pub payload_format: Option<Format>,
    pub payload_serializer: Option<SerializerKind>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn serializer(mut self, serializer: SerializerKind) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn payload_encoding(mut self, encoding: Encoding) -> Self {
        self.payload_encoding = Some(encoding);
        self
    }

    pub fn payload_format(mut self, format: Format) -> Self {
        self.payload_format = Some(format);
        self
    }

    pub fn payload_serializer(mut self, serializer: SerializerKind) -> Self {
        self.payload_serializer = Some(serializer);
        self
    }

    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: Options) -> Self {
        Self {
            format: self.format.or(fallback.format),
            serializer: self.serializer.or(fallback.serializer),
            payload_encoding: self.payload_encoding.or(fallback.payload_encoding),
            payload_format: self.payload_format.or(fallback.payload_format),
            payload_serializer: self.payload_serializer.or(fallback.payload_serializer),
        }
    }

    /// Format the response is decoded with.
    pub fn response_format(&self, config: &Config) -> Format {
        self.format.unwrap_or(config.format)
    }

    /// Serializer the response is decoded with.
    pub fn response_serializer(&self, config: &Config) -> SerializerKind {
        self.serializer.unwrap_or(config.serializer)
    }

    /// Format of the request body: `payload_format`, then `format`, then the
    /// config default.
    pub fn payload_format_or(&self, config: &Config) -> Format {
        self.payload_format.or(self.format).unwrap_or(config.format)
    }

    /// Serializer of the request body, resolved like the format.
    pub fn payload_serializer_or(&self, config: &Config) -> SerializerKind {
        self.payload_serializer
            .or(self.serializer)
            .unwrap_or(config.serializer)
    }

    /// The codec a typed request body is written with.
    pub fn payload_codec(&self, config: &Config) -> Codec {
        Codec::new(self.payload_format_or(config), self.payload_serializer_or(config))
            .encoding(self.payload_encoding.unwrap_or(config.encoding))
            .namespaces(config.namespaces.clone())
    }

    /// The format/serializer pair a response body is read with. The charset
    /// comes from the response itself, so the payload encoding and
    /// namespaces play no part.
    pub fn response_codec(&self, config: &Config) -> Codec {
        Codec::new(self.response_format(config), self.response_serializer(config))
    }
}
