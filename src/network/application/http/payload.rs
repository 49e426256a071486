//! Request body preparation.

use serde::Serialize;

use crate::serialization::{Codec, Encoding, Format, SerializationError};

/// A request body together with the `Content-Type` describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// What a call sends as its body.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a, T: ?Sized> {
    /// No body.
    Empty,
    /// Already serialized text, sent as is.
    Text(&'a str),
    /// A value serialized by the resolved codec.
    Typed(&'a T),
}

/// Uses `text` verbatim as the body. The content type follows the declared
/// `format`; the text itself is not inspected.
pub fn prepare_text(text: &str, format: Format) -> PreparedBody {
    PreparedBody {
        bytes: text.as_bytes().to_vec(),
        content_type: format.content_type(Encoding::Utf8),
    }
}

/// Serializes `value` with `codec`.
pub fn prepare<T: Serialize + ?Sized>(value: &T, codec: &Codec) -> Result<PreparedBody, SerializationError> {
    let bytes = codec.encode(value)?;
    tracing::trace!(format = %codec.format, encoding = %codec.encoding, len = bytes.len(), "payload prepared");
    Ok(PreparedBody {
        bytes,
        content_type: codec.format.content_type(codec.encoding),
    })
}
