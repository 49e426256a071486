//! JSON codecs.
//!
//! The contract codec is `serde_json`. The reflection codec is
//! `serde-json-core`, which writes into a caller-provided slice; the slice is
//! grown until the document fits.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Format;
use super::error::SerializationError;

const INITIAL_BUFFER_LEN: usize = 256;
const MAX_BUFFER_LEN: usize = 16 * 1024 * 1024;

pub(crate) fn write_contract<T>(value: &T) -> Result<String, SerializationError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|err| SerializationError::encode(Format::Json, err))
}

pub(crate) fn read_contract<T: DeserializeOwned>(text: &str) -> Result<T, SerializationError> {
    serde_json::from_str(text).map_err(|err| SerializationError::decode(Format::Json, err))
}

pub(crate) fn write_reflection<T>(value: &T) -> Result<String, SerializationError>
where
    T: Serialize + ?Sized,
{
    let mut buffer = vec![0u8; INITIAL_BUFFER_LEN];
    loop {
        match serde_json_core::to_slice(value, &mut buffer) {
            Ok(len) => {
                buffer.truncate(len);
                return String::from_utf8(buffer)
                    .map_err(|err| SerializationError::encode(Format::Json, err));
            }
            Err(serde_json_core::ser::Error::BufferFull) if buffer.len() < MAX_BUFFER_LEN => {
                let grown = buffer.len() * 2;
                buffer.resize(grown, 0);
            }
            Err(err) => return Err(SerializationError::encode(Format::Json, err)),
        }
    }
}

/// Escape sequences are unescaped into a scratch buffer as long as the input,
/// which no unescaped string can outgrow.
pub(crate) fn read_reflection<T: DeserializeOwned>(text: &str) -> Result<T, SerializationError> {
    let mut scratch = vec![0u8; text.len()];
    serde_json_core::from_str_escaped::<T>(text, &mut scratch)
        .map(|(value, _)| value)
        .map_err(|err| SerializationError::decode(Format::Json, err))
}
