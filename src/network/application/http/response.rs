//! Response interpretation.

use serde::de::DeserializeOwned;

use super::client::Response;
use crate::error::Result;
use crate::network::error::Error as TransportError;
use crate::serialization::{Codec, Encoding, Format, SerializerKind};

/// Fails with [`TransportError::UnexpectedStatus`] unless the status is 2xx.
pub fn ensure_success(response: &Response) -> Result<(), TransportError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(TransportError::UnexpectedStatus(response.status_code))
    }
}

/// Returns the body text unchanged, decoded with the declared charset
/// (UTF-8 when none is declared).
pub fn interpret_raw(response: &Response) -> Result<String> {
    ensure_success(response)?;
    let encoding = response.charset().unwrap_or(Encoding::Utf8);
    Ok(encoding.decode(&response.body)?)
}

/// Decodes the body into `T` with the given pair. Either the whole value is
/// produced or the call fails.
pub fn interpret<T: DeserializeOwned>(response: &Response, format: Format, serializer: SerializerKind) -> Result<T> {
    ensure_success(response)?;
    let codec = Codec::new(format, serializer).encoding(response.charset().unwrap_or(Encoding::Utf8));
    Ok(codec.decode(&response.body)?)
}
