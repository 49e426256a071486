//! Byte/text transcodings used for payload bodies and documents.

use std::borrow::Cow;

use encoding_rs::EncoderResult;

use super::error::SerializationError;

/// A named byte/text transcoding.
///
/// Only payload serialization is governed by the configured encoding; response
/// bodies are decoded with whatever charset the transport declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 (the default).
    #[default]
    Utf8,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
    /// 7-bit US-ASCII.
    Ascii,
    /// ISO-8859-1.
    Latin1,
    /// Any other charset known to `encoding_rs`, such as `windows-1252` or
    /// `Shift_JIS`.
    Other(&'static encoding_rs::Encoding),
}

impl Encoding {
    fn from_whatwg(encoding: &'static encoding_rs::Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            Encoding::Utf8
        } else if encoding == encoding_rs::UTF_16LE {
            Encoding::Utf16Le
        } else if encoding == encoding_rs::UTF_16BE {
            Encoding::Utf16Be
        } else {
            Encoding::Other(encoding)
        }
    }

    /// The label written into XML prologs and `charset` parameters.
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Ascii => "us-ascii",
            Encoding::Latin1 => "iso-8859-1",
            Encoding::Other(encoding) => (*encoding).name(),
        }
    }

    /// Resolves a charset label, ignoring case and surrounding quotes.
    ///
    /// `us-ascii` and `iso-8859-1` keep their strict meaning; every other
    /// label goes through the WHATWG label table of `encoding_rs`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().trim_matches('"').trim();
        let is = |names: &[&str]| names.iter().any(|name| name.eq_ignore_ascii_case(label));

        if is(&["us-ascii", "ascii"]) {
            Some(Encoding::Ascii)
        } else if is(&["iso-8859-1", "iso_8859-1", "latin1", "l1"]) {
            Some(Encoding::Latin1)
        } else {
            encoding_rs::Encoding::for_label(label.as_bytes()).map(Self::from_whatwg)
        }
    }

    /// Like [`from_label`](Self::from_label), but an unknown label falls back
    /// to ISO-8859-1, which accepts every byte.
    pub fn from_label_or_latin1(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| {
            tracing::debug!(label, "unknown charset, reading as iso-8859-1");
            Encoding::Latin1
        })
    }

    /// Detects a byte-order mark, returning the encoding it implies and its
    /// length in bytes.
    pub fn sniff_bom(bytes: &[u8]) -> Option<(Self, usize)> {
        encoding_rs::Encoding::for_bom(bytes).map(|(encoding, len)| (Self::from_whatwg(encoding), len))
    }

    /// Transcodes text into bytes.
    ///
    /// Characters the encoding cannot represent are replaced with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            // encoding_rs only decodes UTF-16.
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Encoding::Other(encoding) => encode_replacing(*encoding, text),
        }
    }

    /// Transcodes bytes into text, failing on sequences the encoding cannot
    /// represent. A byte-order mark is not stripped here.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, SerializationError> {
        let decoded = match self {
            Encoding::Utf8 => strict(encoding_rs::UTF_8, bytes),
            Encoding::Utf16Le => strict(encoding_rs::UTF_16LE, bytes),
            Encoding::Utf16Be => strict(encoding_rs::UTF_16BE, bytes),
            Encoding::Other(encoding) => strict(*encoding, bytes),
            Encoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        };
        decoded.ok_or(SerializationError::Transcode(*self))
    }
}

fn strict(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

fn encode_replacing(encoding: &'static encoding_rs::Encoding, text: &str) -> Vec<u8> {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut rest = text;
    loop {
        let room = encoder
            .max_buffer_length_from_utf8_without_replacement(rest.len())
            .unwrap_or(rest.len() * 4 + 16);
        let start = out.len();
        out.resize(start + room, 0);
        let (result, read, written) = encoder.encode_from_utf8_without_replacement(rest, &mut out[start..], true);
        out.truncate(start + written);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty => return out,
            EncoderResult::Unmappable(_) => out.push(b'?'),
            EncoderResult::OutputFull => {}
        }
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Encoding {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label())
    }
}
