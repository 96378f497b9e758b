//! Encoding names and dispatch to the codecs.
//!
//! Names are parsed once into [`Encoding`]; everything downstream matches on
//! the enum. The accepted names, including aliases, are those of Node's
//! `Buffer`:
//!
//! | canonical | aliases                         |
//! |-----------|---------------------------------|
//! | `utf8`    | `utf-8`                         |
//! | `utf16le` | `utf-16le`, `ucs2`, `ucs-2`     |
//! | `latin1`  | `binary`                        |
//! | `ascii`   |                                 |
//! | `hex`     |                                 |
//! | `base64`  |                                 |
//!
//! Matching is case-insensitive.
use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use crate::{base64, error::BufferError, hex, latin1, text::Text, utf8, utf16};

/// One of the supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// 7-bit ASCII. Encoding keeps the low byte; decoding clears the top bit.
    Ascii,
    /// UTF-8 with U+FFFD substitution in both directions.
    #[default]
    Utf8,
    /// ISO-8859-1, also accepted as `binary`.
    Latin1,
    /// Standard base64, decoding URL-safe input as well.
    Base64,
    /// Little-endian UTF-16, also accepted as `ucs2`.
    Utf16Le,
    /// Lowercase hexadecimal.
    Hex,
}

impl Encoding {
    /// Every encoding, in declaration order.
    pub const ALL: [Encoding; 6] = [
        Encoding::Ascii,
        Encoding::Utf8,
        Encoding::Latin1,
        Encoding::Base64,
        Encoding::Utf16Le,
        Encoding::Hex,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Utf8 => "utf8",
            Encoding::Latin1 => "latin1",
            Encoding::Base64 => "base64",
            Encoding::Utf16Le => "utf16le",
            Encoding::Hex => "hex",
        }
    }

    fn from_exact(name: &str) -> Option<Self> {
        Some(match name {
            "ascii" => Encoding::Ascii,
            "utf8" | "utf-8" => Encoding::Utf8,
            "latin1" | "binary" => Encoding::Latin1,
            "base64" => Encoding::Base64,
            "ucs2" | "ucs-2" | "utf16le" | "utf-16le" => Encoding::Utf16Le,
            "hex" => Encoding::Hex,
            _ => return None,
        })
    }

    /// Parses an encoding name.
    ///
    /// The name is matched as given, then once more after lowercasing.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::UnknownEncoding`] if neither attempt matches.
    pub fn parse(name: &str) -> Result<Self, BufferError> {
        Self::from_exact(name)
            .or_else(|| Self::from_exact(&name.to_ascii_lowercase()))
            .ok_or_else(|| BufferError::UnknownEncoding(name.to_owned()))
    }

    /// Whether `name` is a recognised encoding name.
    #[must_use]
    pub fn is_encoding(name: &str) -> bool {
        Self::parse(name).is_ok()
    }

    /// Whether a single code unit below 128 encodes to that same byte.
    pub(crate) fn maps_ascii_to_itself(self) -> bool {
        matches!(self, Encoding::Utf8 | Encoding::Latin1 | Encoding::Ascii)
    }

    /// Encodes `text` to bytes, producing at most `budget` bytes.
    ///
    /// Variable-width encodings never emit a partial character. Hex stops at
    /// its first invalid pair, and given a budget also decodes a trailing
    /// unpaired digit. Base64 ignores characters outside its alphabet.
    ///
    /// # Errors
    ///
    /// Propagates codec errors, see [`utf8::encode`] and
    /// [`base64::decode`].
    pub fn encode(self, text: Text<'_>, budget: Option<usize>) -> Result<Vec<u8>, BufferError> {
        Ok(match self {
            Encoding::Utf8 => utf8::encode(text.units(), budget)?,
            Encoding::Utf16Le => utf16::encode(text.units(), budget),
            Encoding::Ascii | Encoding::Latin1 => latin1::encode(text.units(), budget),
            Encoding::Hex => hex::decode(text, budget),
            Encoding::Base64 => {
                let mut bytes = base64::decode(text)?;
                if let Some(max) = budget {
                    bytes.truncate(max);
                }
                bytes
            }
        })
    }

    /// Exact number of bytes `text` occupies in this encoding.
    ///
    /// Only UTF-8 runs its encoder; the other encodings compute the length
    /// arithmetically from the code-unit count.
    ///
    /// # Errors
    ///
    /// Propagates [`utf8::encoded_len`] errors.
    pub fn byte_length(self, text: Text<'_>) -> Result<usize, BufferError> {
        if text.is_empty() {
            return Ok(0);
        }
        Ok(match self {
            Encoding::Ascii | Encoding::Latin1 => text.len_utf16(),
            Encoding::Utf8 => utf8::encoded_len(text.units())?,
            Encoding::Utf16Le => text.len_utf16() * 2,
            Encoding::Hex => hex::decoded_len(text),
            Encoding::Base64 => base64::decoded_len(text),
        })
    }

    /// Decodes `bytes` to a Rust string.
    ///
    /// Lone surrogates produced by `utf16le` are replaced with U+FFFD; use
    /// [`Encoding::decode_utf16`] to keep them.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => utf8::decode(bytes),
            Encoding::Ascii => latin1::decode_ascii(bytes),
            Encoding::Latin1 => latin1::decode_latin1(bytes),
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => base64::encode(bytes),
            Encoding::Utf16Le => String::from_utf16_lossy(&utf16::decode(bytes)),
        }
    }

    /// Decodes `bytes` to UTF-16 code units without any loss.
    #[must_use]
    pub fn decode_utf16(self, bytes: &[u8]) -> Vec<u16> {
        match self {
            Encoding::Utf16Le => utf16::decode(bytes),
            _ => self.decode(bytes).encode_utf16().collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Encoding {
    type Error = BufferError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.name().to_string()
    }
}
