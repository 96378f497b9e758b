//! Inputs accepted by [`Buffer::from_source`](crate::Buffer::from_source).
//!
//! Every construction path copies its input into freshly owned storage.
//! Borrowed windows into an existing buffer are plain slices, see
//! [`Buffer::subarray`](crate::Buffer::subarray).
use alloc::{string::String, vec::Vec};

use crate::{buffer::Buffer, encoding::Encoding, text::Text};

/// Serialized form of a buffer: `{"type": "Buffer", "data": [...]}`.
///
/// This is the shape Node's `Buffer#toJSON` produces. Elements of `data` are
/// any JSON numbers and are masked to a byte like array elements when
/// re-ingested, so `1.5` becomes `1` and `-1` becomes `255`.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BufferJson {
    /// Type tag; only `"Buffer"` is accepted for construction.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "type"))]
    pub kind: String,
    /// Byte values.
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(serialize_with = "serialize_numbers")
    )]
    pub data: Vec<f64>,
}

/// Writes integral values as JSON integers, so bytes serialize as `104`
/// rather than `104.0`.
#[cfg(any(test, feature = "serde"))]
#[expect(clippy::cast_possible_truncation)]
fn serialize_numbers<S: serde::Serializer>(data: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    // Integers up to 2^53 are exact in both types.
    const EXACT: f64 = 9_007_199_254_740_992.0;
    let mut seq = serializer.serialize_seq(Some(data.len()))?;
    for &n in data {
        if n.fract() == 0.0 && n.abs() <= EXACT {
            seq.serialize_element(&(n as i64))?;
        } else {
            seq.serialize_element(&n)?;
        }
    }
    seq.end()
}

impl BufferJson {
    /// The type tag written by [`Buffer::to_json`](crate::Buffer::to_json).
    pub const KIND: &'static str = "Buffer";

    /// Tagged form of `data`.
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            kind: String::from(Self::KIND),
            data,
        }
    }
}

/// Result of coercing a value with [`ToPrimitive`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Text, encoded as UTF-8.
    String(String),
    /// Bytes, copied.
    Bytes(Vec<u8>),
    /// A number, which construction rejects.
    Number(f64),
    /// No value.
    Null,
}

/// Values that can stand in for a primitive during construction.
///
/// The hook is invoked at most once per construction.
pub trait ToPrimitive {
    /// Converts `self` to a primitive.
    fn to_primitive(&self) -> Primitive;
}

/// A value a [`Buffer`] can be constructed from.
#[derive(Clone, Copy)]
pub enum Source<'a> {
    /// Text in the given encoding, UTF-8 if `None`.
    Str(Text<'a>, Option<Encoding>),
    /// An existing byte sequence.
    Bytes(&'a [u8]),
    /// A window into a larger byte region.
    ArrayBuffer {
        /// The whole region.
        bytes: &'a [u8],
        /// Start of the window, `0` if `None`.
        byte_offset: Option<usize>,
        /// Length of the window, the rest of the region if `None`.
        length: Option<usize>,
    },
    /// A plain number. Always rejected, so that a size can never be mistaken
    /// for content.
    Number(f64),
    /// An array of numbers, each masked to a byte.
    Array(&'a [f64]),
    /// A serialized buffer.
    Json(&'a BufferJson),
    /// A value converted through [`ToPrimitive`] before dispatch.
    Coercible(&'a dyn ToPrimitive),
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
}

impl Source<'_> {
    /// Name of the input kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Str(..) => "string",
            Source::Bytes(_) => "Uint8Array",
            Source::ArrayBuffer { .. } => "ArrayBuffer",
            Source::Number(_) => "number",
            Source::Array(_) => "Array",
            Source::Json(_) | Source::Coercible(_) => "object",
            Source::Null => "null",
            Source::Bool(_) => "boolean",
        }
    }
}

impl core::fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Source::Str(text, encoding) => f.debug_tuple("Str").field(text).field(encoding).finish(),
            Source::Bytes(bytes) => f.debug_tuple("Bytes").field(&bstr::BStr::new(bytes)).finish(),
            Source::ArrayBuffer {
                bytes,
                byte_offset,
                length,
            } => f
                .debug_struct("ArrayBuffer")
                .field("bytes", &bstr::BStr::new(bytes))
                .field("byte_offset", byte_offset)
                .field("length", length)
                .finish(),
            Source::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Source::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Source::Json(j) => f.debug_tuple("Json").field(j).finish(),
            Source::Coercible(_) => f.write_str("Coercible(..)"),
            Source::Null => f.write_str("Null"),
            Source::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
        }
    }
}

/// `ToInt32(n) & 0xFF`: truncate toward zero, wrap modulo 256, non-finite
/// values become zero.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn number_to_byte(n: f64) -> u8 {
    // Every finite double of this magnitude is a multiple of 256.
    const EXACT: f64 = 9_223_372_036_854_775_808.0;
    if !n.is_finite() || n >= EXACT || n <= -EXACT {
        return 0;
    }
    n as i64 as u8
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(s: &'a str) -> Self {
        Source::Str(Text::Str(s), None)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(s: &'a String) -> Self {
        Source::Str(Text::Str(s), None)
    }
}

impl<'a> From<Text<'a>> for Source<'a> {
    fn from(text: Text<'a>) -> Self {
        Source::Str(text, None)
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Source<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Source<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a Buffer> for Source<'a> {
    fn from(buffer: &'a Buffer) -> Self {
        Source::Bytes(buffer)
    }
}

impl<'a> From<&'a [f64]> for Source<'a> {
    fn from(array: &'a [f64]) -> Self {
        Source::Array(array)
    }
}

impl<'a> From<&'a BufferJson> for Source<'a> {
    fn from(json: &'a BufferJson) -> Self {
        Source::Json(json)
    }
}

impl From<f64> for Source<'_> {
    fn from(n: f64) -> Self {
        Source::Number(n)
    }
}

impl From<bool> for Source<'_> {
    fn from(b: bool) -> Self {
        Source::Bool(b)
    }
}

impl<'a> From<&'a Primitive> for Source<'a> {
    fn from(p: &'a Primitive) -> Self {
        match p {
            Primitive::String(s) => Source::Str(Text::Str(s), None),
            Primitive::Bytes(b) => Source::Bytes(b),
            Primitive::Number(n) => Source::Number(*n),
            Primitive::Null => Source::Null,
        }
    }
}
