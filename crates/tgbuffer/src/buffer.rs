//! The [`Buffer`] type: construction, fill, copy, slice, write and decode.
//!
//! A `Buffer` owns a fixed-length byte region. It never grows or shrinks
//! after construction; `fill`, `copy`, `write` and indexed writes mutate it
//! in place.
//!
//! # Copy discipline
//!
//! Every constructor and [`Buffer::slice`] copy into new storage, so two
//! buffers never share bytes and mutating one is never visible through
//! another. Shared access is expressed with borrows instead:
//! [`Buffer::subarray`] and [`Buffer::subarray_mut`] return slices into the
//! buffer, and the borrow checker keeps those from outliving or racing with
//! the owner.
use alloc::{boxed::Box, string::String, vec, vec::Vec};
use core::{
    fmt,
    ops::{Deref, DerefMut, Range},
};

use bstr::BStr;

use crate::{
    encoding::Encoding,
    error::BufferError,
    options::{CopyOptions, FillOptions, TextOptions, WriteOptions},
    source::{BufferJson, Source, number_to_byte},
    text::Text,
};

/// Largest buffer length, in bytes, that may be allocated.
pub const MAX_LENGTH: usize = 0x7fff_ffff;

/// An owned, fixed-length, mutable byte sequence with text encoding support.
///
/// `Buffer` dereferences to `[u8]`, which is how callers read and write
/// individual bytes.
///
/// ```rust
/// use tgbuffer::{Buffer, Encoding, TextOptions};
///
/// let mut buf = Buffer::from_text("abc", Encoding::Utf8)?;
/// assert_eq!(buf[0], 97);
/// buf[2] += 10;
/// assert_eq!(buf.to_string(), "abm");
/// assert_eq!(buf.to_text(TextOptions::encoding(Encoding::Hex)), "61626d");
/// # Ok::<(), tgbuffer::BufferError>(())
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Buffer {
    bytes: Box<[u8]>,
}

/// Value written by [`Buffer::fill`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillValue<'a> {
    /// A number; its low eight bits (after truncation toward zero) are
    /// written.
    Number(f64),
    /// A boolean, written as `0` or `1`.
    Bool(bool),
    /// Text, encoded with the fill encoding and repeated. Empty text fills
    /// with zero.
    Str(Text<'a>),
    /// A byte pattern, repeated.
    Bytes(&'a [u8]),
}

impl From<u8> for FillValue<'_> {
    fn from(b: u8) -> Self {
        FillValue::Number(f64::from(b))
    }
}

impl From<i32> for FillValue<'_> {
    fn from(n: i32) -> Self {
        FillValue::Number(f64::from(n))
    }
}

impl From<f64> for FillValue<'_> {
    fn from(n: f64) -> Self {
        FillValue::Number(n)
    }
}

impl From<bool> for FillValue<'_> {
    fn from(b: bool) -> Self {
        FillValue::Bool(b)
    }
}

impl<'a> From<&'a str> for FillValue<'a> {
    fn from(s: &'a str) -> Self {
        FillValue::Str(Text::Str(s))
    }
}

impl<'a> From<Text<'a>> for FillValue<'a> {
    fn from(text: Text<'a>) -> Self {
        FillValue::Str(text)
    }
}

impl<'a> From<&'a [u8]> for FillValue<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        FillValue::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FillValue<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        FillValue::Bytes(bytes)
    }
}

impl<'a> From<&'a Buffer> for FillValue<'a> {
    fn from(buffer: &'a Buffer) -> Self {
        FillValue::Bytes(buffer)
    }
}

/// Rejects lengths at or above [`MAX_LENGTH`].
fn checked_len(len: usize) -> Result<usize, BufferError> {
    if len >= MAX_LENGTH {
        return Err(BufferError::OutOfBounds(
            "attempt to allocate Buffer larger than maximum size: 0x7fffffff bytes",
        ));
    }
    Ok(len)
}

/// Resolves a possibly negative index against `len`: negative indices count
/// from the end and clamp at zero, large ones clamp at `len`.
fn resolve_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

/// Normalised copy: where to write in the target and which source bytes.
///
/// Returns `None` when nothing is to be copied.
fn copy_plan(
    source_len: usize,
    target_len: usize,
    options: CopyOptions,
) -> Result<Option<(usize, Range<usize>)>, BufferError> {
    let start = options.source_start.unwrap_or(0);
    let mut end = options.source_end.unwrap_or(source_len);
    let target_start = options.target_start.unwrap_or(0).min(target_len);
    if end < start {
        end = start;
    }

    if end == start || target_len == 0 || source_len == 0 {
        return Ok(None);
    }
    if start >= source_len {
        return Err(BufferError::OutOfBounds("index out of range"));
    }

    end = end.min(source_len);
    let capacity = target_len - target_start;
    if capacity < end - start {
        end = start + capacity;
    }
    if end == start {
        return Ok(None);
    }
    Ok(Some((target_start, start..end)))
}

impl Buffer {
    fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Allocates a zero-filled buffer of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if `size` exceeds
    /// [`MAX_LENGTH`].
    pub fn alloc(size: usize) -> Result<Self, BufferError> {
        if size > MAX_LENGTH {
            log::debug!("buffer: rejected allocation of {size} bytes");
            return Err(BufferError::OutOfBounds("the value is invalid for option \"size\""));
        }
        Ok(Self::from_vec(vec![0; size]))
    }

    /// Allocates a buffer of `size` bytes filled with `value`.
    ///
    /// # Errors
    ///
    /// Fails like [`Buffer::alloc`] and [`Buffer::fill`].
    pub fn alloc_filled<'v>(
        size: usize,
        value: impl Into<FillValue<'v>>,
        encoding: Option<Encoding>,
    ) -> Result<Self, BufferError> {
        let mut buf = Self::alloc(size)?;
        if size > 0 {
            buf.fill(
                value,
                FillOptions {
                    encoding,
                    ..Default::default()
                },
            )?;
        }
        Ok(buf)
    }

    /// Constructs a buffer from any supported input.
    ///
    /// All paths copy. Numbers are rejected outright so that a length is
    /// never mistaken for content; use [`Buffer::alloc`] to allocate.
    /// A [`Source::Coercible`] is converted once and the result dispatched.
    ///
    /// # Errors
    ///
    /// - [`BufferError::ArgumentType`] for [`Source::Number`].
    /// - [`BufferError::OutOfBounds`] for an array-buffer window outside its
    ///   region, or an input of [`MAX_LENGTH`] bytes or more.
    /// - [`BufferError::UnsupportedInputType`] for `Null`, `Bool` and JSON
    ///   objects not tagged `"Buffer"`.
    pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self, BufferError> {
        let source = source.into();
        if let Source::Coercible(value) = source {
            let primitive = value.to_primitive();
            log::trace!("buffer: coerced object to {primitive:?}");
            return Self::dispatch((&primitive).into());
        }
        Self::dispatch(source)
    }

    fn dispatch(source: Source<'_>) -> Result<Self, BufferError> {
        log::trace!("buffer: constructing from {}", source.kind());
        match source {
            Source::Str(text, encoding) => Self::from_text(text, encoding.unwrap_or_default()),
            Source::Bytes(bytes) => Self::from_bytes(bytes),
            Source::ArrayBuffer {
                bytes,
                byte_offset,
                length,
            } => Self::from_array_buffer(bytes, byte_offset, length),
            Source::Number(_) => Err(BufferError::ArgumentType(String::from(
                "the \"value\" argument must not be of type number",
            ))),
            Source::Array(array) => Self::from_array(array),
            Source::Json(json) => Self::from_json(json),
            Source::Coercible(_) | Source::Null | Source::Bool(_) => {
                Err(BufferError::UnsupportedInputType(source.kind()))
            }
        }
    }

    /// Encodes `text` into a new buffer.
    ///
    /// Invalid hex input ends the buffer at the last complete byte.
    ///
    /// # Errors
    ///
    /// Propagates [`Encoding::encode`] errors, and fails with
    /// [`BufferError::OutOfBounds`] for results of [`MAX_LENGTH`] bytes or
    /// more.
    pub fn from_text<'t>(text: impl Into<Text<'t>>, encoding: Encoding) -> Result<Self, BufferError> {
        let bytes = encoding.encode(text.into(), None)?;
        checked_len(bytes.len())?;
        Ok(Self::from_vec(bytes))
    }

    /// Copies `bytes` into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] for inputs of [`MAX_LENGTH`]
    /// bytes or more.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BufferError> {
        checked_len(bytes.len())?;
        Ok(Self::from_vec(bytes.to_vec()))
    }

    /// Copies the window `[byte_offset, byte_offset + length)` of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if the offset lies past the end
    /// of `bytes` or the window extends past it.
    pub fn from_array_buffer(
        bytes: &[u8],
        byte_offset: Option<usize>,
        length: Option<usize>,
    ) -> Result<Self, BufferError> {
        let offset = byte_offset.unwrap_or(0);
        if offset > bytes.len() {
            return Err(BufferError::OutOfBounds("\"offset\" is outside of buffer bounds"));
        }
        let available = bytes.len() - offset;
        let length = length.unwrap_or(available);
        if length > available {
            return Err(BufferError::OutOfBounds("\"length\" is outside of buffer bounds"));
        }
        Self::from_bytes(&bytes[offset..offset + length])
    }

    /// Builds a buffer from numbers, keeping the low byte of each.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] for arrays of [`MAX_LENGTH`]
    /// elements or more.
    pub fn from_array(array: &[f64]) -> Result<Self, BufferError> {
        checked_len(array.len())?;
        Ok(Self::from_vec(array.iter().copied().map(number_to_byte).collect()))
    }

    /// Re-ingests the output of [`Buffer::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::UnsupportedInputType`] if the type tag is not
    /// `"Buffer"`, and [`BufferError::OutOfBounds`] for oversized data.
    pub fn from_json(json: &BufferJson) -> Result<Self, BufferError> {
        if json.kind != BufferJson::KIND {
            return Err(BufferError::UnsupportedInputType("object"));
        }
        checked_len(json.data.len())?;
        Ok(Self::from_vec(json.data.iter().copied().map(number_to_byte).collect()))
    }

    /// Length of `value` in bytes.
    ///
    /// Byte inputs report their length directly. Text is measured in
    /// `encoding`, falling back to the text's own encoding and then UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ArgumentType`] for inputs that are neither text
    /// nor bytes.
    pub fn byte_length<'a>(
        value: impl Into<Source<'a>>,
        encoding: Option<Encoding>,
    ) -> Result<usize, BufferError> {
        match value.into() {
            Source::Bytes(bytes) | Source::ArrayBuffer { bytes, .. } => Ok(bytes.len()),
            Source::Str(text, own) => encoding.or(own).unwrap_or_default().byte_length(text),
            other => Err(BufferError::ArgumentType(alloc::format!(
                "the \"string\" argument must be one of type string, Buffer, or ArrayBuffer. \
                 Received type {}",
                other.kind()
            ))),
        }
    }

    /// The bytes of the buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The bytes of the buffer, mutably.
    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Consumes the buffer, returning its bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// Fills `[start, end)` with `value`, returning the buffer for chaining.
    ///
    /// Numbers write their low byte into every position; strings and byte
    /// patterns repeat cyclically from `start`. A single-character string
    /// whose byte form is the character code itself takes the numeric path.
    ///
    /// # Errors
    ///
    /// - [`BufferError::OutOfBounds`] if `start` or `end` exceed the length.
    /// - [`BufferError::ArgumentType`] if the pattern encodes to no bytes.
    pub fn fill<'v>(
        &mut self,
        value: impl Into<FillValue<'v>>,
        options: FillOptions,
    ) -> Result<&mut Self, BufferError> {
        let len = self.len();
        let encoding = options.encoding.unwrap_or_default();
        let mut value = value.into();

        if let FillValue::Str(text) = value {
            match text.single_unit() {
                Some(code)
                    if (code < 0x80 && encoding.maps_ascii_to_itself())
                        || encoding == Encoding::Latin1 =>
                {
                    log::trace!("buffer: fill with single character 0x{code:02X} as a byte");
                    value = FillValue::Number(f64::from(code));
                }
                _ => {}
            }
        }

        let start = options.start.unwrap_or(0);
        let end = options.end.unwrap_or(len);
        if start > len || end > len {
            return Err(BufferError::OutOfBounds("out of range index"));
        }
        if end <= start {
            return Ok(self);
        }
        let range = &mut self.bytes[start..end];

        let pattern = match value {
            FillValue::Number(n) => {
                range.fill(number_to_byte(n));
                return Ok(self);
            }
            FillValue::Bool(b) => {
                range.fill(u8::from(b));
                return Ok(self);
            }
            FillValue::Str(text) if text.is_empty() => {
                range.fill(0);
                return Ok(self);
            }
            FillValue::Str(text) => encoding.encode(text, None)?,
            FillValue::Bytes(bytes) => bytes.to_vec(),
        };

        if pattern.is_empty() {
            return Err(BufferError::ArgumentType(alloc::format!(
                "the value {:?} is invalid for argument \"value\"",
                BStr::new(&pattern)
            )));
        }
        for chunk in range.chunks_mut(pattern.len()) {
            chunk.copy_from_slice(&pattern[..chunk.len()]);
        }
        Ok(self)
    }

    /// Copies bytes of `self` into `target`, returning how many were copied.
    ///
    /// `target_start` past the end of `target` is clamped, `source_end` is
    /// clamped to the source and further to the room left in `target`, and
    /// a `source_end` before `source_start` copies nothing.
    ///
    /// To copy between ranges of the same buffer use
    /// [`Buffer::copy_within`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if `source_start` is at or past
    /// the end of a non-empty source.
    pub fn copy(&self, target: &mut [u8], options: CopyOptions) -> Result<usize, BufferError> {
        let Some((target_start, range)) = copy_plan(self.len(), target.len(), options)? else {
            return Ok(0);
        };
        let n = range.len();
        target[target_start..target_start + n].copy_from_slice(&self.bytes[range]);
        Ok(n)
    }

    /// Copies bytes between ranges of this buffer, with the same rules as
    /// [`Buffer::copy`]. Overlapping ranges behave like a move.
    ///
    /// # Errors
    ///
    /// Same as [`Buffer::copy`].
    pub fn copy_within(&mut self, options: CopyOptions) -> Result<usize, BufferError> {
        let len = self.len();
        let Some((target_start, range)) = copy_plan(len, len, options)? else {
            return Ok(0);
        };
        let n = range.len();
        self.bytes.copy_within(range, target_start);
        Ok(n)
    }

    /// The range `[start, end)` selected by [`Buffer::slice`].
    fn slice_range(&self, start: isize, end: Option<isize>) -> Range<usize> {
        let len = self.len();
        let start = resolve_index(start, len);
        let end = end.map_or(len, |end| resolve_index(end, len)).max(start);
        start..end
    }

    /// Copies `[start, end)` into a new buffer.
    ///
    /// Negative indices count back from the end; indices are clamped to the
    /// buffer, and an `end` before `start` selects nothing. `None` for `end`
    /// means the buffer length.
    #[must_use]
    pub fn slice(&self, start: isize, end: Option<isize>) -> Buffer {
        Self::from_vec(self.bytes[self.slice_range(start, end)].to_vec())
    }

    /// Borrows `[start, end)` with the index rules of [`Buffer::slice`].
    #[must_use]
    pub fn subarray(&self, start: isize, end: Option<isize>) -> &[u8] {
        let range = self.slice_range(start, end);
        &self.bytes[range]
    }

    /// Mutably borrows `[start, end)` with the index rules of
    /// [`Buffer::slice`].
    #[must_use]
    pub fn subarray_mut(&mut self, start: isize, end: Option<isize>) -> &mut [u8] {
        let range = self.slice_range(start, end);
        &mut self.bytes[range]
    }

    /// Encodes `text` into the buffer, returning the number of bytes written.
    ///
    /// Text is encoded into the room after `offset`, and at most `length`
    /// bytes of the result are copied in. UTF-8 and UTF-16LE never encode a
    /// character that does not fit in that room, but a shorter `length` may
    /// cut the last one. Hex stops at its first invalid pair and decodes a
    /// trailing unpaired digit when room remains. A zero `length` for hex
    /// means the whole room.
    ///
    /// # Errors
    ///
    /// - [`BufferError::OutOfBounds`] if `offset` is past the end.
    /// - Codec errors from [`Encoding::encode`].
    pub fn write<'t>(
        &mut self,
        text: impl Into<Text<'t>>,
        options: WriteOptions,
    ) -> Result<usize, BufferError> {
        let len = self.len();
        let offset = options.offset.unwrap_or(0);
        if offset > len {
            return Err(BufferError::OutOfBounds("attempt to write outside buffer bounds"));
        }
        let remaining = len - offset;
        let encoding = options.encoding.unwrap_or_default();
        let length = match options.length {
            // Hex treats a zero length as unset.
            Some(0) if encoding == Encoding::Hex => remaining,
            length => length.map_or(remaining, |l| l.min(remaining)),
        };

        let bytes = encoding.encode(text.into(), Some(remaining))?;
        let n = length.min(bytes.len());
        self.bytes[offset..offset + n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    /// The clamped byte range selected by `options`, `None` if empty.
    fn text_range(&self, options: TextOptions) -> Option<Range<usize>> {
        let len = self.len();
        let start = options.start.unwrap_or(0);
        let end = options.end.map_or(len, |end| end.min(len));
        (start < end).then_some(start..end)
    }

    /// Decodes a range of the buffer to text.
    ///
    /// `start` past the end or an `end` at or before `start` yields the empty
    /// string. Lone surrogates decoded from UTF-16LE are replaced; see
    /// [`Buffer::to_utf16`].
    #[must_use]
    pub fn to_text(&self, options: TextOptions) -> String {
        self.text_range(options).map_or_else(String::new, |range| {
            options.encoding.unwrap_or_default().decode(&self.bytes[range])
        })
    }

    /// Decodes a range of the buffer to UTF-16 code units without loss.
    #[must_use]
    pub fn to_utf16(&self, options: TextOptions) -> Vec<u16> {
        self.text_range(options).map_or_else(Vec::new, |range| {
            options.encoding.unwrap_or_default().decode_utf16(&self.bytes[range])
        })
    }

    /// The `{"type": "Buffer", "data": [...]}` form of the buffer.
    #[must_use]
    pub fn to_json(&self) -> BufferJson {
        BufferJson::new(self.bytes.iter().map(|&b| f64::from(b)).collect())
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsMut<[u8]> for Buffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Takes ownership of `bytes` without the [`MAX_LENGTH`] check, since the
/// bytes are already allocated. Use [`Buffer::from_bytes`] to enforce it.
impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

/// Copies `bytes` like [`Buffer::from_bytes`], without the [`MAX_LENGTH`]
/// check.
impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl From<Buffer> for Vec<u8> {
    fn from(buffer: Buffer) -> Self {
        buffer.into_vec()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Buffer").field(&BStr::new(&self.bytes)).finish()
    }
}

/// UTF-8 decoding of the whole buffer.
impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in crate::utf8::Chars::new(&self.bytes) {
            fmt::Write::write_char(f, ch)?;
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "serde"))]
impl serde::Serialize for Buffer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_json(), serializer)
    }
}

#[cfg(any(test, feature = "serde"))]
impl<'de> serde::Deserialize<'de> for Buffer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = <BufferJson as serde::Deserialize>::deserialize(deserializer)?;
        Buffer::from_json(&json).map_err(serde::de::Error::custom)
    }
}
