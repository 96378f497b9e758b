//! Optional arguments of the buffer operations.
//!
//! Each operation takes one of these structs; every field is optional and
//! `None` selects the documented default, so call sites only spell out what
//! they change:
//!
//! ```rust
//! use tgbuffer::{Buffer, FillOptions};
//!
//! let mut buf = Buffer::alloc(4)?;
//! buf.fill("ab", FillOptions { start: Some(1), ..Default::default() })?;
//! assert_eq!(&buf[..], b"\0aba");
//! # Ok::<(), tgbuffer::BufferError>(())
//! ```
use crate::encoding::Encoding;

/// Options for [`Buffer::fill`](crate::Buffer::fill).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillOptions {
    /// First byte to fill.
    ///
    /// # Default
    ///
    /// `0`
    pub start: Option<usize>,

    /// One past the last byte to fill.
    ///
    /// # Default
    ///
    /// The buffer length.
    pub end: Option<usize>,

    /// Encoding used to turn a string fill value into bytes.
    ///
    /// # Default
    ///
    /// [`Encoding::Utf8`]
    pub encoding: Option<Encoding>,
}

/// Options for [`Buffer::copy`](crate::Buffer::copy) and
/// [`Buffer::copy_within`](crate::Buffer::copy_within).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Offset in the target at which writing begins. Values past the end of
    /// the target are clamped to its length.
    ///
    /// # Default
    ///
    /// `0`
    pub target_start: Option<usize>,

    /// First source byte to copy.
    ///
    /// # Default
    ///
    /// `0`
    pub source_start: Option<usize>,

    /// One past the last source byte to copy. Clamped to the source length.
    ///
    /// # Default
    ///
    /// The source length.
    pub source_end: Option<usize>,
}

/// Options for [`Buffer::write`](crate::Buffer::write).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Offset at which writing begins.
    ///
    /// # Default
    ///
    /// `0`
    pub offset: Option<usize>,

    /// Maximum number of bytes to write. Clamped to the space remaining
    /// after `offset`. It truncates the encoded bytes, so it may cut a
    /// multi-byte character.
    ///
    /// # Default
    ///
    /// The space remaining after `offset`.
    pub length: Option<usize>,

    /// Encoding of the written text.
    ///
    /// # Default
    ///
    /// [`Encoding::Utf8`]
    pub encoding: Option<Encoding>,
}

/// Options for [`Buffer::to_text`](crate::Buffer::to_text) and
/// [`Buffer::to_utf16`](crate::Buffer::to_utf16).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Encoding used to decode the bytes.
    ///
    /// # Default
    ///
    /// [`Encoding::Utf8`]
    pub encoding: Option<Encoding>,

    /// First byte to decode. Past the end of the buffer yields empty text.
    ///
    /// # Default
    ///
    /// `0`
    pub start: Option<usize>,

    /// One past the last byte to decode. Clamped to the buffer length.
    ///
    /// # Default
    ///
    /// The buffer length.
    pub end: Option<usize>,
}

impl TextOptions {
    /// Decodes the whole buffer with `encoding`.
    #[must_use]
    pub const fn encoding(encoding: Encoding) -> Self {
        Self {
            encoding: Some(encoding),
            start: None,
            end: None,
        }
    }
}

impl WriteOptions {
    /// Writes from the start of the buffer with `encoding`.
    #[must_use]
    pub const fn encoding(encoding: Encoding) -> Self {
        Self {
            offset: None,
            length: None,
            encoding: Some(encoding),
        }
    }
}
