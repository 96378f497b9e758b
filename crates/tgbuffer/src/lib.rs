//! A deterministic byte buffer with the text encodings of Node's `Buffer`.
//!
//! [`Buffer`] owns a fixed-length byte region and converts between bytes and
//! text in six encodings: `utf8`, `utf16le`, `ascii`, `latin1`, `hex` and
//! `base64`. The edge cases follow Node bit for bit: lone surrogates encode
//! as U+FFFD, malformed UTF-8 decodes one replacement per bad byte, hex
//! decoding stops at the first bad pair, and base64 ignores characters
//! outside its alphabet.
//!
//! ```rust
//! use tgbuffer::{Buffer, CopyOptions, Encoding, TextOptions};
//!
//! let src = Buffer::from_text("aGVsbG8=", Encoding::Base64)?;
//! let mut dst = Buffer::alloc(8)?;
//! let n = src.copy(&mut dst, CopyOptions { target_start: Some(3), ..Default::default() })?;
//! assert_eq!(n, 5);
//! assert_eq!(dst.to_text(TextOptions::encoding(Encoding::Hex)), "00000068656c6c6f");
//! # Ok::<(), tgbuffer::BufferError>(())
//! ```
//!
//! The codec modules are public for callers that only need one conversion
//! and no buffer.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod base64;
pub mod hex;
pub mod latin1;
pub mod utf16;
pub mod utf8;

mod buffer;
mod encoding;
mod error;
mod options;
mod source;
mod text;

#[cfg(test)]
mod tests;

pub use buffer::{Buffer, FillValue, MAX_LENGTH};
pub use encoding::Encoding;
pub use error::BufferError;
pub use options::{CopyOptions, FillOptions, TextOptions, WriteOptions};
pub use source::{BufferJson, Primitive, Source, ToPrimitive};
pub use text::{Text, Units};
