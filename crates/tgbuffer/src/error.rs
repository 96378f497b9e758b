use alloc::string::String;

use thiserror::Error;

/// Errors surfaced by the codecs and by [`Buffer`](crate::Buffer)
/// operations.
///
/// None of these are recovered internally. The lenient behaviours of the
/// codecs (replacement characters, early hex termination, dropped base64
/// characters) never produce an error in the first place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The encoding name is not one of the supported encodings, even after
    /// case folding.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
    /// An index, offset or length falls outside the addressed buffer.
    #[error("{0}")]
    OutOfBounds(&'static str),
    /// Base64 text whose length is not a multiple of four.
    #[error("invalid base64 string: {0}")]
    MalformedInput(&'static str),
    /// A scalar value at or above `0x110000` reached the UTF-8 encoder.
    #[error("invalid code point 0x{0:X}")]
    InvalidCodePoint(u32),
    /// The construction input is of a kind no constructor accepts.
    #[error(
        "the first argument must be one of type string, Buffer, ArrayBuffer, Array, or \
         Array-like Object. Received type {0}"
    )]
    UnsupportedInputType(&'static str),
    /// An argument had the right shape but an unacceptable value or type.
    #[error("{0}")]
    ArgumentType(String),
}
