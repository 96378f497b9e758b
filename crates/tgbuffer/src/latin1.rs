//! Single-byte codecs: `latin1` (alias `binary`) and `ascii`.
//!
//! Both encode by keeping the low eight bits of each code unit. They differ
//! only when decoding: `ascii` clears the top bit of every byte, `latin1`
//! maps bytes to U+0000..=U+00FF unchanged.
use alloc::{string::String, vec::Vec};

/// Encodes each code unit as its low byte, writing at most `budget` bytes.
#[must_use]
#[expect(clippy::cast_possible_truncation)]
pub fn encode<I>(units: I, budget: Option<usize>) -> Vec<u8>
where
    I: IntoIterator<Item = u16>,
{
    units
        .into_iter()
        .take(budget.unwrap_or(usize::MAX))
        .map(|unit| (unit & 0xFF) as u8)
        .collect()
}

/// Decodes bytes as Latin-1.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Decodes bytes as 7-bit ASCII, discarding the top bit.
#[must_use]
pub fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b & 0x7F)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_keeps_low_byte() {
        let units: alloc::vec::Vec<u16> = "a\u{e9}\u{20AC}".encode_utf16().collect();
        assert_eq!(encode(units.iter().copied(), None), [0x61, 0xE9, 0xAC]);
        assert_eq!(encode(units, Some(2)), [0x61, 0xE9]);
    }

    #[test]
    fn ascii_decode_strips_top_bit_latin1_does_not() {
        assert_eq!(decode_ascii(&[0x61, 0xE9]), "ai");
        assert_eq!(decode_latin1(&[0x61, 0xE9]), "a\u{e9}");
    }

    #[quickcheck_macros::quickcheck]
    fn latin1_roundtrips_every_byte(bytes: Vec<u8>) -> bool {
        encode(decode_latin1(&bytes).encode_utf16(), None) == bytes
    }

    #[quickcheck_macros::quickcheck]
    fn ascii_decode_is_ascii(bytes: Vec<u8>) -> bool {
        let text = decode_ascii(&bytes);
        text.len() == bytes.len() && text.is_ascii()
    }
}
