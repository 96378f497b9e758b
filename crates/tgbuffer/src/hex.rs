//! Lowercase hexadecimal codec.
use alloc::{string::String, vec::Vec};

use crate::text::Text;

const ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Two lowercase digits for every byte value.
const TABLE: [[u8; 2]; 256] = {
    let mut table = [[0u8; 2]; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = [ALPHABET[i >> 4], ALPHABET[i & 0x0F]];
        i += 1;
    }
    table
};

/// Encodes bytes as lowercase hex.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        let [hi, lo] = TABLE[usize::from(b)];
        out.push(char::from(hi));
        out.push(char::from(lo));
    }
    out
}

#[inline]
fn digit(unit: u16) -> Option<u8> {
    match u8::try_from(unit).ok()? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// White space and line terminators skipped before a number.
#[inline]
fn is_space(unit: u16) -> bool {
    matches!(
        unit,
        0x09..=0x0D
            | 0x20
            | 0xA0
            | 0x1680
            | 0x2000..=0x200A
            | 0x2028
            | 0x2029
            | 0x202F
            | 0x205F
            | 0x3000
            | 0xFEFF
    )
}

/// Parses one chunk of at most two code units as a base-16 integer and
/// keeps its low byte.
///
/// Leading white space and one sign are skipped, a `0x` prefix is dropped,
/// and digits are read up to the first non-digit. `None` if no digit was
/// read.
fn parse_chunk(chunk: &[u16]) -> Option<u8> {
    let mut rest = chunk;
    while let [first, tail @ ..] = rest {
        if !is_space(*first) {
            break;
        }
        rest = tail;
    }
    let negative = match rest {
        [0x2D, tail @ ..] => {
            rest = tail;
            true
        }
        [0x2B, tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };
    if let [0x30, 0x58 | 0x78, tail @ ..] = rest {
        rest = tail;
    }
    let mut value: Option<u8> = None;
    for &unit in rest {
        let Some(d) = digit(unit) else {
            break;
        };
        // At most two digits fit in a chunk, so this never overflows.
        value = Some(value.map_or(d, |v| (v << 4) | d));
    }
    value.map(|v| if negative { v.wrapping_neg() } else { v })
}

/// Decodes hex text two code units at a time.
///
/// Without a maximum only complete pairs are decoded. With one, a trailing
/// unpaired digit is decoded too when room remains, producing at most `max`
/// bytes.
///
/// Each chunk is read as a base-16 number: `"1z"` gives `0x01`, `" f"` gives
/// `0x0f` and `"-1"` gives `0xff`. Decoding stops at the first chunk with no
/// digit and returns the bytes decoded before it.
#[must_use]
pub fn decode(text: Text<'_>, max: Option<usize>) -> Vec<u8> {
    let len = text.len_utf16();
    let limit = max.map_or(len / 2, |m| m.min(len.div_ceil(2)));
    let mut out = Vec::with_capacity(limit);
    let mut units = text.units();
    while out.len() < limit {
        let mut chunk = [0u16; 2];
        let mut n = 0;
        for slot in &mut chunk {
            let Some(unit) = units.next() else {
                break;
            };
            *slot = unit;
            n += 1;
        }
        let Some(byte) = parse_chunk(&chunk[..n]) else {
            log::debug!("hex: stopped at invalid pair after {} bytes", out.len());
            break;
        };
        out.push(byte);
    }
    out
}

/// Number of bytes [`decode`] reserves for `text`: half its length.
#[must_use]
pub fn decoded_len(text: Text<'_>) -> usize {
    text.len_utf16() / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_byte() {
        let all: Vec<u8> = (0..=255).collect();
        let hex = encode(&all);
        assert_eq!(&hex[..6], "000102");
        assert_eq!(&hex[hex.len() - 4..], "feff");
        assert_eq!(decode(Text::from(hex.as_str()), None), all);
    }

    #[test]
    fn mixed_case_digits() {
        assert_eq!(decode("DeAdBeEf".into(), None), [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn stops_at_first_bad_pair() {
        assert_eq!(decode("abxxcd".into(), None), [0xAB]);
        assert_eq!(decode("zz".into(), None), [0u8; 0]);
        assert_eq!(decode("a".into(), None), [0u8; 0]);
        assert_eq!(decode("abc".into(), None), [0xAB]);
        assert_eq!(decode("ab0x".into(), None), [0xAB]);
        assert_eq!(decode("ab  ".into(), None), [0xAB]);
        assert_eq!(decode("abz1".into(), None), [0xAB]);
    }

    #[rstest::rstest]
    #[case("1z", 0x01)]
    #[case(" f", 0x0F)]
    #[case("\tA", 0x0A)]
    #[case("-1", 0xFF)]
    #[case("+f", 0x0F)]
    #[case("-0", 0x00)]
    #[case("7-", 0x07)]
    fn pairs_read_a_number_prefix(#[case] pair: &str, #[case] byte: u8) {
        assert_eq!(decode(pair.into(), None), [byte]);
    }

    #[test]
    fn prefix_pairs_do_not_stop_decoding() {
        assert_eq!(decode("ab1z".into(), None), [0xAB, 0x01]);
        assert_eq!(decode("-1ff".into(), None), [0xFF, 0xFF]);
    }

    #[test]
    fn trailing_digit_needs_a_maximum() {
        assert_eq!(decode("abc".into(), Some(4)), [0xAB, 0x0C]);
        assert_eq!(decode("abc".into(), Some(1)), [0xAB]);
        assert_eq!(decode("ab ".into(), Some(4)), [0xAB]);
    }

    #[test]
    fn respects_maximum() {
        assert_eq!(decode("010203".into(), Some(2)), [1, 2]);
    }
}
