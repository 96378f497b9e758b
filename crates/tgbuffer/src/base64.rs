//! Base64 codec with Node's lenient decoding rules.
//!
//! Decoding accepts the standard and the URL-safe alphabet at the same time,
//! ignores everything after the first `=`, drops characters outside the
//! alphabet and tolerates missing padding. Encoding always emits the standard
//! alphabet with `=` padding.
use alloc::{string::String, vec::Vec};

use crate::{error::BufferError, text::Text};

const LOOKUP: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const INVALID: u8 = 0xFF;

/// Symbol value per ASCII byte, `INVALID` for bytes outside both alphabets.
const REV_LOOKUP: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < LOOKUP.len() {
        table[LOOKUP[i] as usize] = i as u8;
        i += 1;
    }
    table[b'-' as usize] = 62;
    table[b'_' as usize] = 63;
    table
};

const PAD: u8 = b'=';

#[inline]
fn is_alphabet(unit: u16) -> bool {
    unit < 0x80 && REV_LOOKUP[usize::from(unit)] != INVALID
}

/// Symbol value of `b`; bytes outside the alphabet count as zero.
#[inline]
fn sextet(b: u8) -> u32 {
    match REV_LOOKUP[usize::from(b)] {
        INVALID => 0,
        v => u32::from(v),
    }
}

/// Normalises arbitrary text into strict base64 input.
///
/// Everything from the first `=` on is discarded, characters outside the
/// alphabet are removed, fewer than two remaining characters yield the empty
/// string, and the result is right-padded with `=` to a multiple of four.
#[must_use]
pub fn clean(text: Text<'_>) -> Vec<u8> {
    let mut dropped = 0usize;
    let mut out = Vec::with_capacity(text.len_utf16() + 3);
    for unit in text.units().take_while(|&u| u != u16::from(PAD)) {
        if is_alphabet(unit) {
            #[expect(clippy::cast_possible_truncation)]
            out.push(unit as u8);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::trace!("base64: ignored {dropped} characters outside the alphabet");
    }
    if out.len() < 2 {
        out.clear();
        return out;
    }
    while out.len() % 4 != 0 {
        out.push(PAD);
    }
    out
}

/// Splits strict base64 input into the number of meaningful characters and
/// the number of placeholder characters that follow them.
///
/// # Errors
///
/// Returns [`BufferError::MalformedInput`] if the input length is not a
/// multiple of four.
pub fn lens(b64: &[u8]) -> Result<(usize, usize), BufferError> {
    let len = b64.len();
    if len % 4 > 0 {
        return Err(BufferError::MalformedInput("length must be a multiple of 4"));
    }
    // Anything after the first placeholder is ignored.
    let valid_len = b64.iter().position(|&b| b == PAD).unwrap_or(len);
    let placeholders = if valid_len == len {
        0
    } else {
        4 - (valid_len % 4)
    };
    Ok((valid_len, placeholders))
}

/// Number of bytes produced by `valid_len` meaningful characters.
///
/// A final group of one character carries fewer than eight bits and yields
/// nothing.
#[inline]
fn decoded_len_for(valid_len: usize) -> usize {
    valid_len / 4 * 3
        + match valid_len % 4 {
            2 => 1,
            3 => 2,
            _ => 0,
        }
}

/// Decodes strict base64 input (length a multiple of four).
///
/// # Errors
///
/// Returns [`BufferError::MalformedInput`] if the input length is not a
/// multiple of four.
#[expect(clippy::cast_possible_truncation)]
pub fn to_byte_array(b64: &[u8]) -> Result<Vec<u8>, BufferError> {
    let (valid_len, _) = lens(b64)?;
    let valid = &b64[..valid_len];
    let mut out = Vec::with_capacity(decoded_len_for(valid_len));

    let mut groups = valid.chunks_exact(4);
    for group in groups.by_ref() {
        let tmp = (sextet(group[0]) << 18)
            | (sextet(group[1]) << 12)
            | (sextet(group[2]) << 6)
            | sextet(group[3]);
        out.extend_from_slice(&[(tmp >> 16) as u8, (tmp >> 8) as u8, tmp as u8]);
    }

    match *groups.remainder() {
        [a, b] => {
            let tmp = (sextet(a) << 2) | (sextet(b) >> 4);
            out.push(tmp as u8);
        }
        [a, b, c] => {
            let tmp = (sextet(a) << 10) | (sextet(b) << 4) | (sextet(c) >> 2);
            out.extend_from_slice(&[(tmp >> 8) as u8, tmp as u8]);
        }
        _ => {}
    }

    Ok(out)
}

/// Decodes lenient base64 text, applying [`clean`] first.
///
/// # Errors
///
/// Propagates [`to_byte_array`] errors; cleaned input always has a valid
/// length, so this does not fail in practice.
pub fn decode(text: Text<'_>) -> Result<Vec<u8>, BufferError> {
    to_byte_array(&clean(text))
}

/// Number of bytes [`decode`] produces for `text`, without decoding.
#[must_use]
pub fn decoded_len(text: Text<'_>) -> usize {
    let cleaned = clean(text);
    let valid_len = cleaned.iter().position(|&b| b == PAD).unwrap_or(cleaned.len());
    decoded_len_for(valid_len)
}

#[inline]
fn push_sextet(out: &mut String, value: u32) {
    out.push(char::from(LOOKUP[(value & 0x3F) as usize]));
}

/// Encodes bytes as padded, standard-alphabet base64.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);

    let mut triplets = bytes.chunks_exact(3);
    for t in triplets.by_ref() {
        let num = (u32::from(t[0]) << 16) | (u32::from(t[1]) << 8) | u32::from(t[2]);
        push_sextet(&mut out, num >> 18);
        push_sextet(&mut out, num >> 12);
        push_sextet(&mut out, num >> 6);
        push_sextet(&mut out, num);
    }

    match *triplets.remainder() {
        [a] => {
            let tmp = u32::from(a);
            push_sextet(&mut out, tmp >> 2);
            push_sextet(&mut out, tmp << 4);
            out.push_str("==");
        }
        [a, b] => {
            let tmp = (u32::from(a) << 8) | u32::from(b);
            push_sextet(&mut out, tmp >> 10);
            push_sextet(&mut out, tmp >> 4);
            push_sextet(&mut out, tmp << 2);
            out.push('=');
        }
        _ => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_determines_trailing_bytes() {
        assert_eq!(decode("YQ==".into()).unwrap(), b"a");
        assert_eq!(decode("YWI=".into()).unwrap(), b"ab");
        assert_eq!(decode("YWJj".into()).unwrap(), b"abc");
    }

    #[test]
    fn url_safe_and_standard_mix() {
        assert_eq!(decode("-_+/".into()).unwrap(), [0xFB, 0xFF, 0xBF]);
        assert_eq!(decode("-_-_".into()).unwrap(), decode("+/+/".into()).unwrap());
    }

    #[test]
    fn cleanup_rules() {
        assert_eq!(clean(" Y W\nI ".into()), b"YWI=");
        assert_eq!(clean("YQ==trailing".into()), b"YQ==");
        assert_eq!(clean("Y".into()), b"");
        assert_eq!(clean("=YWJj".into()), b"");
        assert_eq!(clean("AAAAA".into()), b"AAAAA===");
    }

    #[test]
    fn dangling_single_character_group_is_dropped() {
        assert_eq!(decode("AAAAA".into()).unwrap(), [0, 0, 0]);
        assert_eq!(decoded_len("AAAAA".into()), 3);
    }

    #[test]
    fn strict_input_must_be_a_multiple_of_four() {
        assert_eq!(
            to_byte_array(b"YWJ"),
            Err(BufferError::MalformedInput("length must be a multiple of 4"))
        );
        assert_eq!(lens(b"YQ==").unwrap(), (2, 2));
        assert_eq!(lens(b"YWI=").unwrap(), (3, 1));
        assert_eq!(lens(b"YWJj").unwrap(), (4, 0));
    }

    #[test]
    fn encode_pads_leftovers() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"a"), "YQ==");
        assert_eq!(encode(b"ab"), "YWI=");
        assert_eq!(encode(b"abc"), "YWJj");
        assert_eq!(encode(&[0xFB, 0xFF, 0xBF]), "+/+/");
    }

    #[test]
    fn decoded_len_matches_decode() {
        for s in ["", "Q", "QQ", "QUI", "QUJD", "QUJDRA==", "QU JD\tRA", "YWJj=ZZZ"] {
            assert_eq!(decoded_len(s.into()), decode(s.into()).unwrap().len(), "{s:?}");
        }
    }
}
