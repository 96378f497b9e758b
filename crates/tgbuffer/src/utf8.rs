//! UTF-8 codec over UTF-16 code units.
//!
//! The encoder replaces every unpaired surrogate with U+FFFD. The decoder
//! replaces every malformed sequence with U+FFFD and resynchronises one byte
//! later, regardless of how long the sequence claimed to be.
use alloc::{string::String, vec::Vec};

use crate::error::BufferError;

/// UTF-8 encoding of U+FFFD.
pub const REPLACEMENT_BYTES: [u8; 3] = [0xEF, 0xBF, 0xBD];

const LEAD_MIN: u16 = 0xD800;
const TRAIL_MIN: u16 = 0xDC00;
const TRAIL_MAX: u16 = 0xDFFF;

#[inline]
fn is_surrogate(unit: u16) -> bool {
    (LEAD_MIN..=TRAIL_MAX).contains(&unit)
}

/// Output budget of the encoder. `None` is unbounded.
struct Budget(Option<usize>);

impl Budget {
    /// Reserves `n` bytes, returning `false` when they do not fit.
    #[inline]
    fn take(&mut self, n: usize) -> bool {
        match &mut self.0 {
            None => true,
            Some(left) if *left >= n => {
                *left -= n;
                true
            }
            Some(_) => false,
        }
    }
}

/// Appends the UTF-8 form of `cp` to `out`.
///
/// # Errors
///
/// Returns [`BufferError::InvalidCodePoint`] for values at or above
/// `0x110000`.
pub fn push_code_point(cp: u32, out: &mut Vec<u8>) -> Result<(), BufferError> {
    let mut buf = [0u8; 4];
    let n = encode_code_point(cp, &mut buf)?;
    out.extend_from_slice(&buf[..n]);
    Ok(())
}

#[expect(clippy::cast_possible_truncation)]
fn encode_code_point(cp: u32, buf: &mut [u8; 4]) -> Result<usize, BufferError> {
    if cp < 0x80 {
        buf[0] = cp as u8;
        Ok(1)
    } else if cp < 0x800 {
        buf[0] = (cp >> 6) as u8 | 0xC0;
        buf[1] = (cp & 0x3F) as u8 | 0x80;
        Ok(2)
    } else if cp < 0x1_0000 {
        buf[0] = (cp >> 12) as u8 | 0xE0;
        buf[1] = ((cp >> 6) & 0x3F) as u8 | 0x80;
        buf[2] = (cp & 0x3F) as u8 | 0x80;
        Ok(3)
    } else if cp < 0x11_0000 {
        buf[0] = (cp >> 18) as u8 | 0xF0;
        buf[1] = ((cp >> 12) & 0x3F) as u8 | 0x80;
        buf[2] = ((cp >> 6) & 0x3F) as u8 | 0x80;
        buf[3] = (cp & 0x3F) as u8 | 0x80;
        Ok(4)
    } else {
        Err(BufferError::InvalidCodePoint(cp))
    }
}

/// Drives the encoder, handing each complete character's bytes to `emit`.
/// Stops at the first character that does not fit in `budget`.
fn encode_with<I, F>(units: I, budget: Option<usize>, mut emit: F) -> Result<(), BufferError>
where
    I: IntoIterator<Item = u16>,
    F: FnMut(&[u8]),
{
    let mut budget = Budget(budget);
    let mut lead: Option<u16> = None;
    let mut buf = [0u8; 4];

    for unit in units {
        let cp = if is_surrogate(unit) {
            match lead.take() {
                // Unexpected trail.
                None if unit >= TRAIL_MIN => {
                    if !budget.take(3) {
                        return Ok(());
                    }
                    emit(&REPLACEMENT_BYTES);
                    continue;
                }
                None => {
                    lead = Some(unit);
                    continue;
                }
                // Two leads in a row.
                Some(_) if unit < TRAIL_MIN => {
                    if !budget.take(3) {
                        return Ok(());
                    }
                    emit(&REPLACEMENT_BYTES);
                    lead = Some(unit);
                    continue;
                }
                Some(hi) => {
                    ((u32::from(hi - LEAD_MIN) << 10) | u32::from(unit - TRAIL_MIN)) + 0x1_0000
                }
            }
        } else {
            if lead.take().is_some() {
                // Lead followed by a BMP character.
                if !budget.take(3) {
                    return Ok(());
                }
                emit(&REPLACEMENT_BYTES);
            }
            u32::from(unit)
        };

        let n = encode_code_point(cp, &mut buf)?;
        if !budget.take(n) {
            return Ok(());
        }
        emit(&buf[..n]);
    }

    // Unpaired lead at end of input.
    if lead.is_some() && budget.take(3) {
        emit(&REPLACEMENT_BYTES);
    }
    Ok(())
}

/// Encodes UTF-16 code units as UTF-8, emitting at most `budget` bytes.
///
/// A character that does not fit in the remaining budget ends the output;
/// no partial sequence is written.
///
/// # Errors
///
/// Returns [`BufferError::InvalidCodePoint`] if a scalar at or above
/// `0x110000` is produced, which cannot happen for code-unit input.
pub fn encode<I>(units: I, budget: Option<usize>) -> Result<Vec<u8>, BufferError>
where
    I: IntoIterator<Item = u16>,
{
    let units = units.into_iter();
    let mut out = Vec::with_capacity(units.size_hint().0);
    encode_with(units, budget, |bytes| out.extend_from_slice(bytes))?;
    Ok(out)
}

/// Number of bytes [`encode`] produces without a budget.
///
/// # Errors
///
/// Same as [`encode`].
pub fn encoded_len<I>(units: I) -> Result<usize, BufferError>
where
    I: IntoIterator<Item = u16>,
{
    let mut len = 0;
    encode_with(units, None, |bytes| len += bytes.len())?;
    Ok(len)
}

/// Iterator decoding UTF-8 bytes into `char`s with replacement.
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Chars<'a> {
    /// Decodes all of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Scalar value and length of the sequence at `pos`, if well formed.
    fn sequence_at(&self, pos: usize) -> Option<(u32, usize)> {
        let bytes = self.bytes;
        let first = bytes[pos];
        let len = match first {
            0xF0.. => 4,
            0xE0.. => 3,
            0xC0.. => 2,
            _ => 1,
        };
        let seq = bytes.get(pos..pos + len)?;
        let cont = |b: u8| b & 0xC0 == 0x80;

        let cp = match *seq {
            [a] => (a < 0x80).then_some(u32::from(a))?,
            [a, b] if cont(b) => {
                let cp = (u32::from(a & 0x1F) << 6) | u32::from(b & 0x3F);
                (cp > 0x7F).then_some(cp)?
            }
            [a, b, c] if cont(b) && cont(c) => {
                let cp = (u32::from(a & 0x0F) << 12)
                    | (u32::from(b & 0x3F) << 6)
                    | u32::from(c & 0x3F);
                (cp > 0x7FF && !(0xD800..=0xDFFF).contains(&cp)).then_some(cp)?
            }
            [a, b, c, d] if cont(b) && cont(c) && cont(d) => {
                let cp = (u32::from(a & 0x0F) << 18)
                    | (u32::from(b & 0x3F) << 12)
                    | (u32::from(c & 0x3F) << 6)
                    | u32::from(d & 0x3F);
                (0x1_0000..0x11_0000).contains(&cp).then_some(cp)?
            }
            _ => return None,
        };
        Some((cp, len))
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        match self.sequence_at(self.pos).and_then(|(cp, len)| Some((char::from_u32(cp)?, len))) {
            Some((ch, len)) => {
                self.pos += len;
                Some(ch)
            }
            None => {
                self.pos += 1;
                Some(char::REPLACEMENT_CHARACTER)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bytes.len() - self.pos;
        (left.div_ceil(4), Some(left))
    }
}

/// Decodes UTF-8 bytes, substituting U+FFFD for each malformed byte.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    Chars::new(bytes).collect()
}
