//! UTF-16LE (`ucs2`) codec.
//!
//! Code units are copied verbatim, so lone surrogates survive both
//! directions.
use alloc::vec::Vec;

/// Encodes each code unit as two little-endian bytes, stopping before the
/// first unit that would exceed `budget` bytes.
#[must_use]
pub fn encode<I>(units: I, budget: Option<usize>) -> Vec<u8>
where
    I: IntoIterator<Item = u16>,
{
    let units = units.into_iter();
    let max_units = budget.map_or(usize::MAX, |b| b / 2);
    let mut out = Vec::with_capacity(units.size_hint().0.min(max_units) * 2);
    for unit in units.take(max_units) {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decodes byte pairs into code units. An odd trailing byte is ignored.
#[must_use]
pub fn decode(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_byte_first() {
        assert_eq!(encode([0x20AC, 0x0061], None), [0xAC, 0x20, 0x61, 0x00]);
        assert_eq!(decode(&[0xAC, 0x20, 0x61, 0x00]), [0x20AC, 0x0061]);
    }

    #[test]
    fn budget_drops_dangling_unit() {
        assert_eq!(encode([0x61, 0x62], Some(3)), [0x61, 0x00]);
        assert_eq!(encode([0x61], Some(1)), [0u8; 0]);
    }

    #[test]
    fn odd_trailing_byte_is_ignored() {
        assert_eq!(decode(&[0x61, 0x00, 0x62]), [0x61]);
        assert!(decode(&[0x61]).is_empty());
    }

    #[test]
    fn lone_surrogates_survive() {
        assert_eq!(decode(&encode([0xD800], None)), [0xD800]);
    }
}
