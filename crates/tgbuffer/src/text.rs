//! Borrowed text as a sequence of UTF-16 code units.
//!
//! Encoders are defined over code units rather than `char`s so that lone
//! surrogates, which a `&str` cannot hold, still reach them. [`Text`] lets
//! callers pass either ordinary Rust strings or raw code units through the
//! same entry points.
use core::{iter::Copied, slice, str::EncodeUtf16};

/// Text handed to an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text<'a> {
    /// Well-formed Rust text.
    Str(&'a str),
    /// Arbitrary UTF-16 code units, possibly containing lone surrogates.
    Utf16(&'a [u16]),
}

impl<'a> Text<'a> {
    /// Iterates the UTF-16 code units of the text.
    #[must_use]
    pub fn units(&self) -> Units<'a> {
        match *self {
            Text::Str(s) => Units::Str(s.encode_utf16()),
            Text::Utf16(u) => Units::Utf16(u.iter().copied()),
        }
    }

    /// Number of UTF-16 code units, the reference notion of string length.
    #[must_use]
    pub fn len_utf16(&self) -> usize {
        match *self {
            Text::Str(s) => s.chars().map(char::len_utf16).sum(),
            Text::Utf16(u) => u.len(),
        }
    }

    /// Whether the text holds no code units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match *self {
            Text::Str(s) => s.is_empty(),
            Text::Utf16(u) => u.is_empty(),
        }
    }

    /// Returns the single code unit of a one-unit text.
    pub(crate) fn single_unit(&self) -> Option<u16> {
        let mut units = self.units();
        match (units.next(), units.next()) {
            (Some(unit), None) => Some(unit),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(s: &'a str) -> Self {
        Text::Str(s)
    }
}

impl<'a> From<&'a alloc::string::String> for Text<'a> {
    fn from(s: &'a alloc::string::String) -> Self {
        Text::Str(s)
    }
}

impl<'a> From<&'a [u16]> for Text<'a> {
    fn from(units: &'a [u16]) -> Self {
        Text::Utf16(units)
    }
}

impl<'a, const N: usize> From<&'a [u16; N]> for Text<'a> {
    fn from(units: &'a [u16; N]) -> Self {
        Text::Utf16(units)
    }
}

/// Iterator over the code units of a [`Text`].
#[derive(Debug, Clone)]
pub enum Units<'a> {
    #[doc(hidden)]
    Str(EncodeUtf16<'a>),
    #[doc(hidden)]
    Utf16(Copied<slice::Iter<'a, u16>>),
}

impl Iterator for Units<'_> {
    type Item = u16;

    #[inline]
    fn next(&mut self) -> Option<u16> {
        match self {
            Units::Str(it) => it.next(),
            Units::Utf16(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Units::Str(it) => it.size_hint(),
            Units::Utf16(it) => it.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::Text;

    #[test]
    fn str_units_split_supplementary_chars() {
        let text = Text::from("a\u{1F638}");
        assert_eq!(text.units().collect::<Vec<_>>(), [0x61, 0xD83D, 0xDE38]);
        assert_eq!(text.len_utf16(), 3);
    }

    #[test]
    fn single_unit_only_for_one_unit_text() {
        assert_eq!(Text::from("a").single_unit(), Some(0x61));
        assert_eq!(Text::from("ab").single_unit(), None);
        assert_eq!(Text::from("").single_unit(), None);
        assert_eq!(Text::from("\u{1F638}").single_unit(), None);
        assert_eq!(Text::from(&[0xD800u16]).single_unit(), Some(0xD800));
    }
}
