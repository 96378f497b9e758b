use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use core::cell::Cell;

use rstest::rstest;

use crate::{
    Buffer, BufferError, BufferJson, Encoding, MAX_LENGTH, Primitive, Source, Text, TextOptions,
    ToPrimitive,
};

#[test]
fn from_string_indexes_bytes() {
    let buf = Buffer::from_source("abc").unwrap();
    assert_eq!(buf.len(), 3);
    assert_eq!(buf[0], 97);
    assert_eq!(buf[1], 98);
    assert_eq!(buf[2], 99);
}

#[test]
fn from_array_masks_elements() {
    let buf = Buffer::from_source(&[97.0, 98.0, 355.0, -1.0, 1.9][..]).unwrap();
    assert_eq!(&buf[..], [97, 98, 99, 255, 1]);
}

#[test]
fn mutation_is_visible_in_decoded_text() {
    let mut buf = Buffer::from_source("abc").unwrap();
    buf[2] += 10;
    assert_eq!(buf.to_string(), "abm");
}

#[test]
fn construction_copies_byte_views() {
    let mut backing = vec![1u8, 2, 3];
    let buf = Buffer::from_source(&backing).unwrap();
    backing[0] = 9;
    assert_eq!(&buf[..], [1, 2, 3]);

    let copy = Buffer::from_source(&buf).unwrap();
    let mut slice = copy.slice(0, None);
    slice[1] = 7;
    assert_eq!(&copy[..], [1, 2, 3]);
}

#[test]
fn subarray_borrows_the_same_bytes() {
    let mut buf = Buffer::from_source("hello").unwrap();
    buf.subarray_mut(1, Some(-1)).fill(b'-');
    assert_eq!(buf.to_string(), "h---o");
    assert_eq!(buf.subarray(-2, None), b"-o");
}

#[test]
fn from_json_object() {
    let json = BufferJson::new(vec![1.0, 2.0, 3.0]);
    let buf = Buffer::from_source(&json).unwrap();
    assert_eq!(&buf[..], [1, 2, 3]);
    assert_eq!(buf.to_json(), json);
}

#[test]
fn from_json_masks_data() {
    let json = BufferJson::new(vec![256.0, -1.0, 513.0, 1.5, -1.5, f64::NAN]);
    assert_eq!(&Buffer::from_json(&json).unwrap()[..], [0, 255, 1, 1, 255, 0]);
}

#[test]
fn from_json_requires_buffer_tag() {
    let json = BufferJson {
        kind: "Uint8Array".to_owned(),
        data: vec![1.0],
    };
    assert_eq!(
        Buffer::from_source(&json),
        Err(BufferError::UnsupportedInputType("object"))
    );
}

#[test]
fn from_number_is_rejected() {
    assert!(matches!(
        Buffer::from_source(5.0),
        Err(BufferError::ArgumentType(_))
    ));
}

#[rstest]
#[case(Source::Null, "null")]
#[case(Source::Bool(true), "boolean")]
fn unsupported_inputs(#[case] source: Source<'static>, #[case] kind: &'static str) {
    assert_eq!(
        Buffer::from_source(source),
        Err(BufferError::UnsupportedInputType(kind))
    );
}

#[rstest]
#[case(None, None, &[1, 2, 3, 4])]
#[case(Some(1), None, &[2, 3, 4])]
#[case(Some(1), Some(2), &[2, 3])]
#[case(Some(4), None, &[])]
#[case(Some(4), Some(0), &[])]
fn from_array_buffer_windows(
    #[case] byte_offset: Option<usize>,
    #[case] length: Option<usize>,
    #[case] expected: &[u8],
) {
    let region = [1u8, 2, 3, 4];
    let buf = Buffer::from_source(Source::ArrayBuffer {
        bytes: &region,
        byte_offset,
        length,
    })
    .unwrap();
    assert_eq!(&buf[..], expected);
}

#[rstest]
#[case(Some(5), None, "\"offset\" is outside of buffer bounds")]
#[case(Some(2), Some(3), "\"length\" is outside of buffer bounds")]
#[case(None, Some(5), "\"length\" is outside of buffer bounds")]
fn from_array_buffer_out_of_bounds(
    #[case] byte_offset: Option<usize>,
    #[case] length: Option<usize>,
    #[case] message: &'static str,
) {
    let region = [1u8, 2, 3, 4];
    assert_eq!(
        Buffer::from_array_buffer(&region, byte_offset, length),
        Err(BufferError::OutOfBounds(message))
    );
}

#[rstest]
#[case("aGVsbG8gd29ybGQ=", Encoding::Base64, b"hello world")]
#[case("aGVsbG8gd29ybGQ", Encoding::Base64, b"hello world")]
#[case("68656c6c6f", Encoding::Hex, b"hello")]
#[case("68656c6cZZ6f", Encoding::Hex, b"hell")]
#[case("1z", Encoding::Hex, &[0x01])]
#[case("ab1z", Encoding::Hex, &[0xAB, 0x01])]
#[case(" f-1", Encoding::Hex, &[0x0F, 0xFF])]
#[case("abc", Encoding::Hex, &[0xAB])]
#[case("h\u{e9}", Encoding::Latin1, b"h\xE9")]
#[case("h\u{e9}", Encoding::Utf8, b"h\xC3\xA9")]
#[case("hi", Encoding::Utf16Le, b"h\0i\0")]
fn from_text_per_encoding(#[case] text: &str, #[case] encoding: Encoding, #[case] expected: &[u8]) {
    let buf = Buffer::from_source(Source::Str(text.into(), Some(encoding))).unwrap();
    assert_eq!(&buf[..], expected);
}

#[test]
fn surrogate_pairs_roundtrip() {
    let s = "\u{1F638}\u{1F4AD}\u{1F44D}";
    let buf = Buffer::from_text(s, Encoding::Utf8).unwrap();
    assert_eq!(buf.len(), 12);
    assert_eq!(buf.to_string(), s);
}

#[test]
fn lone_surrogate_code_units_encode_as_replacement() {
    let units = [0x61u16, 0xD83D, 0x62];
    let buf = Buffer::from_text(Text::Utf16(&units), Encoding::Utf8).unwrap();
    assert_eq!(&buf[..], b"a\xEF\xBF\xBDb");
}

#[test]
fn malformed_utf8_decodes_one_replacement_per_byte() {
    let buf = Buffer::from(&[0xFFu8][..]);
    assert_eq!(buf.to_string(), "\u{FFFD}");
    let buf = Buffer::from(&[0xE2u8, 0x82, 0x61][..]);
    assert_eq!(buf.to_string(), "\u{FFFD}\u{FFFD}a");
}

struct Wrapped {
    value: &'static str,
    calls: Cell<usize>,
}

impl ToPrimitive for Wrapped {
    fn to_primitive(&self) -> Primitive {
        self.calls.set(self.calls.get() + 1);
        Primitive::String(self.value.to_string())
    }
}

#[test]
fn coercion_hook_runs_once() {
    let wrapped = Wrapped {
        value: "caf\u{e9}",
        calls: Cell::new(0),
    };
    let buf = Buffer::from_source(Source::Coercible(&wrapped)).unwrap();
    assert_eq!(buf.to_string(), "caf\u{e9}");
    assert_eq!(wrapped.calls.get(), 1);
}

struct Nothing;

impl ToPrimitive for Nothing {
    fn to_primitive(&self) -> Primitive {
        Primitive::Null
    }
}

#[test]
fn coercion_to_unsupported_value_fails() {
    assert_eq!(
        Buffer::from_source(Source::Coercible(&Nothing)),
        Err(BufferError::UnsupportedInputType("null"))
    );
}

#[test]
fn alloc_has_requested_length() {
    assert_eq!(Buffer::alloc(0).unwrap().len(), 0);
    let buf = Buffer::alloc(5).unwrap();
    assert_eq!(&buf[..], [0; 5]);
    assert_eq!(
        Buffer::alloc(MAX_LENGTH + 1),
        Err(BufferError::OutOfBounds("the value is invalid for option \"size\""))
    );
}

#[test]
fn alloc_filled_with_pattern() {
    let buf = Buffer::alloc_filled(5, "ab", None).unwrap();
    assert_eq!(&buf[..], b"ababa");
    let buf = Buffer::alloc_filled(4, "6162", Some(Encoding::Hex)).unwrap();
    assert_eq!(&buf[..], b"abab");
    let buf = Buffer::alloc_filled(3, 0x101, None).unwrap();
    assert_eq!(&buf[..], [1, 1, 1]);
}

#[rstest]
#[case("hello", Some(Encoding::Ascii), 5)]
#[case("\u{1F638}", Some(Encoding::Utf8), 4)]
#[case("\u{1F638}", None, 4)]
#[case("\u{1F638}", Some(Encoding::Utf16Le), 4)]
#[case("\u{1F638}", Some(Encoding::Latin1), 2)]
#[case("abcdef", Some(Encoding::Hex), 3)]
#[case("aGk=", Some(Encoding::Base64), 2)]
fn byte_length_of_text(
    #[case] text: &str,
    #[case] encoding: Option<Encoding>,
    #[case] expected: usize,
) {
    assert_eq!(Buffer::byte_length(text, encoding).unwrap(), expected);
}

#[test]
fn byte_length_of_bytes_ignores_encoding() {
    let bytes = [1u8, 2, 3];
    assert_eq!(Buffer::byte_length(&bytes, Some(Encoding::Hex)).unwrap(), 3);
    let buf = Buffer::alloc(7).unwrap();
    assert_eq!(Buffer::byte_length(&buf, None).unwrap(), 7);
}

#[test]
fn byte_length_of_other_values_fails() {
    let err = Buffer::byte_length(1.0, None).unwrap_err();
    assert!(matches!(err, BufferError::ArgumentType(ref msg) if msg.ends_with("Received type number")));
}

#[test]
fn to_text_ranges() {
    let buf = Buffer::from_source("hello").unwrap();
    let text = |start, end| {
        buf.to_text(TextOptions {
            start,
            end,
            ..Default::default()
        })
    };
    assert_eq!(text(Some(1), Some(3)), "el");
    assert_eq!(text(Some(3), None), "lo");
    assert_eq!(text(None, Some(99)), "hello");
    assert_eq!(text(Some(9), None), "");
    assert_eq!(text(Some(3), Some(2)), "");
}

#[test]
fn to_text_per_encoding() {
    let buf = Buffer::from(&b"\x00\xFFhi"[..]);
    let decoded: Vec<String> = Encoding::ALL
        .iter()
        .map(|&e| buf.to_text(TextOptions::encoding(e)))
        .collect();
    assert_eq!(
        decoded,
        [
            "\0\u{7f}hi",
            "\0\u{FFFD}hi",
            "\0\u{ff}hi",
            "AP9oaQ==",
            "\u{ff00}\u{6968}",
            "00ff6869",
        ]
    );
}
