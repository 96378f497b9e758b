#![no_main]
use libfuzzer_sys::fuzz_target;
use tgbuffer::{Buffer, Encoding, Text, TextOptions};

/// Decoding arbitrary bytes never panics, and every encoding that can
/// represent all bytes gives them back unchanged.
fn decode_bytes(data: &[u8]) {
    let buf = Buffer::from(data);
    for encoding in Encoding::ALL {
        let text = buf.to_text(TextOptions::encoding(encoding));
        let units = buf.to_utf16(TextOptions::encoding(encoding));
        let back = Buffer::from_text(Text::Utf16(&units), encoding).unwrap();
        match encoding {
            Encoding::Latin1 | Encoding::Hex | Encoding::Base64 => assert_eq!(back, buf),
            Encoding::Utf16Le => assert_eq!(back.len(), data.len() & !1),
            Encoding::Utf8 if std::str::from_utf8(data).is_ok() => {
                assert_eq!(back, buf);
                assert_eq!(text.as_bytes(), data);
            }
            Encoding::Utf8 | Encoding::Ascii => {}
        }
    }
}

/// Encoding arbitrary code units never panics and agrees with `byte_length`.
fn encode_units(data: &[u8]) {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text = Text::Utf16(&units);
    for encoding in Encoding::ALL {
        let buf = Buffer::from_text(text, encoding).unwrap();
        let len = Buffer::byte_length(text, Some(encoding)).unwrap();
        if encoding == Encoding::Hex {
            assert!(buf.len() <= len);
        } else {
            assert_eq!(buf.len(), len);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    decode_bytes(data);
    encode_units(data);
});
