#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tgbuffer::{Buffer, CopyOptions, Encoding, FillOptions, Text, WriteOptions};

#[derive(Debug, Arbitrary)]
enum Op {
    Fill {
        pattern: Vec<u8>,
        start: Option<u8>,
        end: Option<u8>,
    },
    FillText {
        units: Vec<u16>,
        encoding: u8,
    },
    Copy {
        target_start: Option<u8>,
        source_start: Option<u8>,
        source_end: Option<u8>,
    },
    Slice {
        start: i8,
        end: Option<i8>,
    },
    Write {
        units: Vec<u16>,
        offset: Option<u8>,
        length: Option<u8>,
        encoding: u8,
    },
}

#[derive(Debug, Arbitrary)]
struct Input {
    initial: Vec<u8>,
    ops: Vec<Op>,
}

fn encoding(n: u8) -> Encoding {
    Encoding::ALL[usize::from(n) % Encoding::ALL.len()]
}

/// Every operation either succeeds or reports an error; none panics, and the
/// buffer length never changes.
fn run(input: Input) {
    let mut buf = Buffer::from(input.initial);
    let len = buf.len();
    for op in input.ops {
        match op {
            Op::Fill { pattern, start, end } => {
                let _ = buf.fill(&pattern[..], FillOptions {
                    start: start.map(usize::from),
                    end: end.map(usize::from),
                    encoding: None,
                });
            }
            Op::FillText { units, encoding: e } => {
                let _ = buf.fill(Text::Utf16(&units), FillOptions {
                    encoding: Some(encoding(e)),
                    ..Default::default()
                });
            }
            Op::Copy {
                target_start,
                source_start,
                source_end,
            } => {
                let mut reference = buf.to_vec();
                let result = buf.copy_within(CopyOptions {
                    target_start: target_start.map(usize::from),
                    source_start: source_start.map(usize::from),
                    source_end: source_end.map(usize::from),
                });
                if let Ok(n) = result {
                    let snapshot = Buffer::from(reference.clone());
                    let again = snapshot
                        .copy(&mut reference, CopyOptions {
                            target_start: target_start.map(usize::from),
                            source_start: source_start.map(usize::from),
                            source_end: source_end.map(usize::from),
                        })
                        .unwrap();
                    assert_eq!(n, again);
                    assert_eq!(&buf[..], &reference[..]);
                }
            }
            Op::Slice { start, end } => {
                let part = buf.slice(isize::from(start), end.map(isize::from));
                assert_eq!(&part[..], buf.subarray(isize::from(start), end.map(isize::from)));
            }
            Op::Write {
                units,
                offset,
                length,
                encoding: e,
            } => {
                let options = WriteOptions {
                    offset: offset.map(usize::from),
                    length: length.map(usize::from),
                    encoding: Some(encoding(e)),
                };
                if let Ok(n) = buf.write(Text::Utf16(&units), options) {
                    assert!(n <= len - options.offset.unwrap_or(0));
                }
            }
        }
        assert_eq!(buf.len(), len);
    }
}

fuzz_target!(|input: Input| run(input));
