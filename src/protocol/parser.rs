// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Parser for frequency commands.
//!
//! The parser is tolerant: bytes that are neither digits nor a leading `-` are counted as invalid
//! and skipped, and the digits around them still combine (`"12a34"` reads as 1234). A `-` after
//! the first byte is inert. Scanning stops after the first `\n` (which is consumed) or after
//! `max_len` bytes, whichever comes first.

use core::fmt;

use crate::protocol::messages::{FrequencyCommand, SIGN, TERMINATOR};

/// Failure to fetch a byte from the caller's buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TransferError {
    /// Index of the byte that could not be read.
    pub index: usize,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read command byte {}", self.index)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransferError {}

/// Byte source for a command, read one byte at a time.
///
/// Reading may fail part-way (e.g. the caller's buffer is shorter than the length it claimed).
pub trait UserBuffer {
    fn read_byte(&self, index: usize) -> Result<u8, TransferError>;
}

impl UserBuffer for [u8] {
    #[inline]
    fn read_byte(&self, index: usize) -> Result<u8, TransferError> {
        self.get(index).copied().ok_or(TransferError { index })
    }
}

/// Classification of a single command byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Byte {
    /// Decimal digit value 0..=9.
    Digit(u8),
    /// `-`; only meaningful as the first byte.
    Sign,
    /// `\n`; ends the command.
    Terminator,
    /// Anything else; contributes nothing.
    Invalid,
}

impl Byte {
    #[inline]
    pub fn classify(byte: u8) -> Self {
        match byte {
            b'0'..=b'9' => Byte::Digit(byte - b'0'),
            SIGN => Byte::Sign,
            TERMINATOR => Byte::Terminator,
            _ => Byte::Invalid,
        }
    }
}

/// Result of parsing one command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParsedFrequency {
    /// Bytes scanned, including a trailing `\n`.
    pub consumed: usize,
    pub command: FrequencyCommand,
    /// Bytes skipped as invalid.
    pub invalid: usize,
}

/// Incremental frequency parser.
#[derive(Debug, Default)]
pub struct Parser {
    consumed: usize,
    negative: bool,
    magnitude: u32,
    invalid: usize,
    done: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single byte. Returns `true` once the terminator has been consumed.
    pub fn push(&mut self, byte: u8) -> bool {
        let position = self.consumed;
        self.consumed += 1;

        match Byte::classify(byte) {
            Byte::Digit(d) => {
                self.magnitude = self.magnitude.saturating_mul(10).saturating_add(d as u32);
            }
            Byte::Sign => {
                if position == 0 {
                    self.negative = true;
                }
            }
            Byte::Terminator => self.done = true,
            Byte::Invalid => self.invalid += 1,
        }

        self.done
    }

    /// Finish parsing. Magnitudes beyond `i32` saturate.
    pub fn finish(self) -> ParsedFrequency {
        let magnitude = self.magnitude as i64;
        let signed = if self.negative { -magnitude } else { magnitude };
        let hz = signed.clamp(i32::MIN as i64, i32::MAX as i64) as i32;

        ParsedFrequency {
            consumed: self.consumed,
            command: FrequencyCommand::new(hz),
            invalid: self.invalid,
        }
    }
}

/// Parse a signed frequency from at most `max_len` bytes of `input`.
///
/// A byte that cannot be read aborts the parse; nothing is reported consumed in that case.
pub fn parse_signed_frequency<B: UserBuffer + ?Sized>(
    input: &B,
    max_len: usize,
) -> Result<ParsedFrequency, TransferError> {
    let mut parser = Parser::new();
    for index in 0..max_len {
        if parser.push(input.read_byte(index)?) {
            break;
        }
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;
    use std::string::ToString;

    fn parse(bytes: &[u8]) -> (usize, i32) {
        let p = parse_signed_frequency(bytes, bytes.len()).unwrap();
        (p.consumed, p.command.hz())
    }

    #[test]
    fn decimal_renderings_parse_back() {
        let samples: [i32; 12] = [
            0,
            1,
            -1,
            7,
            50,
            -50,
            10_000,
            -10_001,
            123_456,
            99_999_999,
            100_000_000,
            -100_000_000,
        ];
        for n in samples {
            let text = format!("{n}\n");
            let digits = n.unsigned_abs().to_string().len();
            let expected = digits + usize::from(n < 0) + 1;
            assert_eq!(parse(text.as_bytes()), (expected, n), "input {text:?}");
        }
    }

    #[test]
    fn invalid_bytes_are_skipped() {
        let p = parse_signed_frequency(&b"12a34\n"[..], 6).unwrap();
        assert_eq!(p.command.hz(), 1234);
        assert_eq!(p.consumed, 6);
        assert_eq!(p.invalid, 1);
    }

    #[test]
    fn interior_sign_is_inert() {
        assert_eq!(parse(b"1-2\n"), (4, 12));
        assert_eq!(parse(b"--5\n"), (4, -5));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(b""), (0, 0));
    }

    #[test]
    fn all_invalid_input_still_counts_every_byte() {
        let p = parse_signed_frequency(&b"abc"[..], 3).unwrap();
        assert_eq!((p.consumed, p.command.hz(), p.invalid), (3, 0, 3));
    }

    #[test]
    fn newline_stops_the_scan() {
        let buf = b"50\n-20\n";
        assert_eq!(parse(buf), (3, 50));
        assert_eq!(parse(&buf[3..]), (4, -20));
    }

    #[test]
    fn max_len_bounds_the_scan() {
        let p = parse_signed_frequency(&b"12345\n"[..], 3).unwrap();
        assert_eq!((p.consumed, p.command.hz()), (3, 123));
    }

    #[test]
    fn missing_terminator_uses_whole_buffer() {
        assert_eq!(parse(b"-300"), (4, -300));
    }

    #[test]
    fn unreadable_byte_aborts() {
        // Caller claims 8 bytes but only 4 are readable.
        let err = parse_signed_frequency(&b"1234"[..], 8).unwrap_err();
        assert_eq!(err, TransferError { index: 4 });
    }

    #[test]
    fn oversized_magnitudes_saturate() {
        assert_eq!(parse(b"99999999999\n").1, i32::MAX);
        assert_eq!(parse(b"-99999999999\n").1, i32::MIN);
    }
}
