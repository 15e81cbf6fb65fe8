// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register region abstraction.
//!
//! A `RegisterRegion` is a fixed-size span of device memory that supports ordered 32-bit reads and
//! writes at byte offsets. Every access is bounds-checked against the span, so a bad offset turns
//! into an `Error` instead of a stray store into a neighbouring peripheral.

use core::fmt;

/// Error type for register-level operations.
#[derive(Debug)]
pub enum Error {
    /// Access touches bytes outside the mapped span.
    OutOfRange { offset: usize, len: usize },
    /// Offset is not 32-bit aligned.
    Misaligned(usize),
    /// BCM pin number outside 0..=53.
    InvalidPin(u8),
    /// Clock divisor outside the 12-bit DIVI field (1..=4095).
    InvalidDivisor(u32),
    /// Opening or mapping the memory device failed.
    #[cfg(feature = "std")]
    Map(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { offset, len } => {
                write!(f, "register offset {offset:#x} outside {len:#x}-byte region")
            }
            Error::Misaligned(offset) => write!(f, "register offset {offset:#x} is not word aligned"),
            Error::InvalidPin(pin) => write!(f, "GPIO{pin} is not a valid BCM pin"),
            Error::InvalidDivisor(div) => write!(f, "clock divisor {div} outside 1..=4095"),
            #[cfg(feature = "std")]
            Error::Map(e) => write!(f, "failed to map peripheral memory: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Map(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Map(e)
    }
}

/// Ordered 32-bit access to a span of device memory.
///
/// Implementations must issue each access as a single volatile load or store, in program order.
pub trait RegisterRegion {
    /// Span length in bytes.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the 32-bit register at byte `offset`.
    fn read32(&self, offset: usize) -> Result<u32, Error>;

    /// Write the 32-bit register at byte `offset`.
    fn write32(&mut self, offset: usize, value: u32) -> Result<(), Error>;
}

/// Validate that a 32-bit access at `offset` fits inside a span of `len` bytes.
#[inline]
pub fn check_access(offset: usize, len: usize) -> Result<(), Error> {
    if offset % 4 != 0 {
        return Err(Error::Misaligned(offset));
    }
    match offset.checked_add(4) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfRange { offset, len }),
    }
}
