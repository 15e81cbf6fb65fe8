// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frequency command written to the motor device.
//!
//! The wire format is plain ASCII: an optional leading `-`, decimal digits, an optional `\n`.
//! The sign picks the rotation direction, the magnitude the PWM frequency in Hz, and zero stops
//! the motor.

/// Line terminator that ends a command early.
pub const TERMINATOR: u8 = b'\n';

/// Leading byte that makes a command negative.
pub const SIGN: u8 = b'-';

/// Rotation direction encoded by the command sign.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Signed frequency request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FrequencyCommand {
    hz: i32,
}

impl FrequencyCommand {
    #[inline]
    pub fn new(hz: i32) -> Self {
        Self { hz }
    }

    /// Signed frequency as written.
    #[inline]
    pub fn hz(&self) -> i32 {
        self.hz
    }

    /// Frequency magnitude in Hz.
    #[inline]
    pub fn magnitude(&self) -> u32 {
        self.hz.unsigned_abs()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        if self.hz < 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    #[inline]
    pub fn is_stop(&self) -> bool {
        self.hz == 0
    }
}

impl From<i32> for FrequencyCommand {
    fn from(hz: i32) -> Self {
        Self::new(hz)
    }
}
