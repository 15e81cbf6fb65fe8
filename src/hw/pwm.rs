// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! BCM283x PWM controller.
//!
//! The controller counts at the rate of the PWM clock (see [`crate::hw::clock`]). In mark-space
//! mode a channel's output is high while the counter is below `DAT` and low until it wraps at
//! `RNG`, so the output frequency is `clock / RNG`. Duty is fixed at 50% (`DAT = RNG / 2`).

use super::region::{Error, RegisterRegion};

/// Size of the mapped PWM block.
pub const PWM_SPAN: usize = 0xC0;

/// Counter clock after the clock manager divides the 19.2 MHz oscillator by 2.
pub const BASE_CLOCK_HZ: u32 = 9_600_000;

/// Highest frequency the count mapping honours; anything above is clamped to this.
pub const MAX_FREQUENCY_HZ: i32 = 10_000;

// Register offsets
pub mod reg {
    pub const CTL: usize = 0x00;
    pub const STA: usize = 0x04;
    pub const DMAC: usize = 0x08;
    pub const RNG1: usize = 0x10;
    pub const DAT1: usize = 0x14;
    pub const FIF1: usize = 0x18;
    pub const RNG2: usize = 0x20;
    pub const DAT2: usize = 0x24;
}

// CTL bits
pub const CTL_PWEN1: u32 = 1 << 0;
pub const CTL_MSEN1: u32 = 1 << 7;
pub const CTL_PWEN2: u32 = 1 << 8;
pub const CTL_MSEN2: u32 = 1 << 15;

/// Both channels enabled in mark-space mode (`0x8181`).
pub const CTL_ENABLE_MS: u32 = CTL_PWEN1 | CTL_MSEN1 | CTL_PWEN2 | CTL_MSEN2;

/// PWM output channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Channel {
    /// PWM0 (GPIO12/18 alt function).
    One,
    /// PWM1 (GPIO13/19 alt function).
    #[default]
    Two,
}

impl Channel {
    #[inline]
    pub fn range_reg(self) -> usize {
        match self {
            Channel::One => reg::RNG1,
            Channel::Two => reg::RNG2,
        }
    }

    #[inline]
    pub fn data_reg(self) -> usize {
        match self {
            Channel::One => reg::DAT1,
            Channel::Two => reg::DAT2,
        }
    }
}

/// Range/data pair programmed into a channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PwmCounts {
    pub range: u32,
    pub data: u32,
}

impl PwmCounts {
    /// Counts for a requested frequency at 50% duty.
    #[inline]
    pub fn for_frequency(freq: i32) -> Self {
        let range = pwm_count(freq);
        Self {
            range,
            data: range >> 1,
        }
    }
}

/// Map a frequency in Hz to a period count.
///
/// - `freq < 1` gives the full `BASE_CLOCK_HZ` count (slowest output).
/// - `freq > 10_000` is clamped to `BASE_CLOCK_HZ / 10_000`.
/// - Otherwise `BASE_CLOCK_HZ / freq`, truncated.
#[inline]
pub fn pwm_count(freq: i32) -> u32 {
    if freq < 1 {
        return BASE_CLOCK_HZ;
    }
    if freq > MAX_FREQUENCY_HZ {
        return BASE_CLOCK_HZ / MAX_FREQUENCY_HZ as u32;
    }
    BASE_CLOCK_HZ / freq as u32
}

/// True when `pwm_count` saturates instead of dividing.
#[inline]
pub fn is_clamped(freq: i32) -> bool {
    !(1..=MAX_FREQUENCY_HZ).contains(&freq)
}

/// Wrapper around the PWM register block.
pub struct Pwm<R> {
    regs: R,
}

impl<R: RegisterRegion> Pwm<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Enable both channels in mark-space mode. Written once at startup.
    pub fn enable(&mut self) -> Result<(), Error> {
        self.regs.write32(reg::CTL, CTL_ENABLE_MS)
    }

    /// Read the control register.
    #[inline]
    pub fn control(&self) -> Result<u32, Error> {
        self.regs.read32(reg::CTL)
    }

    /// Program `channel` for `freq` Hz: one store to RNG, then one store to DAT.
    pub fn set_frequency(&mut self, channel: Channel, freq: u32) -> Result<PwmCounts, Error> {
        let counts = PwmCounts::for_frequency(i32::try_from(freq).unwrap_or(i32::MAX));
        self.regs.write32(channel.range_reg(), counts.range)?;
        self.regs.write32(channel.data_reg(), counts.data)?;
        Ok(counts)
    }

    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn free(self) -> R {
        self.regs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::MemRegion;

    #[test]
    fn count_divides_inside_the_band() {
        for f in [1, 2, 3, 7, 50, 100, 333, 1_000, 9_999, 10_000] {
            assert_eq!(pwm_count(f), 9_600_000 / f as u32, "f = {f}");
            assert!(!is_clamped(f));
        }
    }

    #[test]
    fn count_saturates_outside_the_band() {
        for f in [10_001, 20_000, i32::MAX] {
            assert_eq!(pwm_count(f), 960);
            assert!(is_clamped(f));
        }
        for f in [0, -1, -50, i32::MIN] {
            assert_eq!(pwm_count(f), 9_600_000);
            assert!(is_clamped(f));
        }
    }

    #[test]
    fn data_is_half_of_range() {
        let c = PwmCounts::for_frequency(7);
        assert_eq!(c.range, 1_371_428);
        assert_eq!(c.data, 685_714);
    }

    #[test]
    fn set_frequency_writes_range_then_data() {
        let mut pwm = Pwm::new(MemRegion::new(PWM_SPAN));
        let counts = pwm.set_frequency(Channel::Two, 50).unwrap();

        assert_eq!(counts, PwmCounts { range: 192_000, data: 96_000 });
        assert_eq!(pwm.regs().writes(), &[(reg::RNG2, 192_000), (reg::DAT2, 96_000)]);
    }

    #[test]
    fn channel_one_uses_its_own_registers() {
        let mut pwm = Pwm::new(MemRegion::new(PWM_SPAN));
        pwm.set_frequency(Channel::One, 20_000).unwrap();
        assert_eq!(pwm.regs().writes(), &[(reg::RNG1, 960), (reg::DAT1, 480)]);
    }

    #[test]
    fn huge_unsigned_frequency_is_clamped() {
        let mut pwm = Pwm::new(MemRegion::new(PWM_SPAN));
        let counts = pwm.set_frequency(Channel::Two, u32::MAX).unwrap();
        assert_eq!(counts.range, 960);
    }

    #[test]
    fn enable_writes_mark_space_word() {
        let mut pwm = Pwm::new(MemRegion::new(PWM_SPAN));
        pwm.enable().unwrap();
        assert_eq!(pwm.control().unwrap(), 0x0000_8181);
    }
}
