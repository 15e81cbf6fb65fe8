// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hardware context: the three register blocks the motor driver programs.
//!
//! A `Peripherals` value only exists once all three regions are available, so nothing downstream
//! can touch a block that failed to map.

use super::clock::{PwmClock, CLOCK_SPAN};
use super::gpio::{Gpio, GPIO_SPAN};
use super::mem::MemRegion;
use super::pwm::{Pwm, PWM_SPAN};
use super::region::RegisterRegion;

/// BCM2837 peripheral base (Pi 2 v1.2, Pi 3, Pi Zero 2 W).
pub const PERIPHERAL_BASE: u64 = 0x3F00_0000;

pub const GPIO_OFFSET: u64 = 0x0020_0000;
pub const PWM_OFFSET: u64 = 0x0020_C000;
pub const CLOCK_OFFSET: u64 = 0x0010_1000;

/// GPIO, PWM and clock-manager blocks.
pub struct Peripherals<R> {
    pub gpio: Gpio<R>,
    pub pwm: Pwm<R>,
    pub clock: PwmClock<R>,
}

impl<R: RegisterRegion> Peripherals<R> {
    pub fn new(gpio: R, pwm: R, clock: R) -> Self {
        Self {
            gpio: Gpio::new(gpio),
            pwm: Pwm::new(pwm),
            clock: PwmClock::new(clock),
        }
    }
}

#[cfg(feature = "std")]
impl Peripherals<super::mmap::MmapRegion> {
    /// Map all three blocks relative to a peripheral base address.
    ///
    /// Fails on the first region that cannot be mapped; regions already mapped are released.
    pub fn map(base: u64) -> Result<Self, super::Error> {
        use super::mmap::MmapRegion;

        let gpio = MmapRegion::map(base + GPIO_OFFSET, GPIO_SPAN)?;
        let pwm = MmapRegion::map(base + PWM_OFFSET, PWM_SPAN)?;
        let clock = MmapRegion::map(base + CLOCK_OFFSET, CLOCK_SPAN)?;
        Ok(Self::new(gpio, pwm, clock))
    }
}

impl Peripherals<MemRegion> {
    /// In-memory stand-ins with the real block sizes.
    pub fn simulated() -> Self {
        Self::new(
            MemRegion::new(GPIO_SPAN),
            MemRegion::new(PWM_SPAN),
            MemRegion::new(CLOCK_SPAN),
        )
    }
}
