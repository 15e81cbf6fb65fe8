// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PWM clock bring-up through the BCM283x clock manager.
//!
//! Every write to a clock manager register must carry the password `0x5A` in its top byte or the
//! hardware ignores it. The divisor of a running clock must not be changed: the clock is killed,
//! allowed to stop, given its new divisor, re-enabled, and allowed to settle again.

use embedded_hal::delay::DelayNs;
use tracing::debug;

use super::region::{Error, RegisterRegion};

/// Size of the mapped clock manager block.
pub const CLOCK_SPAN: usize = 0x100;

/// Crystal oscillator feeding clock source 1.
pub const OSCILLATOR_HZ: u32 = 19_200_000;

// Register offsets
pub mod reg {
    /// PWM clock control.
    pub const CM_PWMCTL: usize = 0xA0;
    /// PWM clock divisor.
    pub const CM_PWMDIV: usize = 0xA4;
}

pub const PASSWORD: u32 = 0x5A << 24;
pub const CTL_ENAB: u32 = 1 << 4;
pub const CTL_KILL: u32 = 1 << 5;
pub const DIV_DIVI_SHIFT: u32 = 12;

/// Clock generator source (CM_CTL `SRC` field).
#[repr(u32)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ClockSource {
    Gnd = 0,
    #[default]
    Oscillator = 1,
    TestDebug0 = 2,
    TestDebug1 = 3,
    PllA = 4,
    PllC = 5,
    PllD = 6,
    HdmiAux = 7,
}

/// Clock bring-up parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClockConfig {
    pub source: ClockSource,
    /// Integer divisor (DIVI), 1..=4095.
    pub divisor: u32,
    /// Settle time after killing and after enabling the clock, in microseconds.
    pub settle_us: u32,
}

impl Default for ClockConfig {
    /// 19.2 MHz oscillator / 2 = 9.6 MHz, 1 ms settle.
    fn default() -> Self {
        Self {
            source: ClockSource::Oscillator,
            divisor: 2,
            settle_us: 1_000,
        }
    }
}

impl ClockConfig {
    /// Output rate when the source is the oscillator; `None` for other sources.
    pub fn output_hz(&self) -> Option<u32> {
        match self.source {
            ClockSource::Oscillator if self.divisor != 0 => Some(OSCILLATOR_HZ / self.divisor),
            _ => None,
        }
    }

    /// Control word that kills the generator.
    #[inline]
    pub fn kill_word(&self) -> u32 {
        PASSWORD | CTL_KILL
    }

    /// Divisor word for CM_PWMDIV.
    #[inline]
    pub fn divisor_word(&self) -> u32 {
        PASSWORD | (self.divisor << DIV_DIVI_SHIFT)
    }

    /// Control word that enables the generator on the chosen source.
    #[inline]
    pub fn enable_word(&self) -> u32 {
        PASSWORD | CTL_ENAB | self.source as u32
    }
}

/// Wrapper around the clock manager register block.
pub struct PwmClock<R> {
    regs: R,
}

impl<R: RegisterRegion> PwmClock<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Bring up the PWM clock.
    ///
    /// Sequence: kill, settle, divisor, enable, settle. Blocks for two settle periods; call once
    /// during initialization, never from the command path.
    pub fn init<D: DelayNs>(&mut self, cfg: &ClockConfig, delay: &mut D) -> Result<(), Error> {
        if !(1..=0xFFF).contains(&cfg.divisor) {
            return Err(Error::InvalidDivisor(cfg.divisor));
        }

        self.regs.write32(reg::CM_PWMCTL, cfg.kill_word())?;
        delay.delay_us(cfg.settle_us);

        self.regs.write32(reg::CM_PWMDIV, cfg.divisor_word())?;
        self.regs.write32(reg::CM_PWMCTL, cfg.enable_word())?;
        delay.delay_us(cfg.settle_us);

        debug!(
            source = ?cfg.source,
            divisor = cfg.divisor,
            "PWM clock enabled"
        );
        Ok(())
    }

    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn free(self) -> R {
        self.regs
    }
}
