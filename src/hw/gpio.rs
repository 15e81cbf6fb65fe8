// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO function select and output control for the BCM283x GPIO block.
//!
//! Each pin has a 3-bit function field; ten fields are packed into each `GPFSELn` register, so
//! changing one pin is a read-modify-write that must leave the other nine untouched.

use super::region::{Error, RegisterRegion};

/// Size of the mapped GPIO block.
pub const GPIO_SPAN: usize = 0xA0;

/// Number of BCM GPIO pins (0..=53).
pub const PIN_COUNT: u8 = 54;

// Register offsets
pub mod reg {
    /// Function select, GPIO 0-9. `GPFSELn` lives at `GPFSEL0 + 4 * n`.
    pub const GPFSEL0: usize = 0x00;
    /// Output set, GPIO 0-31.
    pub const GPSET0: usize = 0x1C;
    /// Output set, GPIO 32-53.
    pub const GPSET1: usize = 0x20;
    /// Output clear, GPIO 0-31.
    pub const GPCLR0: usize = 0x28;
    /// Output clear, GPIO 32-53.
    pub const GPCLR1: usize = 0x2C;
    /// Pin level, GPIO 0-31.
    pub const GPLEV0: usize = 0x34;
    /// Pin level, GPIO 32-53.
    pub const GPLEV1: usize = 0x38;
}

/// GPIO function select values (3 bits each).
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GpioFunction {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl GpioFunction {
    /// Decode a 3-bit function field. Every value is a valid function.
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0b000 => GpioFunction::Input,
            0b001 => GpioFunction::Output,
            0b100 => GpioFunction::Alt0,
            0b101 => GpioFunction::Alt1,
            0b110 => GpioFunction::Alt2,
            0b111 => GpioFunction::Alt3,
            0b011 => GpioFunction::Alt4,
            _ => GpioFunction::Alt5,
        }
    }
}

/// Location of a pin's function field: register offset, bit shift, and clear mask.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FselField {
    pub offset: usize,
    pub shift: u32,
    pub mask: u32,
}

impl FselField {
    /// Compute the field for `pin`, rejecting pins past GPIO53.
    pub fn for_pin(pin: u8) -> Result<Self, Error> {
        check_pin(pin)?;
        let index = (pin / 10) as usize;
        let shift = (pin % 10) as u32 * 3;
        Ok(Self {
            offset: reg::GPFSEL0 + index * 4,
            shift,
            mask: !(0b111 << shift),
        })
    }
}

#[inline]
fn check_pin(pin: u8) -> Result<(), Error> {
    if pin < PIN_COUNT {
        Ok(())
    } else {
        Err(Error::InvalidPin(pin))
    }
}

/// Bank register and bit for the 32-pin set/clear/level registers.
#[inline]
fn bank(pin: u8, low: usize, high: usize) -> Result<(usize, u32), Error> {
    check_pin(pin)?;
    if pin < 32 {
        Ok((low, 1 << pin))
    } else {
        Ok((high, 1 << (pin - 32)))
    }
}

/// Wrapper around the GPIO register block.
pub struct Gpio<R> {
    regs: R,
}

impl<R: RegisterRegion> Gpio<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Select the function of a single pin, preserving the other fields in its `GPFSELn`.
    pub fn set_function(&mut self, pin: u8, function: GpioFunction) -> Result<(), Error> {
        let field = FselField::for_pin(pin)?;
        let val = self.regs.read32(field.offset)?;
        self.regs
            .write32(field.offset, (val & field.mask) | ((function as u32) << field.shift))
    }

    /// Read back the current function of a pin.
    pub fn function(&self, pin: u8) -> Result<GpioFunction, Error> {
        let field = FselField::for_pin(pin)?;
        let val = self.regs.read32(field.offset)?;
        Ok(GpioFunction::from_bits(val >> field.shift))
    }

    /// Drive a pin high through `GPSETn`.
    pub fn set_high(&mut self, pin: u8) -> Result<(), Error> {
        let (offset, bit) = bank(pin, reg::GPSET0, reg::GPSET1)?;
        self.regs.write32(offset, bit)
    }

    /// Drive a pin low through `GPCLRn`.
    pub fn set_low(&mut self, pin: u8) -> Result<(), Error> {
        let (offset, bit) = bank(pin, reg::GPCLR0, reg::GPCLR1)?;
        self.regs.write32(offset, bit)
    }

    /// Read the level of a pin from `GPLEVn`.
    pub fn level(&self, pin: u8) -> Result<bool, Error> {
        let (offset, bit) = bank(pin, reg::GPLEV0, reg::GPLEV1)?;
        Ok(self.regs.read32(offset)? & bit != 0)
    }

    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn free(self) -> R {
        self.regs
    }
}
