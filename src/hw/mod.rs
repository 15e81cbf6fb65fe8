// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Register-Level Hardware Layer
//!
//! Thin wrappers around the BCM283x GPIO, PWM and clock-manager register blocks, plus the region
//! backends they run on.
//!
//! - [`region`] – `RegisterRegion` contract and bounds checking
//! - [`mmap`] – regions mapped from `/dev/mem` (`std`)
//! - [`mem`] – in-memory regions with a write log
//! - [`gpio`], [`pwm`], [`clock`] – per-block register access
//! - [`peripherals`] – the three blocks bundled into one hardware context

pub mod clock;
#[cfg(feature = "std")]
pub mod delay;
pub mod gpio;
pub mod mem;
#[cfg(feature = "std")]
pub mod mmap;
pub mod peripherals;
pub mod pins;
pub mod pwm;
pub mod region;

pub use clock::{ClockConfig, ClockSource, PwmClock};
#[cfg(feature = "std")]
pub use delay::StdDelay;
pub use gpio::{Gpio, GpioFunction};
pub use mem::MemRegion;
#[cfg(feature = "std")]
pub use mmap::MmapRegion;
pub use peripherals::{Peripherals, PERIPHERAL_BASE};
pub use pins::MotorPins;
pub use pwm::{Channel, Pwm, PwmCounts};
pub use region::{Error, RegisterRegion};
