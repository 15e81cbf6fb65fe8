// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Raspberry Pi DC Motor Driver
//!
//! This crate drives a single DC motor from a Raspberry Pi (BCM2837) by programming the GPIO, PWM
//! and clock-manager registers directly. Speed and direction come from a signed frequency written
//! as ASCII, one command per line: `"50\n"` runs forward at 50 Hz, `"-50\n"` in reverse, `"0\n"`
//! stops.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Register regions and GPIO, PWM, clock-manager wrappers |
//! | [`protocol`] | Frequency command format and parser |
//! | [`motors`] | Motor startup and per-command dispatch |
//! | `device` | Write endpoint shared between writers (`std`) |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Dry run on any host:
//!
//! ```bash
//! echo -50 | RUST_LOG=debug cargo run -- --dry-run
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[cfg(feature = "std")]
pub mod device;
pub mod hw;
pub mod motors;
pub mod protocol;
