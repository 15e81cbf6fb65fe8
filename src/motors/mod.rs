// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! Motor-level wrappers that sit above the register blocks in `hw`.
//!
//! ## Modules
//!
//! - [`dc_motor`] - DC motor driven by PWM frequency and a direction pin.

pub mod dc_motor;

pub use dc_motor::{DcMotor, Drive, Error, MotorConfig};
