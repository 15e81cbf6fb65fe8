// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin assignment for the motor driver board.

/// BCM pin driving the H-bridge direction input.
pub const MOTOR_DIR_PIN: u8 = 24;

/// BCM pin carrying the PWM output (GPIO13, alt0 = PWM1 / channel 2).
pub const PWM_CLOCK_PIN: u8 = 13;

/// Pins used by a single DC motor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MotorPins {
    /// Direction output; high = forward, low = reverse.
    pub direction: u8,
    /// PWM output pin, switched between alt0 (running) and plain output (stopped).
    pub pwm: u8,
}

impl Default for MotorPins {
    fn default() -> Self {
        Self {
            direction: MOTOR_DIR_PIN,
            pwm: PWM_CLOCK_PIN,
        }
    }
}
