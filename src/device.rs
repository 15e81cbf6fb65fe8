// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared write endpoint for the motor.
//!
//! Behaves like a write-only character device: each `write` handles one command and reports how
//! many bytes it used, so a writer loops until its buffer is drained. Concurrent writers are
//! serialized per command; their commands may interleave but never tear.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::hw::RegisterRegion;
use crate::motors::{DcMotor, Error};

pub struct MotorDevice<R> {
    motor: Mutex<DcMotor<R>>,
}

impl<R: RegisterRegion> MotorDevice<R> {
    pub fn new(motor: DcMotor<R>) -> Self {
        Self {
            motor: Mutex::new(motor),
        }
    }

    // A writer that panicked mid-command leaves the registers in a valid state; keep serving.
    fn lock(&self) -> MutexGuard<'_, DcMotor<R>> {
        self.motor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle a single command from `buf`. Returns the bytes consumed.
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let consumed = self.lock().on_write(buf, buf.len())?;
        trace!(len = buf.len(), consumed, "write");
        Ok(consumed)
    }

    /// Feed every command in `buf`. Returns the number of commands handled.
    pub fn write_all(&self, mut buf: &[u8]) -> Result<usize, Error> {
        let mut commands = 0;
        while !buf.is_empty() {
            let consumed = self.write(buf)?;
            if consumed == 0 {
                break;
            }
            buf = &buf[consumed..];
            commands += 1;
        }
        Ok(commands)
    }

    pub fn stop(&self) -> Result<(), Error> {
        self.lock().stop()
    }

    /// Run `f` with exclusive access to the motor.
    pub fn with_motor<T>(&self, f: impl FnOnce(&mut DcMotor<R>) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn into_inner(self) -> DcMotor<R> {
        self.motor
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
