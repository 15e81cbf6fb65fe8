// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking delay backed by `std::thread::sleep`.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Sleeps the calling thread. Waits at least as long as requested, possibly longer.
#[derive(Copy, Clone, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
