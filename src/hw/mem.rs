// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory register region.
//!
//! Backs a register span with plain words and records every store in order. Used for dry runs of
//! the full write path on a host without peripherals, and by the unit tests.

use alloc::vec;
use alloc::vec::Vec;

use super::region::{check_access, Error, RegisterRegion};

/// Register span stored in RAM, with an ordered log of writes.
#[derive(Debug, Clone)]
pub struct MemRegion {
    words: Vec<u32>,
    writes: Vec<(usize, u32)>,
}

impl MemRegion {
    /// Create a zero-filled region of `len` bytes (rounded down to whole words).
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len / 4],
            writes: Vec::new(),
        }
    }

    /// Preload a register without recording it as a write.
    pub fn preload(&mut self, offset: usize, value: u32) -> Result<(), Error> {
        check_access(offset, self.len())?;
        self.words[offset / 4] = value;
        Ok(())
    }

    /// Every write issued so far, as `(offset, value)` in program order.
    #[inline]
    pub fn writes(&self) -> &[(usize, u32)] {
        &self.writes
    }

    /// Writes that targeted a single register, oldest first.
    pub fn writes_to(&self, offset: usize) -> impl Iterator<Item = u32> + '_ {
        self.writes
            .iter()
            .filter(move |(o, _)| *o == offset)
            .map(|(_, v)| *v)
    }

    /// Forget the write log, keeping register contents.
    pub fn clear_log(&mut self) {
        self.writes.clear();
    }
}

impl RegisterRegion for MemRegion {
    #[inline]
    fn len(&self) -> usize {
        self.words.len() * 4
    }

    fn read32(&self, offset: usize) -> Result<u32, Error> {
        check_access(offset, self.len())?;
        Ok(self.words[offset / 4])
    }

    fn write32(&mut self, offset: usize, value: u32) -> Result<(), Error> {
        check_access(offset, self.len())?;
        self.words[offset / 4] = value;
        self.writes.push((offset, value));
        Ok(())
    }
}
