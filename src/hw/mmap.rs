// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register regions mapped from `/dev/mem`.
//!
//! The process needs read/write access to the memory device (normally root). Physical addresses
//! are the ARM-side peripheral addresses, e.g. `0x3F20_0000` for GPIO on a BCM2837.

use std::fmt::{Debug, Formatter};
use std::fs::OpenOptions;
use std::path::Path;

use memmap2::{MmapOptions, MmapRaw};
use tracing::debug;

use super::region::{check_access, Error, RegisterRegion};

/// Default memory device.
pub const DEV_MEM: &str = "/dev/mem";

/// A physical register span mapped into the process.
pub struct MmapRegion {
    map: MmapRaw,
    base: u64,
    len: usize,
}

impl MmapRegion {
    /// Map `len` bytes of physical memory starting at `base` through `/dev/mem`.
    pub fn map(base: u64, len: usize) -> Result<Self, Error> {
        Self::map_path(DEV_MEM, base, len)
    }

    /// Map `len` bytes at offset `base` of an arbitrary memory device or file.
    pub fn map_path<P: AsRef<Path>>(path: P, base: u64, len: usize) -> Result<Self, Error> {
        let file = OpenOptions::new().read(true).write(true).open(path.as_ref())?;

        let map = MmapOptions::new().offset(base).len(len).map_raw(&file)?;

        debug!(base = format_args!("{base:#010x}"), len, "mapped register region");

        Ok(Self { map, base, len })
    }

    /// Physical base address of the span.
    #[inline]
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl Debug for MmapRegion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MmapRegion({:#010x}, {:#x} bytes @ {:?})",
            self.base,
            self.len,
            self.map.as_ptr()
        )
    }
}

impl RegisterRegion for MmapRegion {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn read32(&self, offset: usize) -> Result<u32, Error> {
        check_access(offset, self.len)?;
        // SAFETY: offset is word aligned and inside the mapping, which lives as long as `self`.
        let value = unsafe { (self.map.as_ptr().add(offset) as *const u32).read_volatile() };
        Ok(value)
    }

    fn write32(&mut self, offset: usize, value: u32) -> Result<(), Error> {
        check_access(offset, self.len)?;
        // SAFETY: as above; `&mut self` serializes stores through this handle.
        unsafe { (self.map.as_mut_ptr().add(offset) as *mut u32).write_volatile(value) };
        Ok(())
    }
}
