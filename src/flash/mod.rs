//! Write-once flash abstraction.
//!
//! Grounded on spec.md §4.6 and
//! `examples/original_source/Flash_Access_Test/Flash_Practice.c` (which
//! exercises `Flash_Write`/`Flash_Erase`/`Flash_WriteArray`); the trait
//! shape mirrors the teacher's `block/mod.rs` `BlockDeviceOps` — a small
//! trait object behind a single registered instance, rather than a generic
//! parameter threaded through every caller, so the block layer and file
//! system can depend on `dyn FlashDevice` without a type parameter.

pub mod mock;

#[cfg(target_arch = "arm")]
pub mod tm4c123;

use crate::config::ERASE_BLOCK_SIZE;
use crate::error::{KernelError, Result};

/// A flash region that can be programmed one word at a time and erased one
/// block at a time. Implementors surface every hardware failure — unaligned
/// address, protected region, busy, verify failure — as a single
/// `KernelError::FlashError` (spec.md §4.6: "the file system does not
/// distinguish them").
pub trait FlashDevice {
    /// One-time prepare; a no-op on targets that need no clock setup
    /// (spec.md §4.6).
    fn init(&mut self, clock_frequency: u32) -> Result<()>;

    /// Program a 32-bit word at a word-aligned address. Write-once between
    /// erasures: only 1→0 bit transitions are legal.
    fn write(&mut self, addr: usize, word: u32) -> Result<()>;

    /// Erase the 1 KiB block containing `addr`; every bit in the block
    /// becomes 1.
    fn erase_block(&mut self, addr: usize) -> Result<()>;

    /// Byte-read `len` bytes starting at `addr`. Flash is memory-mapped and
    /// byte-readable at all times (spec.md §4.7).
    fn read(&self, addr: usize, out: &mut [u8]);

    /// Program `data` starting at `addr`, one word at a time, stopping (and
    /// reporting error) at the first failing word — supplemented from
    /// `Flash_WriteArray` in the original source, which this crate's
    /// `block` layer uses internally instead of hand-rolling the same word
    /// loop at each call site.
    fn write_array(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        if addr % 4 != 0 {
            return Err(KernelError::FlashError);
        }
        for (i, chunk) in data.chunks(4).enumerate() {
            let mut word_bytes = [0u8; 4];
            word_bytes[..chunk.len()].copy_from_slice(chunk);
            let word = u32::from_le_bytes(word_bytes);
            self.write(addr + i * 4, word)?;
        }
        Ok(())
    }
}

/// Round `addr` down to its containing erase-block boundary.
pub const fn block_start(addr: usize) -> usize {
    addr - (addr % ERASE_BLOCK_SIZE)
}
