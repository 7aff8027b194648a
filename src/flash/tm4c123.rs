//! TM4C123-style on-chip flash controller, matching the target the original
//! source (`examples/original_source/Flash_Access_Test/Flash_Practice.c`)
//! was written for. Register layout follows the part's Flash Memory
//! Control block: `FMA` (address), `FMD` (data), `FMC` (command, gated by
//! the `WRKEY`), `FCRIS` (raw interrupt/status).

use super::FlashDevice;
use crate::error::{KernelError, Result};
use bitflags::bitflags;

const FLASH_BASE: usize = 0x400F_D000;
const FMA: usize = FLASH_BASE;
const FMD: usize = FLASH_BASE + 0x004;
const FMC: usize = FLASH_BASE + 0x008;
const FCRIS: usize = FLASH_BASE + 0x00C;

/// Unlock key that must accompany every write to `FMC` (upper halfword),
/// ORed in with the command bits below.
const FMC_WRKEY: u32 = 0xA442_0000;

bitflags! {
    /// Command bits written to `FMC` alongside `FMC_WRKEY`. The register
    /// self-clears each bit when the corresponding operation completes.
    #[derive(Clone, Copy, PartialEq, Eq)]
    struct FlashCommand: u32 {
        const WRITE = 1 << 0;
        const ERASE = 1 << 1;
    }
}

bitflags! {
    /// Raw interrupt/status bits read from `FCRIS`.
    #[derive(Clone, Copy, PartialEq, Eq)]
    struct RawStatus: u32 {
        /// Set when the last command addressed a protected/invalid region.
        const ACCESS = 1 << 1;
    }
}

unsafe fn write_volatile(addr: usize, value: u32) {
    (addr as *mut u32).write_volatile(value)
}

unsafe fn read_volatile(addr: usize) -> u32 {
    (addr as *const u32).read_volatile()
}

pub struct Tm4c123Flash;

impl Tm4c123Flash {
    pub const fn new() -> Self {
        Self
    }

    fn wait_and_check(&self) -> Result<()> {
        // The command register self-clears the WRITE/ERASE bit when the
        // operation completes; a real driver would also bound this with a
        // timeout, left to the board-bringup layer per spec.md §1's
        // out-of-scope boundary.
        unsafe {
            while FlashCommand::from_bits_truncate(read_volatile(FMC))
                .intersects(FlashCommand::WRITE | FlashCommand::ERASE)
            {}
            if RawStatus::from_bits_truncate(read_volatile(FCRIS)).contains(RawStatus::ACCESS) {
                write_volatile(FCRIS, RawStatus::ACCESS.bits());
                return Err(KernelError::FlashError);
            }
        }
        Ok(())
    }
}

impl FlashDevice for Tm4c123Flash {
    fn init(&mut self, _clock_frequency: u32) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, addr: usize, word: u32) -> Result<()> {
        if addr % 4 != 0 {
            return Err(KernelError::FlashError);
        }
        unsafe {
            write_volatile(FMA, addr as u32);
            write_volatile(FMD, word);
            write_volatile(FMC, FMC_WRKEY | FlashCommand::WRITE.bits());
        }
        self.wait_and_check()
    }

    fn erase_block(&mut self, addr: usize) -> Result<()> {
        unsafe {
            write_volatile(FMA, super::block_start(addr) as u32);
            write_volatile(FMC, FMC_WRKEY | FlashCommand::ERASE.bits());
        }
        self.wait_and_check()
    }

    fn read(&self, addr: usize, out: &mut [u8]) {
        // Flash is memory-mapped and byte-readable (spec.md §4.7).
        unsafe {
            core::ptr::copy_nonoverlapping(addr as *const u8, out.as_mut_ptr(), out.len());
        }
    }
}
