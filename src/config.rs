//! Fixed sizing constants.
//!
//! Spec.md leaves these as implementation defaults (`NUMTHREADS`,
//! `STACKSIZE`, FIFO capacity, disk geometry) rather than runtime
//! configuration — "no CLI, no configuration file, no environment
//! variables" (spec.md §6). Following the teacher's habit of expressing
//! sizing through `const` parameters rather than a config struct (e.g.
//! `RingBuffer<T, const N: usize>`, `Spsc<T, const N: usize>` in
//! `crates/kernel/src/channel/spsc.rs`), every size below is a `const` the
//! application can override by enabling the `large-stack` feature, rather
//! than a value read at boot.

/// Maximum number of threads the scheduler supports (spec.md default: 3).
pub const NUM_THREADS: usize = 3;

/// Words per thread stack. Spec.md documents a 100-word default and a
/// 256-word variant; `large-stack` selects the latter.
#[cfg(not(feature = "large-stack"))]
pub const STACK_WORDS: usize = 100;
#[cfg(feature = "large-stack")]
pub const STACK_WORDS: usize = 256;

/// FIFO capacity (spec.md §4.4 default: 10).
pub const FIFO_CAPACITY: usize = 10;

/// Sector size in bytes (spec.md §3, fixed at 512).
pub const SECTOR_SIZE: usize = 512;

/// Number of sectors in the disk (spec.md §3 default: 256).
pub const NUM_SECTORS: usize = 256;

/// Directory size in entries (spec.md §3 default: 256, one per file number).
pub const DIRECTORY_SIZE: usize = 256;

/// FAT size in entries (spec.md §3 default: 256, one per sector).
pub const FAT_SIZE: usize = 256;

/// Index of the sector reserved for persisted directory+FAT metadata.
pub const METADATA_SECTOR: usize = NUM_SECTORS - 1;

/// Largest legal file number (spec.md §6: `MAX_FILE_NUMBER = 254`).
pub const MAX_FILE_NUMBER: u8 = (METADATA_SECTOR - 1) as u8;

/// Sentinel meaning "no sectors"/"end of chain" (spec.md §6: `0xFF`, shared
/// by `FILE_EMPTY` and `SECTOR_FREE`).
pub const FILE_EMPTY: u8 = 0xFF;
pub const SECTOR_FREE: u8 = 0xFF;

/// Default flash region backing the disk (spec.md §6).
pub const DISK_START: usize = 0x0002_0000;
pub const DISK_END: usize = DISK_START + NUM_SECTORS * SECTOR_SIZE;

/// Flash block-erase granularity (spec.md §4.6: 1 KiB).
pub const ERASE_BLOCK_SIZE: usize = 1024;
