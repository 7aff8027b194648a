//! Kernel and file-system error types.
//!
//! Grounded on `crates/kernel/src/lib/error.rs` in the teacher: a small
//! closed `KernelError` enum plus a `Result` alias. The file system adds its
//! own sentinel-compatible status byte (spec.md sentinel overloading of
//! `0xFF`), since the original C API returns a single status byte rather
//! than a typed result.

/// Errors a kernel primitive or the file system can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// `os_init` called twice.
    AlreadyInitialized,
    /// `add_threads` given more entries than the thread table holds.
    ThreadTableFull,
    /// File number outside `[0, MAX_FILE_NUMBER]`.
    InvalidFileNumber,
    /// `file_read` addressed an empty file or a location past the chain end.
    NoData,
    /// Allocation would need a sector at or beyond the metadata sector.
    DiskFull,
    /// The flash or block layer reported a write/erase failure.
    FlashError,
}

pub type Result<T> = core::result::Result<T, KernelError>;

/// Sentinel byte shared by `FILE_EMPTY`, `SECTOR_FREE`, and every file-system
/// error status (spec.md §6, "Sentinel overloading of 0xFF").
pub const FS_ERROR: u8 = 0xFF;
/// Success status byte for the legacy single-byte file-system API.
pub const FS_OK: u8 = 0x00;

impl KernelError {
    /// Project a typed error onto the legacy single-byte status convention
    /// used by spec.md §6's `file_*` operations (0x00 success, 0xFF error).
    /// The distinct `KernelError` variants are not recoverable from the byte
    /// alone — callers that need to distinguish `DiskFull` from `NoData`
    /// must use the typed `Result` API instead.
    pub const fn as_status_byte(self) -> u8 {
        FS_ERROR
    }
}

/// Convert a `Result<T>` into the legacy status-byte convention, discarding
/// the success value (used by operations whose only output is the status,
/// e.g. `fs_flush`/`fs_mount`/`fs_format`).
pub fn status_byte<T>(r: Result<T>) -> u8 {
    match r {
        Ok(_) => FS_OK,
        Err(e) => e.as_status_byte(),
    }
}
