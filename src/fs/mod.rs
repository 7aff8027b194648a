//! Write-once FAT-style file system.
//!
//! Grounded on spec.md §3, §4.8, §4.9; `original_source`'s
//! `Simple_File_System/OS_File_System.c` carries no real logic (just
//! includes), so the allocation policy, chain-walk guards, and persisted
//! layout below are derived directly from spec.md. Structurally this
//! follows the teacher's habit of giving each subsystem one owning struct
//! with `&mut self` operations (`block/mod.rs`'s `BlockDevice`) rather than
//! free functions over hidden global state, since unlike the scheduler a
//! file system instance is meant to be parameterized over a `BlockDevice`
//! rather than singleton-owned.

use crate::block::BlockDevice;
use crate::config::{
    DIRECTORY_SIZE, FAT_SIZE, FILE_EMPTY, MAX_FILE_NUMBER, METADATA_SECTOR, NUM_SECTORS,
    SECTOR_FREE, SECTOR_SIZE,
};
use crate::error::{KernelError, Result};

pub struct FileSystem<'a, 'b> {
    block: &'a mut BlockDevice<'b>,
    directory: [u8; DIRECTORY_SIZE],
    fat: [u8; FAT_SIZE],
}

impl<'a, 'b> FileSystem<'a, 'b> {
    /// `fs_init()` (spec.md §4.8): fill RAM directory and FAT with `0xFF`.
    pub fn new(block: &'a mut BlockDevice<'b>) -> Self {
        Self {
            block,
            directory: [FILE_EMPTY; DIRECTORY_SIZE],
            fat: [SECTOR_FREE; FAT_SIZE],
        }
    }

    fn fs_init(&mut self) {
        self.directory = [FILE_EMPTY; DIRECTORY_SIZE];
        self.fat = [SECTOR_FREE; FAT_SIZE];
    }

    /// `find_free_sector()` (spec.md §4.8's allocation policy): one past
    /// the highest sector in use by any file, or 0 if no file has any
    /// sectors. Monotonically increasing allocation is what keeps chains
    /// acyclic without a free-sector bitmap.
    fn find_free_sector(&self) -> usize {
        let mut high_water: Option<usize> = None;
        for &head in self.directory.iter() {
            if head == FILE_EMPTY {
                continue;
            }
            let mut sector = head as usize;
            let mut steps = 0;
            loop {
                high_water = Some(high_water.map_or(sector, |h| h.max(sector)));
                let next = self.fat[sector];
                if next == SECTOR_FREE {
                    break;
                }
                sector = next as usize;
                steps += 1;
                if steps >= NUM_SECTORS {
                    break;
                }
            }
        }
        high_water.map_or(0, |h| h + 1)
    }

    /// `file_new() -> Option<u8>` (spec.md §4.8): lowest empty directory
    /// slot, provided the disk still has room to eventually hold a sector
    /// for it. Does not mutate the directory — an empty file has no chain
    /// yet.
    pub fn file_new(&mut self) -> Result<u8> {
        if self.find_free_sector() >= METADATA_SECTOR {
            return Err(KernelError::DiskFull);
        }
        for num in 0..=MAX_FILE_NUMBER {
            if self.directory[num as usize] == FILE_EMPTY {
                return Ok(num);
            }
        }
        Err(KernelError::DiskFull)
    }

    /// `file_size(num) -> u8` (spec.md §4.8): sector count along the
    /// chain. A cycle (corrupted FAT) is reported as size 0 rather than
    /// looping forever (spec.md §4.9, §7).
    pub fn file_size(&self, num: u8) -> u8 {
        if num as usize >= DIRECTORY_SIZE {
            return 0;
        }
        let head = self.directory[num as usize];
        if head == FILE_EMPTY {
            return 0;
        }
        let mut sector = head;
        let mut count: u32 = 0;
        for _ in 0..NUM_SECTORS {
            count += 1;
            let next = self.fat[sector as usize];
            if next == SECTOR_FREE {
                return count as u8;
            }
            sector = next;
        }
        // Walked NUM_SECTORS hops without terminating: a cycle.
        0
    }

    /// `file_append(num, buf)` (spec.md §4.8).
    pub fn file_append(&mut self, num: u8, buf: &[u8; SECTOR_SIZE]) -> Result<()> {
        if num > MAX_FILE_NUMBER {
            return Err(KernelError::InvalidFileNumber);
        }
        let s = self.find_free_sector();
        if s >= METADATA_SECTOR {
            return Err(KernelError::DiskFull);
        }
        self.block.write_sector(buf, s)?;
        self.append_fat(num, s as u8);
        Ok(())
    }

    /// Link sector `s` to the end of file `num`'s chain (spec.md §4.8
    /// `append_fat`).
    fn append_fat(&mut self, num: u8, s: u8) {
        self.fat[s as usize] = SECTOR_FREE;
        if self.directory[num as usize] == FILE_EMPTY {
            self.directory[num as usize] = s;
        } else {
            let mut end = self.directory[num as usize];
            while self.fat[end as usize] != SECTOR_FREE {
                end = self.fat[end as usize];
            }
            self.fat[end as usize] = s;
        }
    }

    /// `file_read(num, location, buf)` (spec.md §4.8).
    pub fn file_read(&mut self, num: u8, location: u8, buf: &mut [u8; SECTOR_SIZE]) -> Result<()> {
        if num as usize >= DIRECTORY_SIZE || self.directory[num as usize] == FILE_EMPTY {
            return Err(KernelError::NoData);
        }
        let mut sector = self.directory[num as usize];
        for _ in 0..location {
            if sector == SECTOR_FREE {
                return Err(KernelError::NoData);
            }
            let next = self.fat[sector as usize];
            if next == SECTOR_FREE {
                return Err(KernelError::NoData);
            }
            sector = next;
        }
        self.block.read_sector(buf, sector as usize)
    }

    /// `fs_flush()` (spec.md §4.8, §9): pack directory+FAT into one sector
    /// and write it to `METADATA_SECTOR`. Write-once: the sector must
    /// already be blank, matching the design note's option (b) — reject
    /// rather than silently erase, since an implicit erase-before-flush
    /// would hide the power-loss window spec.md calls out. Callers that
    /// need to re-flush must `fs_format` first.
    pub fn fs_flush(&mut self) -> Result<()> {
        let mut meta = [0u8; SECTOR_SIZE];
        meta[..DIRECTORY_SIZE].copy_from_slice(&self.directory);
        meta[DIRECTORY_SIZE..DIRECTORY_SIZE + FAT_SIZE].copy_from_slice(&self.fat);
        self.block.write_sector(&meta, METADATA_SECTOR)
    }

    /// `fs_mount()` (spec.md §4.8): read the metadata sector and unpack it
    /// into RAM directory and FAT.
    pub fn fs_mount(&mut self) -> Result<()> {
        let mut meta = [0u8; SECTOR_SIZE];
        self.block.read_sector(&mut meta, METADATA_SECTOR)?;
        self.directory.copy_from_slice(&meta[..DIRECTORY_SIZE]);
        self.fat
            .copy_from_slice(&meta[DIRECTORY_SIZE..DIRECTORY_SIZE + FAT_SIZE]);
        Ok(())
    }

    /// `fs_format()` (spec.md §4.8): erase every 1 KiB block across the
    /// disk, then re-run `fs_init`.
    pub fn fs_format(&mut self) -> Result<()> {
        let mut sector = 0;
        while sector < NUM_SECTORS {
            self.block.erase_sector_block(sector)?;
            sector += crate::config::ERASE_BLOCK_SIZE / SECTOR_SIZE;
        }
        self.fs_init();
        Ok(())
    }
}

/// Legacy single-byte status wrappers matching spec.md §6's external
/// interface (`0x00` success, `0xFF` error) for callers ported from the
/// original C API.
pub mod legacy {
    use super::FileSystem;
    use crate::config::SECTOR_SIZE;
    use crate::error::{status_byte, FS_ERROR};

    pub fn file_new(fs: &mut FileSystem<'_, '_>) -> u8 {
        fs.file_new().unwrap_or(FS_ERROR)
    }

    pub fn file_append(fs: &mut FileSystem<'_, '_>, num: u8, buf: &[u8; SECTOR_SIZE]) -> u8 {
        status_byte(fs.file_append(num, buf))
    }

    pub fn file_read(
        fs: &mut FileSystem<'_, '_>,
        num: u8,
        location: u8,
        buf: &mut [u8; SECTOR_SIZE],
    ) -> u8 {
        status_byte(fs.file_read(num, location, buf))
    }

    pub fn fs_flush(fs: &mut FileSystem<'_, '_>) -> u8 {
        status_byte(fs.fs_flush())
    }

    pub fn fs_mount(fs: &mut FileSystem<'_, '_>) -> u8 {
        status_byte(fs.fs_mount())
    }

    pub fn fs_format(fs: &mut FileSystem<'_, '_>) -> u8 {
        status_byte(fs.fs_format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockDevice, Config};
    use crate::config::DISK_START;
    use crate::flash::mock::MockFlash;

    fn new_disk() -> MockFlash<{ NUM_SECTORS * SECTOR_SIZE }> {
        MockFlash::new(DISK_START)
    }

    #[test]
    fn append_and_read_back_two_sectors() {
        // Scenario 4 from spec.md §8.
        let mut flash = new_disk();
        let mut block = BlockDevice::new(&mut flash, Config::default());
        let mut fs = FileSystem::new(&mut block);
        fs.fs_format().unwrap();

        let a = fs.file_new().unwrap();
        assert_eq!(a, 0);
        fs.file_append(a, &[0xAA; SECTOR_SIZE]).unwrap();
        fs.file_append(a, &[0xBB; SECTOR_SIZE]).unwrap();
        assert_eq!(fs.file_size(a), 2);

        let mut out = [0u8; SECTOR_SIZE];
        fs.file_read(a, 0, &mut out).unwrap();
        assert_eq!(out, [0xAA; SECTOR_SIZE]);
        fs.file_read(a, 1, &mut out).unwrap();
        assert_eq!(out, [0xBB; SECTOR_SIZE]);
        assert!(fs.file_read(a, 2, &mut out).is_err());
    }

    #[test]
    fn interleaved_files_stay_monotone_and_disjoint() {
        // Scenario 5 from spec.md §8.
        let mut flash = new_disk();
        let mut block = BlockDevice::new(&mut flash, Config::default());
        let mut fs = FileSystem::new(&mut block);
        fs.fs_format().unwrap();

        let a = fs.file_new().unwrap();
        let b = fs.file_new().unwrap();
        assert_ne!(a, b);

        fs.file_append(a, &[1; SECTOR_SIZE]).unwrap(); // sector 0
        fs.file_append(b, &[2; SECTOR_SIZE]).unwrap(); // sector 1
        fs.file_append(a, &[3; SECTOR_SIZE]).unwrap(); // sector 2

        assert_eq!(fs.file_size(a), 2);
        assert_eq!(fs.file_size(b), 1);
        assert_eq!(fs.directory[a as usize], 0);
        assert_eq!(fs.fat[0], 2);
        assert_eq!(fs.fat[2], SECTOR_FREE);
        assert_eq!(fs.directory[b as usize], 1);
        assert_eq!(fs.fat[1], SECTOR_FREE);
    }

    #[test]
    fn flush_then_mount_round_trips() {
        // Scenario 6 from spec.md §8.
        let mut flash = new_disk();
        let mut block = BlockDevice::new(&mut flash, Config::default());
        let mut fs = FileSystem::new(&mut block);
        fs.fs_format().unwrap();

        let a = fs.file_new().unwrap();
        let b = fs.file_new().unwrap();
        fs.file_append(a, &[1; SECTOR_SIZE]).unwrap();
        fs.file_append(b, &[2; SECTOR_SIZE]).unwrap();
        fs.file_append(a, &[3; SECTOR_SIZE]).unwrap();

        fs.fs_flush().unwrap();
        let expected_directory = fs.directory;
        let expected_fat = fs.fat;

        fs.directory = [FILE_EMPTY; DIRECTORY_SIZE];
        fs.fat = [SECTOR_FREE; FAT_SIZE];
        fs.fs_mount().unwrap();

        assert_eq!(fs.directory, expected_directory);
        assert_eq!(fs.fat, expected_fat);
    }

    #[test]
    fn invalid_file_number_is_rejected_without_mutation() {
        let mut flash = new_disk();
        let mut block = BlockDevice::new(&mut flash, Config::default());
        let mut fs = FileSystem::new(&mut block);
        fs.fs_format().unwrap();
        let before = fs.directory;
        assert_eq!(
            fs.file_append(255, &[0; SECTOR_SIZE]),
            Err(KernelError::InvalidFileNumber)
        );
        assert_eq!(fs.directory, before);
    }

    #[test]
    fn disk_full_boundary() {
        // Scenario 7 from spec.md §8: after (METADATA_SECTOR) successful
        // appends to distinct sectors, the next append reports disk-full.
        let mut flash = new_disk();
        let mut block = BlockDevice::new(&mut flash, Config::default());
        let mut fs = FileSystem::new(&mut block);
        fs.fs_format().unwrap();

        let a = fs.file_new().unwrap();
        for _ in 0..METADATA_SECTOR {
            fs.file_append(a, &[7; SECTOR_SIZE]).unwrap();
        }
        assert_eq!(
            fs.file_append(a, &[7; SECTOR_SIZE]),
            Err(KernelError::DiskFull)
        );
    }
}
