//! # Ramdisk
//!
//! Dispositivo de bloco em memória. Serve de backing store de swap quando não
//! há disco dedicado (e nos testes).

extern crate alloc;

use super::traits::{BlockDevice, BlockError};
use alloc::vec;
use alloc::vec::Vec;
use spin::Mutex;

/// Tamanho padrão de setor
pub const RAMDISK_SECTOR_SIZE: usize = 512;

pub struct RamDisk {
    data: Mutex<Vec<u8>>,
    sectors: u64,
}

impl RamDisk {
    /// Cria um ramdisk zerado com `sectors` setores de 512 bytes
    pub fn new(sectors: u64) -> Self {
        Self {
            data: Mutex::new(vec![0u8; sectors as usize * RAMDISK_SECTOR_SIZE]),
            sectors,
        }
    }

    fn range(&self, lba: u64, len: usize) -> Result<core::ops::Range<usize>, BlockError> {
        if lba >= self.sectors {
            return Err(BlockError::InvalidBlock);
        }
        if len != RAMDISK_SECTOR_SIZE {
            return Err(BlockError::InvalidBuffer);
        }
        let start = lba as usize * RAMDISK_SECTOR_SIZE;
        Ok(start..start + RAMDISK_SECTOR_SIZE)
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let range = self.range(lba, buf.len())?;
        buf.copy_from_slice(&self.data.lock()[range]);
        Ok(())
    }

    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        let range = self.range(lba, buf.len())?;
        self.data.lock()[range].copy_from_slice(buf);
        Ok(())
    }

    fn block_size(&self) -> usize {
        RAMDISK_SECTOR_SIZE
    }

    fn total_blocks(&self) -> u64 {
        self.sectors
    }
}
