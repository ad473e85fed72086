//! # Interface de dispositivo de bloco
//!
//! O Swap Store enxerga o disco como um vetor de setores de
//! `block_size()` bytes. Uma página ocupa `SECTORS_PER_PAGE` setores
//! contíguos e é transferida com [`BlockDevice::read_blocks`] /
//! [`BlockDevice::write_blocks`].

/// Falhas reportadas pelo dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    /// Setor além do fim do dispositivo
    InvalidBlock,
    /// Falha de hardware
    IoError,
    /// Buffer que não é múltiplo do tamanho de setor
    InvalidBuffer,
}

/// Dispositivo de setores endereçados por LBA.
///
/// O swap assume que uma transferência de setor completa ou falha inteira:
/// não há setor parcial.
pub trait BlockDevice: Send + Sync {
    /// Lê o setor `lba` para `buf` (exatamente `block_size()` bytes)
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError>;

    /// Grava `buf` (exatamente `block_size()` bytes) no setor `lba`
    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError>;

    fn block_size(&self) -> usize;

    /// Número de setores do dispositivo
    fn total_blocks(&self) -> u64;

    /// Lê setores contíguos a partir de `start_lba`, um por um
    fn read_blocks(&self, start_lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let size = self.block_size();
        if buf.len() % size != 0 {
            return Err(BlockError::InvalidBuffer);
        }
        buf.chunks_exact_mut(size)
            .zip(start_lba..)
            .try_for_each(|(sector, lba)| self.read_block(lba, sector))
    }

    /// Grava setores contíguos a partir de `start_lba`, um por um
    fn write_blocks(&self, start_lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        let size = self.block_size();
        if buf.len() % size != 0 {
            return Err(BlockError::InvalidBuffer);
        }
        buf.chunks_exact(size)
            .zip(start_lba..)
            .try_for_each(|(sector, lba)| self.write_block(lba, sector))
    }
}
