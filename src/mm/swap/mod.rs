//! # Swap Subsystem
//!
//! Backing store para páginas evicted.
//!
//! O dispositivo é dividido em slots de `SECTORS_PER_PAGE` setores
//! contíguos; o slot `n` ocupa os setores `[n * 8, n * 8 + 8)`. Um bitmap
//! protegido por spinlock marca os slots ocupados. O lock cobre apenas a
//! reserva/liberação do bit: o I/O de setor acontece fora dele.

extern crate alloc;

use crate::drivers::block::BlockDevice;
use crate::klib::Bitmap;
use crate::mm::config::{PAGE_SIZE, SECTORS_PER_PAGE, SECTOR_SIZE};
use crate::mm::error::{MmError, MmResult};
use alloc::sync::Arc;
use spin::Mutex;

/// Slot de swap (índice no backing store)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwapSlot(pub u64);

impl SwapSlot {
    /// Primeiro setor do slot no dispositivo
    #[inline]
    pub const fn first_sector(self) -> u64 {
        self.0 * SECTORS_PER_PAGE as u64
    }
}

pub struct SwapStore {
    device: Arc<dyn BlockDevice>,
    slots: Mutex<Bitmap>,
}

impl SwapStore {
    /// Cria o store sobre `device`. A capacidade é `setores / 8`; setores
    /// que sobram no fim do disco são ignorados.
    pub fn new(device: Arc<dyn BlockDevice>) -> Self {
        debug_assert_eq!(device.block_size(), SECTOR_SIZE);
        let capacity = device.total_blocks() as usize / SECTORS_PER_PAGE;
        crate::kinfo!("(SWAP) Slots disponiveis=", capacity);
        Self {
            device,
            slots: Mutex::new(Bitmap::new(capacity)),
        }
    }

    /// Número total de slots
    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }

    /// Slots ocupados
    pub fn used(&self) -> usize {
        self.slots.lock().count_ones()
    }

    pub fn is_allocated(&self, slot: SwapSlot) -> bool {
        let slots = self.slots.lock();
        (slot.0 as usize) < slots.len() && slots.test(slot.0 as usize)
    }

    /// Reserva o primeiro slot livre sem escrever nada
    pub fn allocate_slot(&self) -> MmResult<SwapSlot> {
        match self.slots.lock().scan_and_set() {
            Some(index) => Ok(SwapSlot(index as u64)),
            None => {
                crate::kwarn!("(SWAP) Sem slots livres");
                Err(MmError::SwapFull)
            }
        }
    }

    /// Grava uma página inteira em `slot`, já reservado
    pub fn write_slot(&self, slot: SwapSlot, page: &[u8]) -> MmResult<()> {
        debug_assert_eq!(page.len(), PAGE_SIZE);
        self.device
            .write_blocks(slot.first_sector(), page)
            .map_err(|_| {
                crate::kerror!("(SWAP) Falha de escrita no slot=", slot.0);
                MmError::SwapIo
            })
    }

    /// Lê o slot para `page` sem liberá-lo
    pub fn read_slot(&self, slot: SwapSlot, page: &mut [u8]) -> MmResult<()> {
        debug_assert_eq!(page.len(), PAGE_SIZE);
        self.device
            .read_blocks(slot.first_sector(), page)
            .map_err(|_| {
                crate::kerror!("(SWAP) Falha de leitura no slot=", slot.0);
                MmError::SwapIo
            })
    }

    /// Copia a página para o primeiro slot livre e retorna o slot.
    pub fn write_page(&self, page: &[u8]) -> MmResult<SwapSlot> {
        let slot = self.allocate_slot()?;
        if let Err(e) = self.write_slot(slot, page) {
            self.free_slot(slot);
            return Err(e);
        }
        crate::ktrace!("(SWAP) Pagina gravada no slot=", slot.0);
        Ok(slot)
    }

    /// Lê o slot para `page` e o devolve ao bitmap.
    pub fn read_page(&self, page: &mut [u8], slot: SwapSlot) -> MmResult<()> {
        self.read_slot(slot, page)?;
        self.free_slot(slot);
        Ok(())
    }

    /// Marca o slot como livre. Liberar um slot já livre é inofensivo.
    pub fn free_slot(&self, slot: SwapSlot) {
        let mut slots = self.slots.lock();
        if (slot.0 as usize) < slots.len() {
            slots.clear(slot.0 as usize);
        }
    }
}
