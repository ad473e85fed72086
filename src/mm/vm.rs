//! # Contexto da VM
//!
//! Agrupa os serviços globais da camada de VM.

extern crate alloc;

use crate::drivers::block::BlockDevice;
use crate::hal::{FileService, ProcessDirectory, UserPool};
use crate::mm::aspace::AddressSpace;
use crate::mm::config::VmConfig;
use crate::mm::error::{MmError, MmResult};
use crate::mm::pfm::FrameTable;
use crate::mm::stats::VmStats;
use crate::mm::swap::SwapStore;
use alloc::sync::Arc;

pub struct Vm {
    config: VmConfig,
    stats: Arc<VmStats>,
    swap: Arc<SwapStore>,
    frames: FrameTable,
    files: Arc<dyn FileService>,
    processes: Arc<dyn ProcessDirectory>,
}

impl Vm {
    /// Constrói a VM. O dispositivo de swap é formatado como vazio.
    pub fn new(
        config: VmConfig,
        pool: Arc<dyn UserPool>,
        swap_device: Arc<dyn BlockDevice>,
        files: Arc<dyn FileService>,
        processes: Arc<dyn ProcessDirectory>,
    ) -> Self {
        let stats = Arc::new(VmStats::new());
        let swap = Arc::new(SwapStore::new(swap_device));
        let frames = FrameTable::new(
            pool.clone(),
            swap.clone(),
            files.clone(),
            processes.clone(),
            stats.clone(),
        );

        crate::kinfo!("(VM) Frames de usuario=", pool.total_frames());
        crate::kok!("(VM) Memoria virtual inicializada");

        Self {
            config,
            stats,
            swap,
            frames,
            files,
            processes,
        }
    }

    #[inline]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    #[inline]
    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    #[inline]
    pub fn swap(&self) -> &SwapStore {
        &self.swap
    }

    #[inline]
    pub fn files(&self) -> &dyn FileService {
        self.files.as_ref()
    }

    #[inline]
    pub fn processes(&self) -> &dyn ProcessDirectory {
        self.processes.as_ref()
    }

    #[inline]
    pub fn stats(&self) -> &VmStats {
        &self.stats
    }

    /// Espaço de endereçamento do processo em execução
    pub fn current_space(&self) -> MmResult<Arc<AddressSpace>> {
        let pid = self.processes.current_process();
        self.processes
            .lookup(pid)
            .ok_or(MmError::ProcessNotFound)
    }
}
