//! # Memory Statistics
//!
//! Contadores da VM. Vivem dentro de [`crate::mm::Vm`] (um conjunto por
//! instância), e não em statics, para que duas VMs no mesmo binário de teste
//! não misturem números.

use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct VmStats {
    pub page_faults: AtomicU64,
    pub spurious_faults: AtomicU64,
    pub file_loads: AtomicU64,
    pub swap_ins: AtomicU64,
    pub swap_outs: AtomicU64,
    pub evictions: AtomicU64,
    pub writebacks: AtomicU64,
    pub discards: AtomicU64,
    pub stack_growths: AtomicU64,
    pub kills: AtomicU64,
}

impl VmStats {
    pub const fn new() -> Self {
        Self {
            page_faults: AtomicU64::new(0),
            spurious_faults: AtomicU64::new(0),
            file_loads: AtomicU64::new(0),
            swap_ins: AtomicU64::new(0),
            swap_outs: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            writebacks: AtomicU64::new(0),
            discards: AtomicU64::new(0),
            stack_growths: AtomicU64::new(0),
            kills: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> VmStatsSnapshot {
        VmStatsSnapshot {
            page_faults: self.page_faults.load(Ordering::Relaxed),
            spurious_faults: self.spurious_faults.load(Ordering::Relaxed),
            file_loads: self.file_loads.load(Ordering::Relaxed),
            swap_ins: self.swap_ins.load(Ordering::Relaxed),
            swap_outs: self.swap_outs.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            writebacks: self.writebacks.load(Ordering::Relaxed),
            discards: self.discards.load(Ordering::Relaxed),
            stack_growths: self.stack_growths.load(Ordering::Relaxed),
            kills: self.kills.load(Ordering::Relaxed),
        }
    }
}

/// Cópia consistente-o-suficiente dos contadores (cada campo é lido
/// isoladamente)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmStatsSnapshot {
    pub page_faults: u64,
    pub spurious_faults: u64,
    pub file_loads: u64,
    pub swap_ins: u64,
    pub swap_outs: u64,
    pub evictions: u64,
    pub writebacks: u64,
    pub discards: u64,
    pub stack_growths: u64,
    pub kills: u64,
}

impl VmStatsSnapshot {
    /// Faults que exigiram trazer uma página para a memória
    pub fn major_faults(&self) -> u64 {
        self.file_loads + self.swap_ins + self.stack_growths
    }
}
