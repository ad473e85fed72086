//! # Address Space Manager
//!
//! Estado de VM de um processo: a tabela de páginas (MMU), a SPT com os
//! descritores e a tabela de mapeamentos mmap.

pub mod load;
pub mod mmap;
pub mod page;
pub mod spt;

extern crate alloc;

use crate::hal::{Mmu, Pid};
use crate::mm::Vm;
use alloc::sync::Arc;

pub use mmap::{MapId, MmapEntry, MmapTable};
pub use page::{FileBacking, Page, PageKind, PageOrigin, PageState};
pub use spt::{PageRef, SupplementalPageTable};

pub struct AddressSpace {
    pid: Pid,
    mmu: Arc<dyn Mmu>,
    spt: SupplementalPageTable,
    mmaps: MmapTable,
}

impl AddressSpace {
    pub fn new(pid: Pid, mmu: Arc<dyn Mmu>) -> Self {
        Self {
            pid,
            mmu,
            spt: SupplementalPageTable::new(),
            mmaps: MmapTable::new(),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn mmu(&self) -> &dyn Mmu {
        self.mmu.as_ref()
    }

    #[inline]
    pub fn spt(&self) -> &SupplementalPageTable {
        &self.spt
    }

    #[inline]
    pub fn mmaps(&self) -> &MmapTable {
        &self.mmaps
    }

    /// Destrói todos os descritores do processo, sem writeback.
    ///
    /// Páginas residentes perdem o mapeamento e devolvem o frame; slots de
    /// swap são liberados. No fim, qualquer entrada da Frame Table que ainda
    /// aponte para este processo é purgada.
    pub fn destroy_all_pages(&self, vm: &Vm) -> usize {
        let pages = self.spt.drain();
        let count = pages.len();

        for page in pages {
            let mut state = page.lock();
            if let Some(frame) = state.frame.take() {
                self.mmu.clear_mapping(page.va());
                vm.frames().release_frame(frame);
            }
            if let Some(slot) = state.swap_slot() {
                vm.swap().free_slot(slot);
                state.origin = PageOrigin::Anonymous;
            }
            state.mark_removed();
        }

        vm.frames().release_process_frames(self.pid);
        crate::kdebug!("(SPT) Descritores destruidos=", count);
        count
    }
}

impl core::fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AddressSpace")
            .field("pid", &self.pid)
            .field("pages", &self.spt.len())
            .field("mappings", &self.mmaps.len())
            .finish()
    }
}
