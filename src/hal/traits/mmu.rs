//! Trait de MMU (tabela de páginas por processo)

use crate::mm::{PhysAddr, VirtAddr};
use bitflags::bitflags;

bitflags! {
    /// Flags de uma entrada de tabela de páginas, como a VM as enxerga
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PteFlags: u64 {
        const PRESENT = 1 << 0;
        const WRITABLE = 1 << 1;
        const USER = 1 << 2;
        const ACCESSED = 1 << 5;
        const DIRTY = 1 << 6;
    }
}

/// Tabela de páginas de um processo.
///
/// Os bits ACCESSED e DIRTY são mantidos pelo hardware; a VM só os lê e
/// limpa.
pub trait Mmu: Send + Sync {
    /// Instala `va -> frame`. Retorna `false` se a tabela não pôde ser
    /// estendida.
    fn install_mapping(&self, va: VirtAddr, frame: PhysAddr, writable: bool) -> bool;

    /// Remove o mapeamento de `va`, retornando atomicamente as flags que ele
    /// tinha no momento da remoção.
    fn clear_mapping(&self, va: VirtAddr) -> Option<PteFlags>;

    /// Frame mapeado em `va`
    fn get_physical(&self, va: VirtAddr) -> Option<PhysAddr>;

    /// Flags atuais de `va`, `None` se não mapeado
    fn flags(&self, va: VirtAddr) -> Option<PteFlags>;

    /// Liga `set` e desliga `clear` na entrada de `va` (no-op se não mapeado)
    fn update_flags(&self, va: VirtAddr, set: PteFlags, clear: PteFlags);

    fn is_accessed(&self, va: VirtAddr) -> bool {
        self.flags(va)
            .is_some_and(|f| f.contains(PteFlags::ACCESSED))
    }

    fn is_dirty(&self, va: VirtAddr) -> bool {
        self.flags(va).is_some_and(|f| f.contains(PteFlags::DIRTY))
    }

    fn is_writable(&self, va: VirtAddr) -> bool {
        self.flags(va)
            .is_some_and(|f| f.contains(PteFlags::WRITABLE))
    }

    /// Limpa o bit ACCESSED (segunda chance do relógio)
    fn clear_accessed(&self, va: VirtAddr) {
        self.update_flags(va, PteFlags::empty(), PteFlags::ACCESSED);
    }
}
