//! Entrada da Frame Table

extern crate alloc;

use crate::hal::Pid;
use crate::mm::aspace::PageRef;
use crate::mm::PhysAddr;
use alloc::vec::Vec;

/// Um frame de usuário ocupado: quem é o dono e qual página ele contém
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEntry {
    pub frame: PhysAddr,
    pub owner: Pid,
    pub page: PageRef,
}

/// Conteúdo protegido pelo lock global da Frame Table
pub(crate) struct FrameList {
    pub(crate) entries: Vec<FrameEntry>,
    /// Ponteiro do relógio: onde a próxima varredura começa
    pub(crate) hand: usize,
}

impl FrameList {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            hand: 0,
        }
    }

    pub(crate) fn position(&self, frame: PhysAddr) -> Option<usize> {
        self.entries.iter().position(|e| e.frame == frame)
    }

    /// Remove a entrada `idx` mantendo o relógio apontando para a mesma
    /// entrada seguinte
    pub(crate) fn remove(&mut self, idx: usize) -> FrameEntry {
        let entry = self.entries.remove(idx);
        if idx < self.hand {
            self.hand -= 1;
        }
        if self.hand >= self.entries.len() {
            self.hand = 0;
        }
        entry
    }
}
