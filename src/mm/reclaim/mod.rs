//! # Page Reclaim Subsystem
//!
//! Escolha de vítima e eviction, executadas por `FrameTable::acquire_frame`
//! com o lock da Frame Table já adquirido.
//!
//! Duas passadas:
//! 1. Segunda chance ([`aging::second_chance`]): a partir do ponteiro do
//!    relógio, a primeira página com ACCESSED limpo é a vítima. Páginas com
//!    ACCESSED ligado ganham `last_touched = agora` e têm o bit limpo.
//! 2. Mais antiga ([`aging::oldest`]): se todas foram acessadas, a página com
//!    menor `last_touched` é a vítima.
//!
//! Descritores ocupados (lock em posse de outra thread) nunca são vítimas.

pub mod aging;
pub mod evict;

extern crate alloc;

use crate::hal::{FileService, ProcessDirectory, UserPool};
use crate::mm::aspace::{AddressSpace, Page};
use crate::mm::error::{MmError, MmResult};
use crate::mm::pfm::frame::{FrameEntry, FrameList};
use crate::mm::stats::VmStats;
use crate::mm::swap::SwapStore;
use alloc::sync::Arc;

/// Serviços que a eviction usa, emprestados da Frame Table
pub(crate) struct Reclaimer<'a> {
    pub pool: &'a dyn UserPool,
    pub swap: &'a SwapStore,
    pub files: &'a dyn FileService,
    pub processes: &'a dyn ProcessDirectory,
    pub stats: &'a VmStats,
}

impl Reclaimer<'_> {
    /// Dono e descritor de uma entrada. `None` se o processo ou a página já
    /// não existem (a entrada será limpa pelo exit do dono).
    pub(crate) fn resolve(&self, entry: &FrameEntry) -> Option<(Arc<AddressSpace>, Arc<Page>)> {
        let space = self.processes.lookup(entry.owner)?;
        let page = space.spt().resolve(entry.page)?;
        Some((space, page))
    }
}

/// Resultado acumulado das tentativas de eviction
#[derive(Debug, Default)]
pub(crate) struct Attempts {
    /// Alguma vítima precisou de swap e o swap estava cheio
    pub swap_full: bool,
}

impl Attempts {
    pub(crate) fn note(&mut self, err: MmError) {
        if err == MmError::SwapFull {
            self.swap_full = true;
        }
    }

    fn into_error(self) -> MmError {
        if self.swap_full {
            MmError::SwapFull
        } else {
            MmError::OutOfMemory
        }
    }
}

/// Escolhe e evicta uma vítima. Retorna o índice da entrada cujo frame
/// agora está livre (zerado) para reuso.
pub(crate) fn select_and_evict(
    list: &mut FrameList,
    rc: &Reclaimer<'_>,
    tick: u64,
) -> MmResult<usize> {
    if list.entries.is_empty() {
        crate::kerror!("(FRAME) Pool vazio e Frame Table vazia");
        return Err(MmError::OutOfMemory);
    }

    let mut attempts = Attempts::default();
    if let Some(idx) = aging::second_chance(list, rc, tick, &mut attempts) {
        return Ok(idx);
    }
    if let Some(idx) = aging::oldest(list, rc, &mut attempts) {
        return Ok(idx);
    }

    crate::kwarn!("(FRAME) Nenhuma vitima disponivel, frames=", list.entries.len());
    Err(attempts.into_error())
}
