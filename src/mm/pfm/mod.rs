//! # Page Frame Manager (PFM)
//!
//! Frame Table global: registra cada frame de usuário em uso, com o
//! processo dono e o descritor de página que ele contém.
//!
//! Quando o pool de usuário esvazia, `acquire_frame` escolhe uma vítima
//! (ver [`crate::mm::reclaim`]), tira a página dela da memória e reaproveita
//! o frame.
//!
//! ## Locking
//!
//! Um único spinlock cobre a lista. Quem segura o lock de um descritor pode
//! chamar `acquire_frame`; o contrário não vale: com a lista bloqueada, a
//! eviction só faz `try_lock` em descritores e pula os ocupados.

pub mod frame;

extern crate alloc;

use crate::hal::{FileService, Pid, ProcessDirectory, UserPool};
use crate::mm::aspace::PageRef;
use crate::mm::config::PAGE_SIZE;
use crate::mm::error::MmResult;
use crate::mm::reclaim::{self, Reclaimer};
use crate::mm::stats::VmStats;
use crate::mm::swap::SwapStore;
use crate::mm::PhysAddr;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};
use spin::Mutex;

pub use frame::FrameEntry;
use frame::FrameList;

pub struct FrameTable {
    list: Mutex<FrameList>,
    pool: Arc<dyn UserPool>,
    swap: Arc<SwapStore>,
    files: Arc<dyn FileService>,
    processes: Arc<dyn ProcessDirectory>,
    stats: Arc<VmStats>,
    /// Relógio lógico usado em `last_touched`
    clock: AtomicU64,
}

impl FrameTable {
    pub fn new(
        pool: Arc<dyn UserPool>,
        swap: Arc<SwapStore>,
        files: Arc<dyn FileService>,
        processes: Arc<dyn ProcessDirectory>,
        stats: Arc<VmStats>,
    ) -> Self {
        Self {
            list: Mutex::new(FrameList::new()),
            pool,
            swap,
            files,
            processes,
            stats,
            clock: AtomicU64::new(0),
        }
    }

    /// Próximo tick do relógio lógico
    pub fn now(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Obtém um frame para a página `page` do processo `owner`.
    ///
    /// Tenta o pool primeiro; se estiver vazio, evicta uma página residente.
    /// O conteúdo do frame retornado é indefinido (zero, se veio de eviction).
    ///
    /// O chamador deve segurar o lock do descritor de `page`: é isso que
    /// impede a própria eviction de escolher o frame recém-entregue antes de
    /// a página ser instalada.
    pub fn acquire_frame(&self, owner: Pid, page: PageRef) -> MmResult<PhysAddr> {
        if let Some(frame) = self.pool.allocate_user_page() {
            debug_assert!(frame.is_frame_aligned());
            self.list.lock().entries.push(FrameEntry { frame, owner, page });
            crate::ktrace!("(FRAME) Frame livre=", frame.as_u64());
            return Ok(frame);
        }

        let mut list = self.list.lock();

        // Alguém pode ter devolvido um frame enquanto esperávamos o lock
        if let Some(frame) = self.pool.allocate_user_page() {
            list.entries.push(FrameEntry { frame, owner, page });
            return Ok(frame);
        }

        let tick = self.now();
        let idx = reclaim::select_and_evict(&mut list, &self.reclaimer(), tick)?;
        let frame = list.entries[idx].frame;
        list.entries[idx] = FrameEntry { frame, owner, page };
        crate::kdebug!("(FRAME) Frame reaproveitado por eviction=", frame.as_u64());
        Ok(frame)
    }

    /// Remove a entrada de `frame` e devolve o frame ao pool. Retorna
    /// `false` se o frame não estava registrado (nada é liberado).
    pub fn release_frame(&self, frame: PhysAddr) -> bool {
        let mut list = self.list.lock();
        let Some(idx) = list.position(frame) else {
            crate::kwarn!("(FRAME) release de frame nao registrado=", frame.as_u64());
            return false;
        };
        list.remove(idx);
        drop(list);
        self.pool.free_page(frame);
        true
    }

    /// Remove todas as entradas de `pid`, sem writeback, e devolve os
    /// frames ao pool. Retorna quantos frames foram liberados.
    pub fn release_process_frames(&self, pid: Pid) -> usize {
        let mut list = self.list.lock();
        let mut freed = Vec::new();
        let mut idx = 0;
        while idx < list.entries.len() {
            if list.entries[idx].owner == pid {
                freed.push(list.remove(idx).frame);
            } else {
                idx += 1;
            }
        }
        drop(list);

        for &frame in &freed {
            self.pool.free_page(frame);
        }
        if !freed.is_empty() {
            crate::kdebug!("(FRAME) Frames liberados no exit=", freed.len());
        }
        freed.len()
    }

    /// Número de frames registrados
    pub fn resident_frames(&self) -> usize {
        self.list.lock().entries.len()
    }

    /// Dono e página de `frame`, se registrado
    pub fn owner_of(&self, frame: PhysAddr) -> Option<(Pid, PageRef)> {
        let list = self.list.lock();
        let idx = list.position(frame)?;
        let entry = list.entries[idx];
        Some((entry.owner, entry.page))
    }

    /// Entradas de `pid` (cópia)
    pub fn frames_of(&self, pid: Pid) -> Vec<FrameEntry> {
        self.list
            .lock()
            .entries
            .iter()
            .filter(|e| e.owner == pid)
            .copied()
            .collect()
    }

    /// Bytes do frame via direct map.
    ///
    /// # Safety
    /// O chamador precisa ter posse exclusiva do frame: ele está registrado
    /// para uma página cujo lock de descritor o chamador segura (ou a Frame
    /// Table está bloqueada, no caso da eviction).
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn frame_bytes(&self, frame: PhysAddr) -> &mut [u8] {
        frame_bytes(self.pool.as_ref(), frame)
    }

    pub(crate) fn reclaimer(&self) -> Reclaimer<'_> {
        Reclaimer {
            pool: self.pool.as_ref(),
            swap: self.swap.as_ref(),
            files: self.files.as_ref(),
            processes: self.processes.as_ref(),
            stats: self.stats.as_ref(),
        }
    }
}

/// Visão de `PAGE_SIZE` bytes do frame.
///
/// # Safety
/// Ver [`FrameTable::frame_bytes`].
#[allow(clippy::mut_from_ref)]
pub(crate) unsafe fn frame_bytes(pool: &dyn UserPool, frame: PhysAddr) -> &mut [u8] {
    core::slice::from_raw_parts_mut(pool.frame_ptr(frame), PAGE_SIZE)
}
