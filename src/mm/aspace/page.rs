//! # Page Descriptor
//!
//! Um descritor por página virtual registrada na SPT. Diz de onde vem o
//! conteúdo da página e se ela está residente.

use crate::hal::FileHandle;
use crate::mm::swap::SwapSlot;
use crate::mm::{PhysAddr, VirtAddr};
use core::sync::atomic::{AtomicU64, Ordering};
use spin::{Mutex, MutexGuard};

/// Papel da página no processo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Segmento de código/dados do executável
    Executable,
    /// Página de um arquivo mapeado com mmap
    Mmap,
    /// Página de stack criada por crescimento
    Stack,
}

/// Trecho de arquivo que preenche a página.
///
/// `read_bytes + zero_bytes == PAGE_SIZE`: os primeiros `read_bytes` vêm do
/// arquivo a partir de `offset`, o resto é zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileBacking {
    pub file: FileHandle,
    pub offset: u64,
    pub read_bytes: usize,
    pub zero_bytes: usize,
}

/// Origem do conteúdo enquanto a página não está residente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    File(FileBacking),
    Swapped(SwapSlot),
    /// Sem cópia fora da memória. Só é válido com a página residente.
    Anonymous,
}

/// Parte mutável do descritor, protegida pelo lock da página
#[derive(Debug)]
pub struct PageState {
    pub origin: PageOrigin,
    /// Frame que contém a página, se residente
    pub frame: Option<PhysAddr>,
    /// Bit DIRTY guardado quando a PTE não pôde ser reinstalada
    pub dirty: bool,
    /// Descritor já retirado da SPT (munmap ou exit). Nunca volta a carregar.
    pub removed: bool,
}

impl PageState {
    #[inline]
    pub fn is_resident(&self) -> bool {
        self.frame.is_some()
    }

    /// Marca o descritor como destruído. Quem ainda tiver um `Arc` dele
    /// (um fault que fez o lookup antes da remoção) recebe `NotMapped`.
    pub fn mark_removed(&mut self) {
        self.removed = true;
        self.dirty = false;
    }

    /// Slot de swap que a página ocupa, se houver
    pub fn swap_slot(&self) -> Option<SwapSlot> {
        match self.origin {
            PageOrigin::Swapped(slot) => Some(slot),
            _ => None,
        }
    }
}

pub struct Page {
    va: VirtAddr,
    kind: PageKind,
    writable: bool,
    /// Tick do relógio da Frame Table no último acesso observado
    last_touched: AtomicU64,
    state: Mutex<PageState>,
}

impl Page {
    pub fn new(va: VirtAddr, kind: PageKind, writable: bool, origin: PageOrigin) -> Self {
        debug_assert!(va.is_page_aligned());
        Self {
            va,
            kind,
            writable,
            last_touched: AtomicU64::new(0),
            state: Mutex::new(PageState {
                origin,
                frame: None,
                dirty: false,
                removed: false,
            }),
        }
    }

    #[inline]
    pub fn va(&self) -> VirtAddr {
        self.va
    }

    #[inline]
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    #[inline]
    pub fn writable(&self) -> bool {
        self.writable
    }

    pub fn last_touched(&self) -> u64 {
        self.last_touched.load(Ordering::Relaxed)
    }

    pub fn touch(&self, tick: u64) {
        self.last_touched.store(tick, Ordering::Relaxed);
    }

    /// Bloqueia o descritor. Toda transição residente <-> não residente
    /// acontece com este lock.
    pub fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock()
    }

    /// Tentativa sem espera. Usada pela eviction, que roda com o lock da
    /// Frame Table e nunca pode esperar por um descritor.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, PageState>> {
        self.state.try_lock()
    }
}

impl core::fmt::Debug for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Page")
            .field("va", &self.va)
            .field("kind", &self.kind)
            .field("writable", &self.writable)
            .finish()
    }
}
