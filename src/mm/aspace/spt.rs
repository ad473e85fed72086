//! # Supplemental Page Table (SPT)
//!
//! Mapa por processo `página virtual -> descritor`.
//!
//! Os descritores vivem numa arena de slots com geração. A Frame Table não
//! guarda ponteiros para descritores: guarda um [`PageRef`] (slot + geração)
//! e o resolve aqui. Um slot reciclado incrementa a geração, então um
//! `PageRef` antigo simplesmente deixa de resolver.
//!
//! O lock interno protege só a estrutura do mapa. Nunca é mantido durante
//! I/O nem enquanto se espera por outro lock.

extern crate alloc;

use super::page::{FileBacking, Page, PageKind, PageOrigin};
use crate::hal::FileHandle;
use crate::mm::config::PAGE_SIZE;
use crate::mm::error::{MmError, MmResult};
use crate::mm::VirtAddr;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::Mutex;

/// Referência estável a um descritor, usada pela Frame Table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    slot: u32,
    generation: u32,
    va: VirtAddr,
}

impl PageRef {
    #[inline]
    pub fn va(&self) -> VirtAddr {
        self.va
    }
}

struct Slot {
    generation: u32,
    page: Option<Arc<Page>>,
}

#[derive(Default)]
struct SptInner {
    index: BTreeMap<VirtAddr, u32>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl SptInner {
    fn store(&mut self, page: Arc<Page>) -> PageRef {
        let va = page.va();
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize].page = Some(page);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    page: Some(page),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.index.insert(va, slot);
        PageRef {
            slot,
            generation: self.slots[slot as usize].generation,
            va,
        }
    }

    fn page_ref(&self, slot: u32) -> Option<(PageRef, Arc<Page>)> {
        let entry = &self.slots[slot as usize];
        let page = entry.page.clone()?;
        Some((
            PageRef {
                slot,
                generation: entry.generation,
                va: page.va(),
            },
            page,
        ))
    }

    fn release(&mut self, slot: u32) -> Option<Arc<Page>> {
        let entry = &mut self.slots[slot as usize];
        let page = entry.page.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);
        Some(page)
    }
}

#[derive(Default)]
pub struct SupplementalPageTable {
    inner: Mutex<SptInner>,
}

impl SupplementalPageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descritor da página que contém `va`
    pub fn lookup(&self, va: VirtAddr) -> Option<(PageRef, Arc<Page>)> {
        let inner = self.inner.lock();
        let slot = *inner.index.get(&va.page_base())?;
        inner.page_ref(slot)
    }

    pub fn contains(&self, va: VirtAddr) -> bool {
        self.inner.lock().index.contains_key(&va.page_base())
    }

    /// Resolve um `PageRef`. `None` se o descritor já foi removido.
    pub fn resolve(&self, page: PageRef) -> Option<Arc<Page>> {
        let inner = self.inner.lock();
        let entry = inner.slots.get(page.slot as usize)?;
        if entry.generation != page.generation {
            return None;
        }
        entry.page.clone()
    }

    /// Registra um descritor. Falha se a página já tem um.
    pub fn insert(&self, page: Arc<Page>) -> MmResult<PageRef> {
        let mut inner = self.inner.lock();
        if inner.index.contains_key(&page.va()) {
            return Err(MmError::AlreadyMapped);
        }
        Ok(inner.store(page))
    }

    /// Registra vários descritores de uma vez: ou todos entram, ou nenhum.
    pub fn insert_all(&self, pages: Vec<Arc<Page>>) -> MmResult<Vec<PageRef>> {
        let mut inner = self.inner.lock();
        if pages.iter().any(|p| inner.index.contains_key(&p.va())) {
            return Err(MmError::AlreadyMapped);
        }
        Ok(pages.into_iter().map(|p| inner.store(p)).collect())
    }

    /// Remove o descritor de `va`, invalidando os `PageRef` dele
    pub fn remove(&self, va: VirtAddr) -> Option<Arc<Page>> {
        let mut inner = self.inner.lock();
        let slot = inner.index.remove(&va.page_base())?;
        inner.release(slot)
    }

    /// Remove e retorna todos os descritores (teardown do processo)
    pub fn drain(&self) -> Vec<Arc<Page>> {
        let mut inner = self.inner.lock();
        let slots: Vec<u32> = core::mem::take(&mut inner.index).into_values().collect();
        slots
            .into_iter()
            .filter_map(|slot| inner.release(slot))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registra, sem carregar nada, as páginas de `[va, va + read + zero)`
    /// como vindas de `file` a partir de `offset`.
    ///
    /// Página `i` lê `min(read restante, PAGE_SIZE)` bytes do arquivo e zera
    /// o resto. O registro é atômico: se qualquer página do intervalo já
    /// existir, nada é inserido. Retorna o número de páginas registradas.
    #[allow(clippy::too_many_arguments)]
    pub fn register_lazy_range(
        &self,
        file: FileHandle,
        offset: u64,
        va: VirtAddr,
        read_bytes: usize,
        zero_bytes: usize,
        writable: bool,
        kind: PageKind,
    ) -> MmResult<usize> {
        if va.is_null() {
            return Err(MmError::InvalidAddress);
        }
        if !va.is_page_aligned() || (read_bytes + zero_bytes) % PAGE_SIZE != 0 {
            return Err(MmError::NotAligned);
        }

        let count = (read_bytes + zero_bytes) / PAGE_SIZE;
        let mut pages = Vec::with_capacity(count);
        let mut remaining = read_bytes;
        for i in 0..count {
            let page_read = remaining.min(PAGE_SIZE);
            let backing = FileBacking {
                file,
                offset: offset + (i * PAGE_SIZE) as u64,
                read_bytes: page_read,
                zero_bytes: PAGE_SIZE - page_read,
            };
            pages.push(Arc::new(Page::new(
                va.page_at(i),
                kind,
                writable,
                PageOrigin::File(backing),
            )));
            remaining -= page_read;
        }

        self.insert_all(pages)?;
        crate::ktrace!("(SPT) Faixa lazy registrada em=", va.as_u64());
        Ok(count)
    }
}
