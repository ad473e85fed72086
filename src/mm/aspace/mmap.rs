//! # Memory-mapped files
//!
//! Tabela de mapeamentos de um processo e as operações de criação e
//! destruição.
//!
//! Um mapeamento cobre `ceil(len / PAGE_SIZE)` páginas a partir de um
//! endereço alinhado. As páginas são registradas na SPT como `Mmap`,
//! graváveis e preguiçosas; a última página zera o que passa do fim do
//! arquivo. Cada mapeamento segura o próprio handle (obtido com `reopen`),
//! então fechar o descritor original não o afeta.

extern crate alloc;

use super::page::{PageKind, PageOrigin};
use super::AddressSpace;
use crate::hal::{FileHandle, PteFlags};
use crate::mm::config::{pages_for, CONSOLE_FDS, PAGE_SIZE};
use crate::mm::error::{MmError, MmResult};
use crate::mm::stats::VmStats;
use crate::mm::{VirtAddr, Vm};
use alloc::vec::Vec;
use spin::Mutex;

/// Identificador de mapeamento, único dentro do processo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmapEntry {
    pub id: MapId,
    pub file: FileHandle,
    pub base: VirtAddr,
    pub pages: usize,
}

impl MmapEntry {
    /// Primeiro endereço após o mapeamento
    pub fn end(&self) -> VirtAddr {
        self.base.page_at(self.pages)
    }

    pub fn contains(&self, va: VirtAddr) -> bool {
        va >= self.base && va < self.end()
    }
}

#[derive(Default)]
struct MmapInner {
    entries: Vec<MmapEntry>,
    next_id: u32,
}

#[derive(Default)]
pub struct MmapTable {
    inner: Mutex<MmapInner>,
}

impl MmapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um mapeamento e devolve o próximo id (começa em 0)
    pub fn insert(&self, file: FileHandle, base: VirtAddr, pages: usize) -> MapId {
        let mut inner = self.inner.lock();
        let id = MapId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(MmapEntry {
            id,
            file,
            base,
            pages,
        });
        id
    }

    pub fn get(&self, id: MapId) -> Option<MmapEntry> {
        self.inner.lock().entries.iter().find(|e| e.id == id).copied()
    }

    /// Remove e retorna o mapeamento `id`
    pub fn take(&self, id: MapId) -> Option<MmapEntry> {
        let mut inner = self.inner.lock();
        let idx = inner.entries.iter().position(|e| e.id == id)?;
        Some(inner.entries.remove(idx))
    }

    pub fn ids(&self) -> Vec<MapId> {
        self.inner.lock().entries.iter().map(|e| e.id).collect()
    }

    /// Mapeamento que contém `va`
    pub fn find(&self, va: VirtAddr) -> Option<MmapEntry> {
        self.inner
            .lock()
            .entries
            .iter()
            .find(|e| e.contains(va))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mapeia o arquivo aberto em `fd` a partir de `addr`.
///
/// Rejeita, sem efeito colateral: descritores de console, endereço nulo
/// ou desalinhado, descritor desconhecido, arquivo vazio, intervalo que
/// ultrapasse o espaço de usuário e qualquer sobreposição com páginas já
/// registradas ou mapeadas.
pub fn create_mapping(
    vm: &Vm,
    space: &AddressSpace,
    fd: i32,
    addr: VirtAddr,
) -> MmResult<MapId> {
    if CONSOLE_FDS.contains(&fd) {
        return Err(MmError::BadDescriptor);
    }
    if addr.is_null() {
        return Err(MmError::InvalidAddress);
    }
    if !addr.is_page_aligned() {
        return Err(MmError::NotAligned);
    }
    if !vm.config().is_user_vaddr(addr.as_u64()) {
        return Err(MmError::InvalidAddress);
    }

    let file = vm
        .files()
        .resolve_fd(space.pid(), fd)
        .ok_or(MmError::BadDescriptor)?;
    let length = vm.files().length(file) as usize;
    if length == 0 {
        return Err(MmError::EmptyFile);
    }

    let pages = pages_for(length);
    let end = addr
        .checked_add((pages * PAGE_SIZE) as u64)
        .ok_or(MmError::InvalidAddress)?;
    if end.as_u64() > vm.config().user_top {
        return Err(MmError::InvalidAddress);
    }

    let overlaps = (0..pages).map(|i| addr.page_at(i)).any(|va| {
        space.spt().contains(va) || space.mmu().get_physical(va).is_some()
    });
    if overlaps {
        return Err(MmError::AlreadyMapped);
    }

    let handle = vm.files().reopen(file).ok_or(MmError::ReopenFailed)?;
    let registered = space.spt().register_lazy_range(
        handle,
        0,
        addr,
        length,
        pages * PAGE_SIZE - length,
        true,
        PageKind::Mmap,
    );
    if let Err(e) = registered {
        vm.files().close(handle);
        return Err(e);
    }

    let id = space.mmaps().insert(handle, addr, pages);
    crate::kdebug!("(MMAP) Mapeamento criado em=", addr.as_u64());
    Ok(id)
}

/// Desfaz o mapeamento `id`.
///
/// Páginas residentes e sujas são escritas de volta no arquivo; todas
/// perdem o mapeamento, o frame e o descritor. O handle do mapeamento é
/// fechado. Um writeback curto não interrompe a limpeza: o erro é
/// reportado no fim.
pub fn destroy_mapping(vm: &Vm, space: &AddressSpace, id: MapId) -> MmResult<()> {
    let entry = space.mmaps().take(id).ok_or(MmError::NoSuchMapping)?;
    let mut result = Ok(());

    for i in 0..entry.pages {
        let va = entry.base.page_at(i);
        let Some(page) = space.spt().remove(va) else {
            continue;
        };
        let mut state = page.lock();

        if let Some(frame) = state.frame.take() {
            let flags = space.mmu().clear_mapping(va).unwrap_or(PteFlags::empty());
            let dirty = flags.contains(PteFlags::DIRTY) || state.dirty;
            if let (true, PageOrigin::File(backing)) = (dirty, state.origin) {
                // SAFETY: o frame ainda está registrado para esta página e
                // seguramos o lock do descritor
                let bytes = unsafe { vm.frames().frame_bytes(frame) };
                let written = vm.files().write_at(
                    backing.file,
                    &bytes[..backing.read_bytes],
                    backing.offset,
                );
                if written == backing.read_bytes {
                    VmStats::bump(&vm.stats().writebacks);
                } else {
                    crate::kwarn!("(MMAP) Writeback curto em=", va.as_u64());
                    if result.is_ok() {
                        result = Err(MmError::ShortWrite);
                    }
                }
            }
            vm.frames().release_frame(frame);
        } else if let Some(slot) = state.swap_slot() {
            vm.swap().free_slot(slot);
        }
        state.mark_removed();
    }

    vm.files().close(entry.file);
    crate::kdebug!("(MMAP) Mapeamento destruido em=", entry.base.as_u64());
    result
}

/// Desfaz todos os mapeamentos do processo (exit). Retorna quantos foram
/// destruídos.
pub fn destroy_all(vm: &Vm, space: &AddressSpace) -> usize {
    let ids = space.mmaps().ids();
    for &id in &ids {
        if destroy_mapping(vm, space, id).is_err() {
            crate::kwarn!("(MMAP) Falha no munmap do exit, id=", id.0);
        }
    }
    ids.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_zero_and_are_not_reused() {
        let table = MmapTable::new();
        let a = table.insert(FileHandle(1), VirtAddr::new(0x1000), 1);
        let b = table.insert(FileHandle(2), VirtAddr::new(0x2000), 2);
        assert_eq!((a, b), (MapId(0), MapId(1)));

        assert!(table.take(a).is_some());
        assert!(table.take(a).is_none());
        assert_eq!(table.insert(FileHandle(3), VirtAddr::new(0x9000), 1), MapId(2));
    }

    #[test]
    fn find_covers_every_page_of_the_mapping() {
        let table = MmapTable::new();
        let id = table.insert(FileHandle(1), VirtAddr::new(0x4000), 3);
        assert_eq!(table.find(VirtAddr::new(0x6FFF)).map(|e| e.id), Some(id));
        assert!(table.find(VirtAddr::new(0x7000)).is_none());
        assert!(table.find(VirtAddr::new(0x3FFF)).is_none());
    }
}
