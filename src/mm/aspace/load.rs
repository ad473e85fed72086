//! # Carregamento sob demanda
//!
//! Traz uma página não residente para a memória: do arquivo, do swap, ou
//! (para a stack) como página zerada nova. Todo o trabalho é feito com o
//! lock do descritor; o frame vem de `FrameTable::acquire_frame`.

extern crate alloc;

use super::page::{Page, PageKind, PageOrigin, PageState};
use super::spt::PageRef;
use super::AddressSpace;
use crate::mm::error::{MmError, MmResult};
use crate::mm::stats::VmStats;
use crate::mm::{PhysAddr, VirtAddr, Vm};
use alloc::sync::Arc;

/// Carrega a página de `va` a partir do arquivo de origem.
///
/// No-op se a página já estiver residente (outra thread ganhou a corrida).
pub fn fault_load_file(vm: &Vm, space: &AddressSpace, va: VirtAddr) -> MmResult<()> {
    let (page_ref, page) = space.spt().lookup(va).ok_or(MmError::NotMapped)?;
    let mut state = page.lock();
    if state.is_resident() {
        return Ok(());
    }
    load_file_locked(vm, space, page_ref, &page, &mut state)
}

/// Carrega a página de `va` a partir do swap. No-op se já residente.
pub fn fault_load_swap(vm: &Vm, space: &AddressSpace, va: VirtAddr) -> MmResult<()> {
    let (page_ref, page) = space.spt().lookup(va).ok_or(MmError::NotMapped)?;
    let mut state = page.lock();
    if state.is_resident() {
        return Ok(());
    }
    load_swap_locked(vm, space, page_ref, &page, &mut state)
}

pub(crate) fn load_file_locked(
    vm: &Vm,
    space: &AddressSpace,
    page_ref: PageRef,
    page: &Page,
    state: &mut PageState,
) -> MmResult<()> {
    if state.removed {
        return Err(MmError::NotMapped);
    }
    let PageOrigin::File(backing) = state.origin else {
        return Err(MmError::NotMapped);
    };

    let frame = vm.frames().acquire_frame(space.pid(), page_ref)?;
    // SAFETY: o frame está registrado para `page_ref`, cujo lock seguramos
    let bytes = unsafe { vm.frames().frame_bytes(frame) };

    let read = vm.files().read_at(
        backing.file,
        &mut bytes[..backing.read_bytes],
        backing.offset,
    );
    if read != backing.read_bytes {
        crate::kwarn!("(SPT) Leitura curta em=", page.va().as_u64());
        vm.frames().release_frame(frame);
        return Err(MmError::ShortRead);
    }
    bytes[backing.read_bytes..].fill(0);

    install(vm, space, page, state, frame)?;
    VmStats::bump(&vm.stats().file_loads);
    crate::ktrace!("(SPT) Pagina carregada do arquivo=", page.va().as_u64());
    Ok(())
}

pub(crate) fn load_swap_locked(
    vm: &Vm,
    space: &AddressSpace,
    page_ref: PageRef,
    page: &Page,
    state: &mut PageState,
) -> MmResult<()> {
    if state.removed {
        return Err(MmError::NotMapped);
    }
    let Some(slot) = state.swap_slot() else {
        return Err(MmError::NotMapped);
    };

    let frame = vm.frames().acquire_frame(space.pid(), page_ref)?;
    // SAFETY: idem `load_file_locked`
    let bytes = unsafe { vm.frames().frame_bytes(frame) };
    if let Err(e) = vm.swap().read_slot(slot, bytes) {
        vm.frames().release_frame(frame);
        return Err(e);
    }

    install(vm, space, page, state, frame)?;

    // O slot só é liberado depois que a página está instalada
    vm.swap().free_slot(slot);
    state.origin = PageOrigin::Anonymous;
    VmStats::bump(&vm.stats().swap_ins);
    crate::ktrace!("(SPT) Pagina trazida do swap=", page.va().as_u64());
    Ok(())
}

/// Cria uma página de stack zerada para `fault_addr`.
///
/// Aceita o acesso se ele estiver no máximo `stack_probe_window` bytes
/// abaixo de `esp` e se a página ficar dentro de `stack_limit` do topo do
/// espaço de usuário.
pub fn grow_stack(
    vm: &Vm,
    space: &AddressSpace,
    fault_addr: VirtAddr,
    esp: VirtAddr,
) -> MmResult<()> {
    let config = vm.config();
    if !config.is_user_vaddr(fault_addr.as_u64()) {
        return Err(MmError::InvalidAddress);
    }
    if fault_addr.as_u64() < esp.as_u64().saturating_sub(config.stack_probe_window) {
        return Err(MmError::StackLimit);
    }
    let va = fault_addr.page_base();
    if config.user_top - va.as_u64() > config.stack_limit {
        return Err(MmError::StackLimit);
    }

    // O descritor entra na SPT já bloqueado: a eviction não o toca e outra
    // thread que falte no mesmo endereço espera aqui.
    let page = Arc::new(Page::new(va, PageKind::Stack, true, PageOrigin::Anonymous));
    let mut state = page.lock();
    let page_ref = space.spt().insert(page.clone())?;

    let frame = match vm.frames().acquire_frame(space.pid(), page_ref) {
        Ok(frame) => frame,
        Err(e) => {
            space.spt().remove(va);
            return Err(e);
        }
    };
    // SAFETY: idem `load_file_locked`
    unsafe { vm.frames().frame_bytes(frame) }.fill(0);

    if let Err(e) = install(vm, space, &page, &mut state, frame) {
        space.spt().remove(va);
        return Err(e);
    }
    VmStats::bump(&vm.stats().stack_growths);
    crate::ktrace!("(SPT) Stack cresceu para=", va.as_u64());
    Ok(())
}

/// Instala `frame` na MMU do processo e marca a página como residente.
/// Em falha, o frame volta ao pool.
pub(crate) fn install(
    vm: &Vm,
    space: &AddressSpace,
    page: &Page,
    state: &mut PageState,
    frame: PhysAddr,
) -> MmResult<()> {
    if !space.mmu().install_mapping(page.va(), frame, page.writable()) {
        crate::kerror!("(SPT) MMU recusou mapeamento em=", page.va().as_u64());
        vm.frames().release_frame(frame);
        return Err(MmError::MappingFailed);
    }
    state.frame = Some(frame);
    page.touch(vm.frames().now());
    Ok(())
}
