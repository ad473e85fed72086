//! # Page Fault Handler
//!
//! Decide o que fazer com um page fault de usuário:
//!
//! ```text
//! endereço nulo / kernel ............ inválido (mata o processo)
//! página com descritor
//!   escrita em página RO ............ violação de proteção
//!   residente ....................... espúrio (reinstala PTE se preciso)
//!   origem arquivo .................. carrega do arquivo
//!   origem swap ..................... carrega do swap
//! página sem descritor .............. tenta crescer a stack
//! ```

extern crate alloc;

use crate::hal::PteFlags;
use crate::mm::aspace::load;
use crate::mm::aspace::{AddressSpace, Page, PageOrigin, PageRef};
use crate::mm::config::KILLED_EXIT_STATUS;
use crate::mm::error::{MmError, MmResult};
use crate::mm::stats::VmStats;
use crate::mm::{VirtAddr, Vm};

/// Como um fault foi resolvido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultResolution {
    LoadedFromFile,
    LoadedFromSwap,
    StackGrown,
    /// A página já estava residente (outra thread resolveu primeiro)
    AlreadyResident,
}

/// Decisão final para o processo que faltou
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Retomar a instrução
    Resolved(FaultResolution),
    /// Terminar o processo com este status
    Kill(i32),
}

/// Resolve um fault em `addr` no espaço `space`.
///
/// `esp` é o stack pointer de usuário no momento do fault (usado só na
/// decisão de crescimento de stack).
pub fn dispatch_fault(
    vm: &Vm,
    space: &AddressSpace,
    addr: VirtAddr,
    is_write: bool,
    esp: VirtAddr,
) -> MmResult<FaultResolution> {
    VmStats::bump(&vm.stats().page_faults);

    if !vm.config().is_user_vaddr(addr.as_u64()) {
        return Err(MmError::InvalidAddress);
    }

    if let Some((page_ref, page)) = space.spt().lookup(addr) {
        return resolve_known(vm, space, page_ref, &page, is_write);
    }

    match load::grow_stack(vm, space, addr, esp) {
        Ok(()) => Ok(FaultResolution::StackGrown),
        // Outra thread registrou a página entre o lookup e o insert
        Err(MmError::AlreadyMapped) => {
            let (page_ref, page) = space.spt().lookup(addr).ok_or(MmError::NotMapped)?;
            resolve_known(vm, space, page_ref, &page, is_write)
        }
        Err(e) => Err(e),
    }
}

pub(crate) fn resolve_known(
    vm: &Vm,
    space: &AddressSpace,
    page_ref: PageRef,
    page: &Page,
    is_write: bool,
) -> MmResult<FaultResolution> {
    if is_write && !page.writable() {
        return Err(MmError::ProtectionViolation);
    }

    let mut state = page.lock();

    if let Some(frame) = state.frame {
        let mmu = space.mmu();
        if mmu.get_physical(page.va()).is_none() {
            if !mmu.install_mapping(page.va(), frame, page.writable()) {
                return Err(MmError::MappingFailed);
            }
            // Uma eviction que falhou e não conseguiu restaurar a PTE
            if core::mem::take(&mut state.dirty) {
                mmu.update_flags(page.va(), PteFlags::DIRTY, PteFlags::empty());
            }
        }
        VmStats::bump(&vm.stats().spurious_faults);
        return Ok(FaultResolution::AlreadyResident);
    }

    match state.origin {
        PageOrigin::File(_) => load::load_file_locked(vm, space, page_ref, page, &mut state)
            .map(|()| FaultResolution::LoadedFromFile),
        PageOrigin::Swapped(_) => load::load_swap_locked(vm, space, page_ref, page, &mut state)
            .map(|()| FaultResolution::LoadedFromSwap),
        // Descritor abandonado por um crescimento de stack que falhou
        PageOrigin::Anonymous => Err(MmError::NotMapped),
    }
}

/// Ponto de entrada do handler de exceção para faults de usuário.
///
/// Qualquer erro de `dispatch_fault` vira `Kill`: o kernel nunca entra em
/// pânico por causa de um fault de usuário.
pub fn handle_user_fault(
    vm: &Vm,
    space: &AddressSpace,
    addr: VirtAddr,
    is_write: bool,
    esp: VirtAddr,
) -> FaultOutcome {
    match dispatch_fault(vm, space, addr, is_write, esp) {
        Ok(resolution) => FaultOutcome::Resolved(resolution),
        Err(e) => {
            VmStats::bump(&vm.stats().kills);
            crate::kwarn!("(FAULT) Fault nao resolvido, addr=", addr.as_u64());
            crate::kwarn!(e.as_str());
            FaultOutcome::Kill(KILLED_EXIT_STATUS)
        }
    }
}

/// Igual a [`handle_user_fault`], para o processo em execução
pub fn handle_current_fault(vm: &Vm, addr: VirtAddr, is_write: bool, esp: VirtAddr) -> FaultOutcome {
    match vm.current_space() {
        Ok(space) => handle_user_fault(vm, &space, addr, is_write, esp),
        Err(_) => {
            crate::kerror!("(FAULT) Fault sem processo corrente, addr=", addr.as_u64());
            FaultOutcome::Kill(KILLED_EXIT_STATUS)
        }
    }
}
