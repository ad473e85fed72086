//! # User Memory Access
//!
//! Validação de ponteiros e pré-carga de buffers de usuário antes de o
//! kernel tocá-los.
//!
//! Um buffer passado a `read`/`write` pode cair em páginas ainda não
//! carregadas (ou de stack ainda não criada). O kernel não pode tomar esse
//! fault no meio da cópia segurando locks do sistema de arquivos, então a
//! syscall chama [`prefault_user_buffer`] antes.

use crate::mm::aspace::AddressSpace;
use crate::mm::error::{MmError, MmResult};
use crate::mm::fault;
use crate::mm::{VirtAddr, Vm};

/// Páginas que cobrem `[addr, addr + len)`, ou só a de `addr` se `len == 0`
fn covering_pages(addr: VirtAddr, len: usize) -> MmResult<impl Iterator<Item = VirtAddr>> {
    let last = addr
        .checked_add(len.saturating_sub(1) as u64)
        .ok_or(MmError::InvalidAddress)?
        .page_base();
    let first = addr.page_base();
    let count = ((last.as_u64() - first.as_u64()) as usize / crate::mm::PAGE_SIZE) + 1;
    Ok((0..count).map(move |i| first.page_at(i)))
}

/// Verifica se `[addr, addr + len)` está inteiro no espaço de usuário e
/// se cada página dele está mapeada ou registrada na SPT.
pub fn validate_user_ptr(vm: &Vm, space: &AddressSpace, addr: usize, len: usize) -> bool {
    let addr = VirtAddr::new(addr as u64);
    let Ok(mut pages) = covering_pages(addr, len) else {
        return false;
    };
    let end = addr.as_u64().saturating_add(len as u64);
    if !vm.config().is_user_vaddr(addr.as_u64()) || end > vm.config().user_top {
        return false;
    }

    pages.all(|va| space.mmu().get_physical(va).is_some() || space.spt().contains(va))
}

/// Garante que toda página de `[addr, addr + len)` está residente, tratando
/// cada uma como um fault (incluindo crescimento de stack a partir de
/// `esp`).
///
/// `is_write` indica que o kernel vai escrever no buffer (ex.: `read`).
/// Em erro o chamador deve matar o processo, como num fault não resolvido.
pub fn prefault_user_buffer(
    vm: &Vm,
    space: &AddressSpace,
    addr: usize,
    len: usize,
    is_write: bool,
    esp: usize,
) -> MmResult<()> {
    let addr = VirtAddr::new(addr as u64);
    let esp = VirtAddr::new(esp as u64);

    for va in covering_pages(addr, len)? {
        // Dentro da primeira página, o endereço real importa para a janela
        // de probe da stack
        let probe = if va == addr.page_base() { addr } else { va };
        if space.mmu().get_physical(va).is_some() {
            if is_write && !space.mmu().is_writable(va) {
                return Err(MmError::ProtectionViolation);
            }
            continue;
        }
        fault::dispatch_fault(vm, space, probe, is_write, esp)?;
    }
    Ok(())
}
