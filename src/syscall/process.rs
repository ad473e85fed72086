//! # Process Lifecycle
//!
//! Parte do exit que cabe à VM.

use crate::mm::aspace::{mmap, AddressSpace};
use crate::mm::Vm;

/// Libera todo o estado de VM de um processo que está terminando.
///
/// Ordem: primeiro os mapeamentos (com writeback das páginas sujas), depois
/// os demais descritores (sem writeback), por fim as entradas restantes da
/// Frame Table. Depois disto o processo não tem frames nem slots de swap.
pub fn exit_address_space(vm: &Vm, space: &AddressSpace) {
    let mappings = mmap::destroy_all(vm, space);
    let pages = space.destroy_all_pages(vm);
    crate::kinfo!("(VM) Exit do processo, pid=", space.pid());
    crate::ktrace!("(VM) Mapeamentos destruidos=", mappings);
    crate::ktrace!("(VM) Paginas destruidas=", pages);
}
