//! # Eviction Engine
//!
//! Tira uma página residente da memória, preservando o conteúdo onde for
//! preciso:
//!
//! | Origem   | Tipo         | Suja | Destino                      |
//! |----------|--------------|------|------------------------------|
//! | Arquivo  | qualquer     | não  | descartada (recarrega do FS) |
//! | Arquivo  | Mmap         | sim  | escrita de volta no arquivo  |
//! | Arquivo  | Executable   | sim  | swap                         |
//! | Anônima  | qualquer     | -    | swap                         |

use super::Reclaimer;
use crate::hal::{Mmu, PteFlags};
use crate::mm::aspace::{AddressSpace, Page, PageKind, PageOrigin, PageState};
use crate::mm::error::{MmError, MmResult};
use crate::mm::pfm::frame_bytes;
use crate::mm::stats::VmStats;
use crate::mm::PhysAddr;

/// Evicta `page`, cujo lock o chamador segura em `state`.
///
/// O mapeamento é removido antes de copiar o conteúdo, e as flags
/// retornadas pela remoção decidem se a página está suja. Em caso de falha
/// o mapeamento é restaurado com as mesmas flags e a página continua
/// residente.
pub(crate) fn evict_locked(
    rc: &Reclaimer<'_>,
    space: &AddressSpace,
    page: &Page,
    state: &mut PageState,
    frame: PhysAddr,
) -> MmResult<()> {
    if state.frame != Some(frame) {
        return Err(MmError::NotMapped);
    }

    let va = page.va();
    let mmu = space.mmu();
    let mut flags = mmu.clear_mapping(va).unwrap_or(PteFlags::empty());
    if state.dirty {
        flags |= PteFlags::DIRTY;
    }
    let dirty = flags.contains(PteFlags::DIRTY);

    // SAFETY: a Frame Table está bloqueada e o lock do descritor dono do
    // frame está em `state`; o mapeamento de usuário acabou de ser removido.
    let bytes = unsafe { frame_bytes(rc.pool, frame) };

    match state.origin {
        PageOrigin::File(_) if !dirty => {
            VmStats::bump(&rc.stats.discards);
        }
        PageOrigin::File(backing) if page.kind() == PageKind::Mmap => {
            let written = rc
                .files
                .write_at(backing.file, &bytes[..backing.read_bytes], backing.offset);
            if written != backing.read_bytes {
                crate::kwarn!("(FRAME) Writeback curto de mmap em=", va.as_u64());
                restore(mmu, page, state, frame, flags);
                return Err(MmError::ShortWrite);
            }
            VmStats::bump(&rc.stats.writebacks);
        }
        _ => match rc.swap.write_page(bytes) {
            Ok(slot) => {
                state.origin = PageOrigin::Swapped(slot);
                VmStats::bump(&rc.stats.swap_outs);
            }
            Err(e) => {
                restore(mmu, page, state, frame, flags);
                return Err(e);
            }
        },
    }

    state.frame = None;
    state.dirty = false;
    bytes.fill(0);
    VmStats::bump(&rc.stats.evictions);
    crate::ktrace!("(FRAME) Pagina evicted=", va.as_u64());
    Ok(())
}

/// Reinstala um mapeamento removido por uma eviction que não pôde
/// terminar, devolvendo os bits de hardware que ele tinha.
///
/// Se a MMU recusar, a página fica residente sem PTE e o bit DIRTY fica
/// guardado no descritor até o próximo fault reinstalar o mapeamento.
fn restore(mmu: &dyn Mmu, page: &Page, state: &mut PageState, frame: PhysAddr, flags: PteFlags) {
    let va = page.va();
    if mmu.install_mapping(va, frame, page.writable()) {
        mmu.update_flags(
            va,
            flags & (PteFlags::ACCESSED | PteFlags::DIRTY),
            PteFlags::empty(),
        );
        state.dirty = false;
    } else {
        crate::kerror!("(FRAME) Falha ao restaurar mapeamento em=", va.as_u64());
        state.dirty = flags.contains(PteFlags::DIRTY);
    }
}
