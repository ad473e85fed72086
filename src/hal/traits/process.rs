//! Diretório de processos

extern crate alloc;

use crate::mm::AddressSpace;
use alloc::sync::Arc;

/// ID de processo
pub type Pid = u32;

/// Resolve processos em espaços de endereçamento.
///
/// A Frame Table guarda apenas o `Pid` do dono de cada frame; na eviction
/// ela consulta este diretório para chegar à MMU e à SPT do dono.
pub trait ProcessDirectory: Send + Sync {
    /// Processo em execução na CPU atual
    fn current_process(&self) -> Pid;

    /// Espaço de endereçamento de `pid`, se o processo ainda existir
    fn lookup(&self, pid: Pid) -> Option<Arc<AddressSpace>>;
}
