//! Pool de frames de usuário

use crate::mm::PhysAddr;

/// Alocador de frames físicos destinados a páginas de usuário.
///
/// O conteúdo de um frame recém-alocado é indefinido.
pub trait UserPool: Send + Sync {
    /// Aloca um frame. `None` quando o pool está vazio.
    fn allocate_user_page(&self) -> Option<PhysAddr>;

    /// Devolve um frame ao pool
    fn free_page(&self, frame: PhysAddr);

    /// Ponteiro de acesso direto (direct map) aos bytes do frame.
    ///
    /// O ponteiro cobre `PAGE_SIZE` bytes e permanece válido enquanto o
    /// frame estiver alocado.
    fn frame_ptr(&self, frame: PhysAddr) -> *mut u8;

    /// Número total de frames gerenciados pelo pool
    fn total_frames(&self) -> usize;
}
