//! # Configuração do Módulo de Memória Virtual
//!
//! Define constantes, configuração de runtime e utilitários de alinhamento.

// =============================================================================
// CONSTANTES DE TAMANHO
// =============================================================================

/// Tamanho de uma página (4 KiB)
pub const PAGE_SIZE: usize = 4096;

/// Tamanho de um setor do dispositivo de swap
pub const SECTOR_SIZE: usize = 512;

/// Setores por página (a página é múltiplo exato do setor)
pub const SECTORS_PER_PAGE: usize = PAGE_SIZE / SECTOR_SIZE;

// =============================================================================
// LAYOUT DE MEMÓRIA VIRTUAL DO USUÁRIO
// =============================================================================

/// Primeiro endereço que NÃO pertence ao usuário (topo da stack inicial).
/// Tudo a partir daqui é kernel.
pub const USER_TOP: u64 = 0xC000_0000;

/// Tamanho máximo da stack de usuário (8 MiB)
pub const STACK_LIMIT: u64 = 1 << 23;

/// Distância máxima abaixo do stack pointer aceita como acesso à stack.
/// `PUSHA` escreve 32 bytes abaixo de `esp` antes de ajustá-lo.
pub const STACK_PROBE_WINDOW: u64 = 32;

// =============================================================================
// DESCRITORES ESPECIAIS
// =============================================================================

/// Descritores do console (stdin/stdout) nunca são mapeáveis
pub const CONSOLE_FDS: [i32; 2] = [0, 1];

/// Status de saída de um processo morto por fault não resolvido
pub const KILLED_EXIT_STATUS: i32 = -1;

// =============================================================================
// CONFIGURAÇÃO DE RUNTIME
// =============================================================================

/// Parâmetros ajustáveis da VM, fixados na construção de [`crate::mm::Vm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Topo do espaço de usuário
    pub user_top: u64,
    /// Limite de crescimento da stack
    pub stack_limit: u64,
    /// Janela de probe abaixo do stack pointer
    pub stack_probe_window: u64,
}

impl VmConfig {
    pub const fn new() -> Self {
        Self {
            user_top: USER_TOP,
            stack_limit: STACK_LIMIT,
            stack_probe_window: STACK_PROBE_WINDOW,
        }
    }

    /// Verifica se `addr` é um endereço de usuário válido (não nulo, abaixo do topo)
    #[inline]
    pub const fn is_user_vaddr(&self, addr: u64) -> bool {
        addr != 0 && addr < self.user_top
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FUNÇÕES UTILITÁRIAS
// =============================================================================

/// Alinha valor para cima ao múltiplo de align
#[inline(always)]
pub const fn align_up(val: usize, align: usize) -> usize {
    (val + align - 1) & !(align - 1)
}

/// Alinha valor para baixo ao múltiplo de align
#[inline(always)]
pub const fn align_down(val: usize, align: usize) -> usize {
    val & !(align - 1)
}

/// Verifica se valor está alinhado
#[inline(always)]
pub const fn is_aligned(val: usize, align: usize) -> bool {
    val & (align - 1) == 0
}

/// Número de páginas necessárias para cobrir `bytes`
#[inline(always)]
pub const fn pages_for(bytes: usize) -> usize {
    align_up(bytes, PAGE_SIZE) / PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_geometry() {
        assert_eq!(SECTORS_PER_PAGE * SECTOR_SIZE, PAGE_SIZE);
        assert_eq!(pages_for(0), 0);
        assert_eq!(pages_for(1), 1);
        assert_eq!(pages_for(PAGE_SIZE), 1);
        assert_eq!(pages_for(PAGE_SIZE + 1), 2);
    }

    #[test]
    fn user_vaddr_bounds() {
        let config = VmConfig::default();
        assert!(!config.is_user_vaddr(0));
        assert!(config.is_user_vaddr(0x1000));
        assert!(config.is_user_vaddr(USER_TOP - 1));
        assert!(!config.is_user_vaddr(USER_TOP));
    }
}
