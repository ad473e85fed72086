//! Forge VM.
//!
//! Camada de memória virtual de usuário do kernel Forge: paginação sob
//! demanda, Frame Table com eviction, swap, crescimento de stack e
//! arquivos mapeados em memória.
//!
//! O crate é `no_std` + `alloc`. Os testes rodam no host, com dublês dos
//! serviços externos (pool de frames, MMU, sistema de arquivos, disco).

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Módulos de Baixo Nível ---
pub mod drivers; // Sink serial de log, dispositivo de bloco do swap
pub mod hal; // Contratos dos serviços externos

// --- Módulos Centrais ---
pub mod core; // Logging
pub mod klib; // Utilitários Internos (Bitmap)
pub mod mm; // Memória Virtual

// --- Interface com Userspace ---
pub mod syscall;
