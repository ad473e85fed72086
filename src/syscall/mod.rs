//! Syscalls da camada de memória virtual
//!
//! Superfície que a VM expõe ao despacho de syscalls do kernel.
//!
//! # Módulos
//!
//! - `abi`: Argumentos crus de syscall
//! - `error`: Códigos de erro (SysError)
//! - `memory`: mmap, munmap e acesso a buffers de usuário
//! - `process`: teardown do espaço de endereçamento no exit

pub mod abi;
pub mod error;

// Módulos de implementação
pub mod memory;
pub mod process;

// Re-exports principais
pub use abi::SyscallArgs;
pub use error::{SysError, SysResult};
