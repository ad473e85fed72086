//! # Memory Syscalls
//!
//! Mapeamento de arquivos e acesso seguro a buffers de usuário.

pub mod mmap;
pub mod uaccess;

pub use mmap::{sys_mmap, sys_munmap, MAP_FAILED};
pub use uaccess::{prefault_user_buffer, validate_user_ptr};
