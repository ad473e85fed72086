//! Traits do HAL
//!
//! Define as interfaces abstratas para os serviços externos.

pub mod file;
pub mod mmu;
pub mod pool;
pub mod process;

pub use file::*;
pub use mmu::*;
pub use pool::*;
pub use process::*;
