//! # Addr - Wrappers Type-Safe para Endereços
//!
//! Tipos distintos para PhysAddr e VirtAddr evitando confusão.

mod phys;
mod virt;

pub use phys::PhysAddr;
pub use virt::VirtAddr;
