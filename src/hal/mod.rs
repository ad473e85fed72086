//! Hardware Abstraction Layer (HAL)
//!
//! Contratos que a camada de VM espera do resto do kernel.
//!
//! A VM não conhece o sistema de arquivos, o alocador de frames de usuário,
//! o formato da tabela de páginas nem a tabela de processos. Cada um deles
//! chega como um trait object, injetado na construção de [`crate::mm::Vm`]
//! (ou de [`crate::mm::AddressSpace`], no caso da MMU, que é por processo).

pub mod traits;

pub use traits::*;
