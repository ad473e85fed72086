//! # Memory Management Subsystem (MM)
//!
//! Camada de memória virtual de usuário: paginação sob demanda, swap,
//! crescimento de stack e arquivos mapeados em memória.
//!
//! ## 🏗️ Arquitetura dos Módulos
//!
//! | Módulo    | Responsabilidade                                              |
//! |-----------|---------------------------------------------------------------|
//! | `pfm`     | Frame Table global: dono e página de cada frame de usuário.   |
//! | `reclaim` | Escolha de vítima (relógio + mais antiga) e eviction.         |
//! | `swap`    | Slots de página no dispositivo de swap.                       |
//! | `aspace`  | Por processo: SPT, descritores, carga sob demanda e mmap.     |
//! | `fault`   | Despacho de page faults de usuário.                           |
//! | `stats`   | Contadores.                                                   |
//!
//! ---------------------------------------------------------------------
//! CONTEXTO DE SERVIÇOS
//! ---------------------------------------------------------------------
//!
//! Não há singletons. O kernel constrói um [`Vm`] uma vez, com o pool de
//! frames, o dispositivo de swap, o serviço de arquivos e o diretório de
//! processos, e o passa por referência para as operações.
//!
//! ---------------------------------------------------------------------
//! HIERARQUIA DE LOCKS
//! ---------------------------------------------------------------------
//!
//! ```text
//! descritor de página ──▶ Frame Table ──▶ pool / MMU / swap bitmap
//!        │                    │
//!        └──▶ mapa da SPT ◀───┘  (curto, nunca segurado durante I/O)
//! ```
//!
//! - Quem segura um descritor pode pegar o lock da Frame Table.
//! - Quem segura a Frame Table **nunca espera** por um descritor: faz
//!   `try_lock` e pula o ocupado.
//! - O lock do mapa da SPT protege só a estrutura; nenhuma operação de I/O
//!   ou espera acontece com ele.

pub mod addr;
pub mod aspace;
pub mod config;
pub mod error;
pub mod fault;
pub mod pfm;
pub mod reclaim;
pub mod stats;
pub mod swap;
pub mod vm;

#[cfg(test)]
mod test;

pub use addr::{PhysAddr, VirtAddr};
pub use aspace::AddressSpace;
pub use config::{VmConfig, PAGE_SIZE};
pub use error::{MmError, MmResult};
pub use fault::{FaultOutcome, FaultResolution};
pub use vm::Vm;
