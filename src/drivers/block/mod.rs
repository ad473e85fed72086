//! # Dispositivos de Bloco
//!
//! Interface de dispositivo de bloco consumida pelo Swap Store.
//!
//! | Driver      | Status      | Descrição                         |
//! |-------------|-------------|-----------------------------------|
//! | Ramdisk     | Funcional   | Disco em memória (swap de testes) |
//!
//! Drivers reais (ATA, VirtIO-BLK) vivem no kernel e entram aqui apenas
//! através da trait [`BlockDevice`].

pub mod ramdisk;
pub mod traits;

pub use ramdisk::RamDisk;
pub use traits::{BlockDevice, BlockError};
