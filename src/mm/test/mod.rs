//! Testes de cenário da camada de VM
//!
//! Rodam no host. `harness` monta uma máquina simulada (pool de frames,
//! MMU por processo, sistema de arquivos em memória, disco de swap) e os
//! demais módulos exercitam a VM através dela.


mod exit_test;
mod mmap_test;
