//! Bitmap genérico
//!
//! Usado pelo Swap Store para rastrear slots livres (0) e ocupados (1).

use alloc::vec;
use alloc::vec::Vec;

/// Bitmap para gerenciamento de bits
pub struct Bitmap {
    data: Vec<u64>,
    len: usize,
}

impl Bitmap {
    /// Cria bitmap com `bits` bits, todos zerados
    pub fn new(bits: usize) -> Self {
        Self {
            data: vec![0; bits.div_ceil(64)],
            len: bits,
        }
    }

    /// Número de bits rastreados
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Define um bit
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.data[index / 64] |= 1 << (index % 64);
    }

    /// Limpa um bit
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.data[index / 64] &= !(1 << (index % 64));
    }

    /// Testa um bit
    pub fn test(&self, index: usize) -> bool {
        debug_assert!(index < self.len);
        (self.data[index / 64] & (1 << (index % 64))) != 0
    }

    /// Encontra primeiro bit livre (0)
    pub fn find_first_zero(&self) -> Option<usize> {
        for (i, &word) in self.data.iter().enumerate() {
            if word != u64::MAX {
                let index = i * 64 + word.trailing_ones() as usize;
                if index < self.len {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Encontra o primeiro bit livre, marca como ocupado e retorna o índice
    pub fn scan_and_set(&mut self) -> Option<usize> {
        let index = self.find_first_zero()?;
        self.set(index);
        Some(index)
    }

    /// Quantidade de bits ocupados
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }
}
