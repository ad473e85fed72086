//! # Page Aging
//!
//! Algoritmo CLOCK com segunda chance, seguido de fallback pela página
//! menos recentemente tocada.

extern crate alloc;

use super::{evict, Attempts, Reclaimer};
use crate::mm::pfm::frame::FrameList;
use alloc::vec::Vec;

/// Passada 1. Retorna o índice da entrada evicted.
///
/// Toda entrada examinada que não vira vítima recebe `tick`.
pub(crate) fn second_chance(
    list: &mut FrameList,
    rc: &Reclaimer<'_>,
    tick: u64,
    attempts: &mut Attempts,
) -> Option<usize> {
    let len = list.entries.len();
    let start = list.hand % len;

    for step in 0..len {
        let idx = (start + step) % len;
        let entry = list.entries[idx];
        let Some((space, page)) = rc.resolve(&entry) else {
            continue;
        };

        let mmu = space.mmu();
        if mmu.is_accessed(page.va()) {
            mmu.clear_accessed(page.va());
            page.touch(tick);
            continue;
        }

        let Some(mut state) = page.try_lock() else {
            page.touch(tick);
            continue;
        };
        match evict::evict_locked(rc, &space, &page, &mut state, entry.frame) {
            Ok(()) => {
                list.hand = (idx + 1) % len;
                return Some(idx);
            }
            Err(e) => {
                page.touch(tick);
                attempts.note(e);
            }
        }
    }
    None
}

/// Passada 2. Tenta as entradas em ordem crescente de `last_touched`.
pub(crate) fn oldest(
    list: &mut FrameList,
    rc: &Reclaimer<'_>,
    attempts: &mut Attempts,
) -> Option<usize> {
    let mut order: Vec<(u64, usize)> = list
        .entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            rc.resolve(entry)
                .map(|(_, page)| (page.last_touched(), idx))
        })
        .collect();
    order.sort_unstable();

    for (_, idx) in order {
        let entry = list.entries[idx];
        let Some((space, page)) = rc.resolve(&entry) else {
            continue;
        };
        let Some(mut state) = page.try_lock() else {
            continue;
        };
        match evict::evict_locked(rc, &space, &page, &mut state, entry.frame) {
            Ok(()) => {
                list.hand = (idx + 1) % list.entries.len();
                return Some(idx);
            }
            Err(e) => attempts.note(e),
        }
    }
    None
}
