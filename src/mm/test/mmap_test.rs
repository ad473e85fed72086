//! Testes de mmap/munmap no nível do address space

use super::harness::{pattern, Machine, Process};
use crate::mm::aspace::mmap::{create_mapping, destroy_all, destroy_mapping};
use crate::mm::aspace::{MapId, PageKind};
use crate::hal::Mmu;
use crate::mm::config::{KILLED_EXIT_STATUS, USER_TOP};
use crate::mm::fault::resolve_known;
use crate::mm::{MmError, VirtAddr, PAGE_SIZE};

const BASE: u64 = 0x1000_0000;
const FD: i32 = 3;

fn map(m: &Machine, p: &Process, fd: i32, addr: u64) -> Result<MapId, MmError> {
    create_mapping(&m.vm, &p.space, fd, VirtAddr::new(addr))
}

/// Checa que uma rejeição não deixou rastro
fn assert_untouched(m: &Machine, p: &Process, handles: usize, pages: usize) {
    assert_eq!(m.fs.open_handles(), handles);
    assert_eq!(p.space.spt().len(), pages);
    assert!(p.space.mmaps().is_empty());
}

#[test]
fn console_descriptors_are_never_mappable() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, 0, b"stdin");
    m.fs.open_as(1, 1, b"stdout");

    assert_eq!(map(&m, &p, 0, BASE), Err(MmError::BadDescriptor));
    assert_eq!(map(&m, &p, 1, BASE), Err(MmError::BadDescriptor));
    assert_untouched(&m, &p, 2, 0);
}

#[test]
fn bad_addresses_are_rejected() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 100));

    assert_eq!(map(&m, &p, FD, 0), Err(MmError::InvalidAddress));
    assert_eq!(map(&m, &p, FD, BASE + 0x10), Err(MmError::NotAligned));
    assert_eq!(map(&m, &p, FD, USER_TOP), Err(MmError::InvalidAddress));
    assert_untouched(&m, &p, 1, 0);
}

#[test]
fn unknown_descriptor_and_empty_file_are_rejected() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, b"");

    assert_eq!(map(&m, &p, 9, BASE), Err(MmError::BadDescriptor));
    assert_eq!(map(&m, &p, FD, BASE), Err(MmError::EmptyFile));
    // O descritor de outro processo não vale aqui
    m.fs.open_as(2, 4, b"alheio");
    assert_eq!(map(&m, &p, 4, BASE), Err(MmError::BadDescriptor));
    assert_untouched(&m, &p, 2, 0);
}

#[test]
fn overlap_with_existing_pages_is_rejected() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.load_segment(&p, BASE + PAGE_SIZE as u64, &pattern(0, 10), false);
    m.fs.open_as(1, FD, &pattern(1, 2 * PAGE_SIZE));

    assert_eq!(map(&m, &p, FD, BASE), Err(MmError::AlreadyMapped));
    assert_untouched(&m, &p, 2, 1);

    // Página de stack já residente também conta
    m.write(&p, USER_TOP - 8, b"s").unwrap();
    assert_eq!(
        map(&m, &p, FD, USER_TOP - 2 * PAGE_SIZE as u64),
        Err(MmError::AlreadyMapped)
    );
}

#[test]
fn mapping_may_not_cross_into_the_kernel() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, PAGE_SIZE + 1));

    assert_eq!(
        map(&m, &p, FD, USER_TOP - PAGE_SIZE as u64),
        Err(MmError::InvalidAddress)
    );
    assert_untouched(&m, &p, 1, 0);
}

#[test]
fn reopen_failure_is_reported() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 10));
    m.fs.set_refuse_reopen(true);

    assert_eq!(map(&m, &p, FD, BASE), Err(MmError::ReopenFailed));
    assert_untouched(&m, &p, 1, 0);
}

#[test]
fn mapping_is_lazy_and_zero_padded() {
    let m = Machine::new(4, 2);
    let p = m.spawn(1);
    let contents = pattern(7, 5000);
    m.fs.open_as(1, FD, &contents);

    let id = map(&m, &p, FD, BASE).unwrap();
    assert_eq!(id, MapId(0));
    assert_eq!(p.space.spt().len(), 2);
    assert_eq!(p.mmu.mapped_pages(), 0);

    let (_, page) = p.space.spt().lookup(VirtAddr::new(BASE)).unwrap();
    assert_eq!(page.kind(), PageKind::Mmap);
    assert!(page.writable());

    let bytes = m.read(&p, BASE, 2 * PAGE_SIZE).unwrap();
    assert_eq!(&bytes[..5000], &contents[..]);
    assert!(bytes[5000..].iter().all(|&b| b == 0));
}

#[test]
fn ids_increase_per_process() {
    let m = Machine::new(4, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 10));
    m.fs.open_as(1, 4, &pattern(1, 10));

    assert_eq!(map(&m, &p, FD, BASE), Ok(MapId(0)));
    assert_eq!(map(&m, &p, 4, BASE + 0x10_0000), Ok(MapId(1)));
    destroy_mapping(&m.vm, &p.space, MapId(0)).unwrap();
    assert_eq!(map(&m, &p, FD, BASE), Ok(MapId(2)));
}

#[test]
fn mapping_survives_closing_the_descriptor() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    let contents = pattern(3, 300);
    let original = m.fs.open_as(1, FD, &contents);

    let id = map(&m, &p, FD, BASE).unwrap();
    m.fs.close_fd(1, FD);
    assert!(!m.fs.is_open(original));

    assert_eq!(m.read(&p, BASE, 300).unwrap(), contents);
    let entry = p.space.mmaps().get(id).unwrap();
    assert!(m.fs.is_open(entry.file));
}

#[test]
fn munmap_writes_dirty_pages_back() {
    let m = Machine::new(4, 2);
    let p = m.spawn(1);
    let file = m.fs.open_as(1, FD, &pattern(0, 5000));

    let id = map(&m, &p, FD, BASE).unwrap();
    m.write(&p, BASE + 10, b"hello").unwrap();
    // Além do fim do arquivo: não deve ir para o disco
    m.write(&p, BASE + PAGE_SIZE as u64 + 2000, b"lost").unwrap();
    destroy_mapping(&m.vm, &p.space, id).unwrap();

    let after = m.fs.contents(file);
    assert_eq!(after.len(), 5000);
    assert_eq!(&after[10..15], b"hello");
    assert_eq!(&after[..10], &pattern(0, 10)[..]);

    assert!(p.space.spt().is_empty());
    assert_eq!(p.mmu.mapped_pages(), 0);
    assert_eq!(m.pool.free_count(), 4);
    assert_eq!(m.fs.open_handles(), 1);
    assert_eq!(m.vm.stats().snapshot().writebacks, 2);
}

#[test]
fn clean_pages_are_not_written_back() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 100));

    let id = map(&m, &p, FD, BASE).unwrap();
    m.read(&p, BASE, 100).unwrap();
    destroy_mapping(&m.vm, &p.space, id).unwrap();
    assert_eq!(m.vm.stats().snapshot().writebacks, 0);
}

#[test]
fn unknown_or_repeated_unmap_fails() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 100));

    assert_eq!(
        destroy_mapping(&m.vm, &p.space, MapId(5)),
        Err(MmError::NoSuchMapping)
    );
    let id = map(&m, &p, FD, BASE).unwrap();
    destroy_mapping(&m.vm, &p.space, id).unwrap();
    assert_eq!(
        destroy_mapping(&m.vm, &p.space, id),
        Err(MmError::NoSuchMapping)
    );
}

#[test]
fn short_writeback_is_reported_after_cleanup() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 100));

    let id = map(&m, &p, FD, BASE).unwrap();
    m.write(&p, BASE, b"dirty").unwrap();
    m.fs.set_short_io(true);

    assert_eq!(
        destroy_mapping(&m.vm, &p.space, id),
        Err(MmError::ShortWrite)
    );
    assert!(p.space.mmaps().is_empty());
    assert!(p.space.spt().is_empty());
    assert_eq!(m.pool.free_count(), 2);
    assert_eq!(m.fs.open_handles(), 1);
}

#[test]
fn evicted_dirty_mmap_page_goes_to_the_file() {
    let m = Machine::new(1, 2);
    let p = m.spawn(1);
    let file = m.fs.open_as(1, FD, &pattern(0, 2 * PAGE_SIZE));

    let id = map(&m, &p, FD, BASE).unwrap();
    m.write(&p, BASE, b"flush").unwrap();
    m.read(&p, BASE + PAGE_SIZE as u64, 1).unwrap();

    assert_eq!(&m.fs.contents(file)[..5], b"flush");
    assert_eq!(m.vm.swap().used(), 0);
    assert_eq!(m.read(&p, BASE, 5).unwrap(), b"flush");
    destroy_mapping(&m.vm, &p.space, id).unwrap();
}

#[test]
fn fault_that_lost_the_race_with_munmap_does_not_reload() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, PAGE_SIZE));
    let id = map(&m, &p, FD, BASE).unwrap();

    // O fault já tinha o descritor em mãos quando o munmap rodou
    let (page_ref, page) = p.space.spt().lookup(VirtAddr::new(BASE)).unwrap();
    destroy_mapping(&m.vm, &p.space, id).unwrap();

    assert_eq!(
        resolve_known(&m.vm, &p.space, page_ref, &page, false),
        Err(MmError::NotMapped)
    );
    assert!(!page.lock().is_resident());
    assert_eq!(p.mmu.mapped_pages(), 0);
    assert_eq!(m.pool.free_count(), 2);
    assert_eq!(m.fs.open_handles(), 1);
    assert_eq!(m.vm.stats().snapshot().file_loads, 0);
}

#[test]
fn dirty_bit_survives_an_eviction_that_could_not_restore() {
    let m = Machine::new(1, 2);
    let p = m.spawn(1);
    let file = m.fs.open_as(1, FD, &pattern(0, PAGE_SIZE));
    let id = map(&m, &p, FD, BASE).unwrap();
    // O writeback curto perde justamente o último byte da página
    let tail = BASE + PAGE_SIZE as u64 - 4;
    m.write(&p, tail, b"keep").unwrap();

    // Writeback curto e MMU recusando a restauração: a página fica
    // residente sem PTE
    m.fs.set_short_io(true);
    p.mmu.set_refuse_installs(true);
    let q = m.spawn(2);
    assert_eq!(m.write(&q, USER_TOP - 8, b"q"), Err(KILLED_EXIT_STATUS));

    let (_, page) = p.space.spt().lookup(VirtAddr::new(BASE)).unwrap();
    assert!(page.lock().is_resident());
    assert_eq!(p.mmu.mapped_pages(), 0);

    m.fs.set_short_io(false);
    p.mmu.set_refuse_installs(false);
    assert_eq!(m.read(&p, tail, 4).unwrap(), b"keep");
    assert!(p.mmu.is_dirty(VirtAddr::new(BASE)));

    destroy_mapping(&m.vm, &p.space, id).unwrap();
    assert_eq!(&m.fs.contents(file)[PAGE_SIZE - 4..], b"keep");
}

#[test]
fn destroy_all_tears_down_every_mapping() {
    let m = Machine::new(4, 2);
    let p = m.spawn(1);
    m.fs.open_as(1, FD, &pattern(0, 10));
    m.fs.open_as(1, 4, &pattern(1, 10));
    map(&m, &p, FD, BASE).unwrap();
    map(&m, &p, 4, BASE + 0x10_0000).unwrap();
    m.read(&p, BASE, 1).unwrap();

    assert_eq!(destroy_all(&m.vm, &p.space), 2);
    assert!(p.space.mmaps().is_empty());
    assert!(p.space.spt().is_empty());
    assert_eq!(m.fs.open_handles(), 2);
}
