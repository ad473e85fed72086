//! Testes de teardown do espaço de endereçamento no exit

use super::harness::{pattern, Machine};
use crate::mm::aspace::mmap::create_mapping;
use crate::mm::config::USER_TOP;
use crate::mm::fault::resolve_known;
use crate::mm::{MmError, VirtAddr, PAGE_SIZE};
use crate::syscall::process::exit_address_space;

const CODE: u64 = 0x0804_8000;
const BASE: u64 = 0x2000_0000;

#[test]
fn exit_releases_frames_slots_and_handles() {
    let m = Machine::new(2, 8);
    let p = m.spawn(1);
    let exe = m.load_segment(&p, CODE, &pattern(0, 2 * PAGE_SIZE), true);
    let data = m.fs.open_as(1, 3, &pattern(9, 100));
    create_mapping(&m.vm, &p.space, 3, VirtAddr::new(BASE)).unwrap();

    m.write(&p, CODE, b"x").unwrap();
    m.write(&p, CODE + PAGE_SIZE as u64, b"y").unwrap();
    m.write(&p, USER_TOP - 8, b"s").unwrap();
    m.write(&p, BASE, b"mm").unwrap();
    assert!(m.vm.swap().used() > 0);
    assert_eq!(m.fs.open_handles(), 3);

    exit_address_space(&m.vm, &p.space);

    assert_eq!(m.pool.free_count(), 2);
    assert_eq!(m.vm.swap().used(), 0);
    assert!(m.vm.frames().frames_of(1).is_empty());
    assert!(p.space.spt().is_empty());
    assert!(p.space.mmaps().is_empty());
    assert_eq!(p.mmu.mapped_pages(), 0);

    // O mapeamento fechou o próprio handle e gravou a página suja
    assert_eq!(m.fs.open_handles(), 2);
    assert_eq!(&m.fs.contents(data)[..2], b"mm");
    // O executável nunca é escrito
    assert_eq!(m.fs.contents(exe), pattern(0, 2 * PAGE_SIZE));
}

#[test]
fn fault_that_lost_the_race_with_exit_does_not_reload() {
    let m = Machine::new(1, 4);
    let p = m.spawn(1);
    m.load_segment(&p, CODE, &pattern(0, 2 * PAGE_SIZE), true);
    m.write(&p, CODE, b"x").unwrap();
    // Expulsa a primeira página para o swap
    m.write(&p, CODE + PAGE_SIZE as u64, b"y").unwrap();
    assert_eq!(m.vm.swap().used(), 1);

    let (swapped_ref, swapped) = p.space.spt().lookup(VirtAddr::new(CODE)).unwrap();
    let (resident_ref, resident) = p
        .space
        .spt()
        .lookup(VirtAddr::new(CODE + PAGE_SIZE as u64))
        .unwrap();

    exit_address_space(&m.vm, &p.space);

    assert_eq!(
        resolve_known(&m.vm, &p.space, resident_ref, &resident, false),
        Err(MmError::NotMapped)
    );
    assert_eq!(
        resolve_known(&m.vm, &p.space, swapped_ref, &swapped, false),
        Err(MmError::NotMapped)
    );
    assert!(p.space.spt().is_empty());
    assert_eq!(p.mmu.mapped_pages(), 0);
    assert!(m.vm.frames().frames_of(1).is_empty());
    assert_eq!(m.pool.free_count(), 1);
    assert_eq!(m.vm.swap().used(), 0);
}

#[test]
fn exit_of_empty_process_is_harmless() {
    let m = Machine::new(2, 2);
    let p = m.spawn(1);
    exit_address_space(&m.vm, &p.space);
    exit_address_space(&m.vm, &p.space);
    assert_eq!(m.pool.free_count(), 2);
}

#[test]
fn other_processes_keep_their_pages() {
    let m = Machine::new(2, 8);
    let a = m.spawn(1);
    let b = m.spawn(2);
    a.set_esp(USER_TOP - 4 * PAGE_SIZE as u64);
    b.set_esp(USER_TOP - 4 * PAGE_SIZE as u64);

    for i in 1..=3u64 {
        let addr = USER_TOP - i * PAGE_SIZE as u64;
        m.write(&a, addr, &pattern(i as u8, 64)).unwrap();
        m.write(&b, addr, &pattern(100 + i as u8, 64)).unwrap();
    }

    exit_address_space(&m.vm, &a.space);
    m.dir.remove(a.pid);

    for i in 1..=3u64 {
        let addr = USER_TOP - i * PAGE_SIZE as u64;
        assert_eq!(m.read(&b, addr, 64).unwrap(), pattern(100 + i as u8, 64));
    }
    assert!(m.vm.frames().frames_of(1).is_empty());
    m.check_frame_invariants(&[&b]);
}
