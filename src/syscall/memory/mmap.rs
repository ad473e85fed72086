//! # Memory Mapping Syscalls

use crate::mm::aspace::mmap::{self, MapId};
use crate::mm::{VirtAddr, Vm};
use crate::syscall::abi::SyscallArgs;
use crate::syscall::error::{result_to_isize, SysError, SysResult};

/// Valor de retorno de `mmap` em qualquer falha
pub const MAP_FAILED: isize = -1;

// === WRAPPERS ===

pub fn sys_mmap_wrapper(vm: &Vm, args: &SyscallArgs) -> isize {
    sys_mmap(vm, args.arg1 as i32, args.arg2)
}

pub fn sys_munmap_wrapper(vm: &Vm, args: &SyscallArgs) -> isize {
    sys_munmap(vm, args.arg1 as i32)
}

// === IMPLEMENTAÇÕES ===

/// Mapeia o arquivo aberto em `fd` no endereço `addr` do processo atual.
///
/// Retorna o id do mapeamento (>= 0) ou [`MAP_FAILED`].
pub fn sys_mmap(vm: &Vm, fd: i32, addr: usize) -> isize {
    match do_mmap(vm, fd, addr) {
        Ok(id) => id as isize,
        Err(_) => MAP_FAILED,
    }
}

fn do_mmap(vm: &Vm, fd: i32, addr: usize) -> SysResult<usize> {
    let space = vm.current_space()?;
    let id = mmap::create_mapping(vm, &space, fd, VirtAddr::new(addr as u64))?;
    Ok(id.0 as usize)
}

/// Desfaz o mapeamento `id` do processo atual.
///
/// Retorna 0, ou o código negativo do erro (id desconhecido, writeback
/// curto).
pub fn sys_munmap(vm: &Vm, id: i32) -> isize {
    result_to_isize(do_munmap(vm, id))
}

fn do_munmap(vm: &Vm, id: i32) -> SysResult<usize> {
    if id < 0 {
        return Err(SysError::NotFound);
    }
    let space = vm.current_space()?;
    mmap::destroy_mapping(vm, &space, MapId(id as u32))?;
    Ok(0)
}
