//! # Syscall Arguments

/// Argumentos de syscall já extraídos do contexto da CPU.
///
/// A extração dos registradores é feita pelo handler de syscall do kernel;
/// aqui só interessa a posição.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SyscallArgs {
    pub num: usize,
    pub arg1: usize,
    pub arg2: usize,
    pub arg3: usize,
    pub arg4: usize,
    pub arg5: usize,
    pub arg6: usize,
}

impl SyscallArgs {
    /// Argumentos vazios (para testes)
    pub const fn empty() -> Self {
        Self {
            num: 0,
            arg1: 0,
            arg2: 0,
            arg3: 0,
            arg4: 0,
            arg5: 0,
            arg6: 0,
        }
    }

    /// Atalho para syscalls de até dois argumentos
    pub const fn with2(num: usize, arg1: usize, arg2: usize) -> Self {
        let mut args = Self::empty();
        args.num = num;
        args.arg1 = arg1;
        args.arg2 = arg2;
        args
    }
}
