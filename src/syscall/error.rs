//! Códigos de Erro das Syscalls de Memória
//!
//! Erros são retornados como valores negativos.

use crate::mm::MmError;

/// Enum de erros do sistema.
///
/// Valores são i32 para permitir representação negativa em isize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SysError {
    // === Erros Gerais (1-15) ===
    /// Objeto não encontrado
    NotFound = 2,
    /// Argumento inválido
    InvalidArgument = 4,

    // === Erros de Handle (16-31) ===
    /// Descritor inválido ou fechado
    BadHandle = 16,

    // === Erros de Memória (32-47) ===
    /// Sem memória disponível
    OutOfMemory = 32,
    /// Endereço inválido ou não mapeado
    BadAddress = 33,
    /// Região de memória em uso
    AddressInUse = 34,
    /// Alinhamento incorreto
    BadAlignment = 35,

    // === Erros de IO (48-63) ===
    /// Erro genérico de IO
    IoError = 48,

    // === Erros de Processo (80-95) ===
    /// Processo não encontrado
    ProcessNotFound = 80,
}

impl SysError {
    /// Converte para isize negativo (formato de retorno da syscall)
    #[inline]
    pub fn as_isize(self) -> isize {
        -(self as i32 as isize)
    }
}

impl From<MmError> for SysError {
    fn from(err: MmError) -> Self {
        match err {
            MmError::OutOfMemory | MmError::SwapFull => Self::OutOfMemory,
            MmError::ShortRead | MmError::ShortWrite | MmError::SwapIo => Self::IoError,
            MmError::InvalidAddress
            | MmError::NotMapped
            | MmError::StackLimit
            | MmError::ProtectionViolation
            | MmError::MappingFailed => Self::BadAddress,
            MmError::NotAligned => Self::BadAlignment,
            MmError::AlreadyMapped => Self::AddressInUse,
            MmError::BadDescriptor | MmError::ReopenFailed => Self::BadHandle,
            MmError::EmptyFile => Self::InvalidArgument,
            MmError::NoSuchMapping => Self::NotFound,
            MmError::ProcessNotFound => Self::ProcessNotFound,
        }
    }
}

/// Resultado de syscall: Ok(valor) ou Err(SysError)
pub type SysResult<T> = Result<T, SysError>;

/// Helper para converter SysResult<usize> em isize para retorno
pub fn result_to_isize(result: SysResult<usize>) -> isize {
    match result {
        Ok(val) => val as isize,
        Err(e) => e.as_isize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_encode_as_negative_codes() {
        assert_eq!(SysError::BadAddress.as_isize(), -33);
        assert_eq!(result_to_isize(Ok(7)), 7);
        assert_eq!(result_to_isize(Err(SysError::OutOfMemory)), -32);
    }

    #[test]
    fn vm_errors_map_to_syscall_codes() {
        assert_eq!(SysError::from(MmError::SwapFull), SysError::OutOfMemory);
        assert_eq!(SysError::from(MmError::AlreadyMapped), SysError::AddressInUse);
        assert_eq!(SysError::from(MmError::NotAligned), SysError::BadAlignment);
        assert_eq!(SysError::from(MmError::NoSuchMapping), SysError::NotFound);
    }
}
