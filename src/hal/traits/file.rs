//! Serviço de arquivos
//!
//! A VM só precisa de leitura/escrita posicional, tamanho e reabertura.
//! O serviço é responsável pela própria serialização interna.

use super::process::Pid;

/// Handle opaco de arquivo aberto.
///
/// Cada `reopen` produz um handle novo e independente; fechar um não afeta
/// os outros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileHandle(pub u32);

pub trait FileService: Send + Sync {
    /// Lê até `buf.len()` bytes a partir de `offset`. Retorna bytes lidos.
    fn read_at(&self, file: FileHandle, buf: &mut [u8], offset: u64) -> usize;

    /// Escreve `buf` a partir de `offset`. Retorna bytes escritos.
    fn write_at(&self, file: FileHandle, buf: &[u8], offset: u64) -> usize;

    /// Tamanho atual do arquivo em bytes
    fn length(&self, file: FileHandle) -> u64;

    /// Abre um handle independente para o mesmo arquivo
    fn reopen(&self, file: FileHandle) -> Option<FileHandle>;

    fn close(&self, file: FileHandle);

    /// Resolve o descritor `fd` na tabela de arquivos do processo `pid`
    fn resolve_fd(&self, pid: Pid, fd: i32) -> Option<FileHandle>;
}
