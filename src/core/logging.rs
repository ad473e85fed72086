// =============================================================================
// LOGGING DA CAMADA DE VM - ZERO OVERHEAD
// =============================================================================
//
// Macros de log usadas por todos os módulos de `mm` e `syscall`.
//
// - O nível é escolhido em compile-time pelas features do Cargo
//   (`no_logs`, `log_info`, `log_debug`, `log_trace`). Um nível desligado
//   vira uma expressão vazia: nem a mensagem nem o valor são avaliados.
// - Sem core::fmt e sem alocação: uma string literal e, opcionalmente, um
//   valor impresso em hexadecimal.
// - A saída vai para o sink de `drivers::serial`.
//
// Os caminhos de eviction chamam estes macros com o lock da Frame Table
// seguro, por isso o sink precisa ser não-bloqueante.
//
// USO:
//   kwarn!("(FAULT) Fault nao resolvido, addr=", addr.as_u64());
//   ktrace!("(SWAP) Pagina gravada no slot=", slot.0);
//
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";
pub const P_OK: &str = "\x1b[32m[OK]\x1b[0m ";

/// Emite uma linha com prefixo de nível. Uso interno dos macros abaixo.
#[doc(hidden)]
#[macro_export]
macro_rules! __vm_log_line {
    ($prefix:expr, $msg:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_nl();
    }};
    ($prefix:expr, $msg:expr, $val:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_hex($val as u64);
        $crate::drivers::serial::emit_nl();
    }};
}

// --- ERROR / WARN / OK: ligados sempre, exceto com no_logs ---

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:expr),+) => { $crate::__vm_log_line!($crate::core::logging::P_ERROR, $($arg),+) };
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:expr),+) => { $crate::__vm_log_line!($crate::core::logging::P_WARN, $($arg),+) };
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => { $crate::__vm_log_line!($crate::core::logging::P_OK, $msg) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

// --- INFO ---

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:expr),+) => { $crate::__vm_log_line!($crate::core::logging::P_INFO, $($arg),+) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// --- DEBUG (eviction, mmap) ---

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:expr),+) => { $crate::__vm_log_line!($crate::core::logging::P_DEBUG, $($arg),+) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// --- TRACE (cada fault, cada frame, cada slot) ---

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($arg:expr),+) => { $crate::__vm_log_line!($crate::core::logging::P_TRACE, $($arg),+) };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}
