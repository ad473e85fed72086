// =============================================================================
// SERIAL SINK - ZERO OVERHEAD
// =============================================================================
//
// Saída serial usada pelos macros de log da camada de VM.
//
// ARQUITETURA:
// A camada de VM não conhece a UART. O kernel registra, uma única vez, um
// `SerialSink` (a COM1 em produção, um buffer de captura nos testes) e as
// funções `emit_*` encaminham bytes para ele.
// - SEM core::fmt - Evita geração de código SSE/AVX
// - SEM alocação - Apenas strings literais e valores imediatos
// - Sem sink registrado, os bytes são descartados silenciosamente
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string literal
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_nl()        : Envia newline (\r\n)
//
// NOTA IMPORTANTE:
// Este caminho NÃO garante exclusão mútua entre threads. Logs concorrentes
// podem se intercalar. Isso é aceitável para debugging.
//
// =============================================================================

use spin::Once;

/// Destino dos bytes de log.
///
/// A implementação deve ser não-bloqueante (ou quase): é chamada de dentro
/// de seções críticas da Frame Table.
pub trait SerialSink: Send + Sync {
    fn write_byte(&self, byte: u8);
}

static SINK: Once<&'static dyn SerialSink> = Once::new();

/// Registra o sink de saída. Chamadas subsequentes são ignoradas.
pub fn attach(sink: &'static dyn SerialSink) {
    SINK.call_once(|| sink);
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte para o sink.
#[inline(always)]
pub fn emit(byte: u8) {
    if let Some(sink) = SINK.get() {
        sink.write_byte(byte);
    }
}

/// Envia uma string.
#[inline(never)]
pub fn emit_str(s: &str) {
    for byte in s.bytes() {
        emit(byte);
    }
}

/// Envia newline (\r\n).
#[inline(never)]
pub fn emit_nl() {
    emit(b'\r');
    emit(b'\n');
}

/// Envia um valor u64 em hexadecimal.
///
/// Formato de saída: 0x0000000000001000 (sempre 18 caracteres)
#[inline(never)]
pub fn emit_hex(value: u64) {
    emit(b'0');
    emit(b'x');
    let mut shift = 60;
    loop {
        emit(nibble_to_ascii(((value >> shift) & 0xF) as u8));
        if shift == 0 {
            break;
        }
        shift -= 4;
    }
}

// =============================================================================
// FUNÇÕES AUXILIARES
// =============================================================================

/// Converte nibble (0-15) para caractere ASCII ('0'-'9', 'A'-'F').
#[inline(always)]
const fn nibble_to_ascii(n: u8) -> u8 {
    if n < 10 {
        b'0' + n
    } else {
        b'A' + (n - 10)
    }
}
