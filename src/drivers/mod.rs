//! # Driver Layer
//!
//! Apenas as interfaces de dispositivo que a camada de VM consome.
//!
//! | Driver   | Arquivo      | Uso |
//! |----------|--------------|-----|
//! | Serial   | `serial.rs`  | Saída dos macros de log |
//! | Block    | `block/`     | Dispositivo de swap (setores de 512 bytes) |

pub mod block;
pub mod serial;
