//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno da camada de VM.

pub mod bitmap;

pub use bitmap::Bitmap;
