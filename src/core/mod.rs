//! Core Module
//!
//! Infraestrutura transversal da camada de VM: logging zero-overhead.

pub mod logging;
