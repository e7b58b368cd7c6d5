//! Infraestrutura central do simulador.
//!
//! - `logging` — sistema de logs com níveis filtrados em compile-time.
//! - `noise` — canais de diagnóstico ligáveis em runtime (OS/CPU/MEM/VMEM).

pub mod logging;
pub mod noise;

pub use noise::Channel;
