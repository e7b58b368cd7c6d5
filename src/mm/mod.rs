//! # Memory Management Subsystem (MM)
//!
//! O módulo `mm` é o **coração** do simulador: o VMM que traduz endereços
//! virtuais em endereços físicos sob demanda, com substituição LRU.
//!
//! ## 🏗️ Arquitetura dos Módulos
//!
//! | Módulo       | Responsabilidade                                        |
//! |--------------|---------------------------------------------------------|
//! | `config`     | Tamanho de página e contagem de frames, validados.      |
//! | `types`      | Newtypes de endereços, ids e tipos da máquina.          |
//! | `error`      | Taxonomia de erros (`MmError`) do subsistema.           |
//! | `page_table` | Registro autoritativo de ocupação e residência.         |
//! | `allocator`  | Alocador de frames secundários (first-fit).             |
//! | `reclaim`    | Frame livre ou vítima LRU, com write-back de sujas.     |
//! | `vmm`        | Fachada: tradução de endereços e serviço de page fault. |
//! | `stats`      | Contadores (traduções, faults, evictions, write-backs). |
//!
//! ## MODELO DE EXECUÇÃO
//!
//! Execução cooperativa de fluxo único: a CPU emite um acesso por vez e a
//! sequência completa translate → fault → evict é uma seção crítica única.
//! O `Vmm` é uma instância explícita (nada de estado global); quem o expõe
//! a paralelismo real deve envolvê-lo em um mutex — o kernel do simulador
//! usa `spin::Mutex<Vmm>` exatamente para isso.
//!
//! ## FLUXO DE UM ACESSO
//!
//! ```text
//! CPU ──▶ translate(pid, vAddr, kind)
//!          │ lookup(pid, vpage) ── não mapeado? ──▶ SegmentationFault
//!          │ residente? ── não ──▶ reclaim::service_fault
//!          │                        │ frame livre, ou vítima LRU
//!          │                        │ suja? write-back via BlockCopy
//!          │ copy_sec_to_main + mark_accessed
//!          ▼
//!        PhysAddr (checado contra os limites da memória principal)
//! ```

pub mod allocator;
pub mod config;
pub mod error;
pub mod page_table;
pub mod reclaim;
pub mod stats;
pub mod types;
pub mod vmm;

#[cfg(test)]
mod test;

// Re-exports para conveniência
pub use config::MemConfig;
pub use error::{MmError, MmResult};
pub use page_table::{PageTable, RecordView};
pub use types::{
    AccessKind, MainFrameId, Pid, PhysAddr, SecFrameId, Timestamp, VirtAddr, VirtPage, Word,
};
pub use vmm::{BlockCopy, Vmm};
