//! # Alocador de Frames Secundários
//!
//! Entrega frames secundários ao loader enquanto ele transmite a imagem
//! do processo, e os recolhe no término. Scan linear first-fit por id
//! crescente — determinístico, para reprodutibilidade.

use super::error::{MmError, MmResult};
use super::page_table::PageTable;
use super::types::{Pid, SecFrameId, VirtPage};
use crate::core::Channel;

/// Reivindica o primeiro frame secundário livre para `pid`.
pub fn allocate(table: &mut PageTable, pid: Pid) -> MmResult<SecFrameId> {
    crate::knoise!(Channel::Vmem, "procurando frame secundário livre...");
    let frame = table.first_free().ok_or_else(|| {
        crate::kwarn!("(VMM) sem frames secundários livres para pid {}", pid);
        MmError::OutOfSecondaryFrames
    })?;
    table.claim(frame, pid);
    crate::ktrace!("(VMM) frame secundário {} alocado para pid {}", frame, pid);
    Ok(frame)
}

/// Registra qual página virtual do dono o frame recém-alocado guarda.
/// Exatamente uma vez por alocação, antes de o frame ser traduzido.
pub fn bind(table: &mut PageTable, frame: SecFrameId, vpage: VirtPage) {
    table.bind(frame, vpage);
    crate::ktrace!("(VMM) frame secundário {} ↦ vpage {}", frame, vpage);
}

/// Devolve todos os frames de `pid` ao estado livre (término do processo).
/// Sem write-back: dados residentes morrem com o processo.
pub fn release(table: &mut PageTable, pid: Pid) {
    crate::knoise!(Channel::Vmem, "liberando frames do pid {}", pid);
    table.free_all_for(pid);
}
