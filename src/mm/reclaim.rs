//! # Motor de Substituição (LRU)
//!
//! Encontra um frame principal livre ou escolhe e evicta a vítima menos
//! recentemente usada, com write-back das páginas sujas.
//!
//! Política determinística: frame livre de menor id primeiro; vítima com
//! menor `last_ref`, empate resolvido pelo menor índice na tabela. Um
//! único scan basta para achar a vítima.

use super::error::{MmError, MmResult};
use super::page_table::PageTable;
use super::stats::VmmStats;
use super::types::{MainFrameId, SecFrameId};
use super::vmm::BlockCopy;
use crate::core::Channel;

/// Menor frame principal não referenciado por nenhum registro residente.
pub fn find_free_main_frame(table: &PageTable, num_main_frames: usize) -> Option<MainFrameId> {
    crate::knoise!(Channel::Vmem, "procurando frame principal livre");
    let mut in_use = vec![false; num_main_frames];
    for (_, main, _) in table.resident_records() {
        in_use[main.index()] = true;
    }
    in_use
        .iter()
        .position(|used| !used)
        .map(MainFrameId::new)
}

/// Vítima LRU: registro residente com o menor `last_ref` (empate: menor
/// índice). `NoResidentPages` só se nada está residente — condição
/// defensiva, inalcançável após um miss com memória principal cheia.
pub fn select_victim(table: &PageTable) -> MmResult<SecFrameId> {
    table
        .resident_records()
        .min_by_key(|&(frame, _, last_ref)| (last_ref, frame))
        .map(|(frame, _, _)| frame)
        .ok_or(MmError::NoResidentPages)
}

/// Entrega um frame principal para servir um page fault: livre se houver,
/// senão evicta a vítima LRU (write-back da cópia suja antes de invalidar
/// a residência).
pub fn service_fault(
    table: &mut PageTable,
    page_size: usize,
    num_main_frames: usize,
    stats: &VmmStats,
    copier: &mut dyn BlockCopy,
) -> MmResult<MainFrameId> {
    if let Some(free) = find_free_main_frame(table, num_main_frames) {
        return Ok(free);
    }

    crate::knoise!(Channel::Vmem, "PAGE REPLACEMENT");
    let victim = select_victim(table)?;
    let (main, dirty) = match table.residency_of(victim) {
        Some(r) => r,
        // select_victim só devolve registros residentes.
        None => return Err(MmError::NoResidentPages),
    };

    if dirty {
        // A memória secundária sempre reflete o último dado confirmado
        // de páginas não-residentes. Falha na cópia é fatal (panic no
        // primitivo): integridade não pode ser garantida.
        crate::knoise!(Channel::Vmem, "write-back do frame secundário {}", victim);
        copier.copy_main_to_sec(main.index() * page_size, victim.index() * page_size, page_size);
        stats.inc_write_back();
    }

    table.clear_resident(victim);
    stats.inc_eviction();
    crate::kdebug!(
        "(VMM) vítima LRU: frame secundário {} (principal {}, dirty={})",
        victim,
        main,
        dirty
    );
    Ok(main)
}
