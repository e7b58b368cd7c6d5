//! # Virtual Memory Manager — Fachada
//!
//! Uma instância explícita de `Vmm` é dona da page table, da geometria e
//! dos contadores. Toda operação recebe a instância por referência; cada
//! teste constrói o seu VMM do zero em vez de depender de estado global.
//!
//! A sequência completa de serviço de fault (frame alvo → cópia de bloco
//! → marcação de residência) é atômica em relação ao acesso que a
//! disparou: só existe um fluxo de instruções por vez. Quem expuser este
//! tipo a paralelismo real deve tratá-lo como uma seção crítica única —
//! o kernel o envolve em `spin::Mutex`.

use super::allocator;
use super::config::MemConfig;
use super::error::{MmError, MmResult};
use super::page_table::{PageTable, RecordView};
use super::reclaim;
use super::stats::VmmStats;
use super::types::{AccessKind, PhysAddr, Pid, SecFrameId, Timestamp, VirtAddr, VirtPage};
use crate::core::Channel;

/// Primitivo externo de cópia de blocos entre as memórias secundária e
/// principal. Offsets e contagem em palavras.
///
/// O contrato é o do hardware didático: a cópia sempre tem sucesso ou
/// aborta a simulação inteira (panic) — nunca retorna erro parcial.
pub trait BlockCopy {
    fn copy_sec_to_main(&mut self, sec_offset: usize, main_offset: usize, words: usize);
    fn copy_main_to_sec(&mut self, main_offset: usize, sec_offset: usize, words: usize);
}

/// O gerenciador de memória virtual.
pub struct Vmm {
    cfg: MemConfig,
    table: PageTable,
    stats: VmmStats,
}

impl Vmm {
    /// Cria o VMM com a page table dimensionada pela configuração.
    pub fn new(cfg: MemConfig) -> Self {
        crate::kinfo!(
            "(VMM) init: {} frames secundários, {} frames principais, página de {} palavras",
            cfg.num_sec_frames,
            cfg.num_main_frames,
            cfg.page_size
        );
        Self {
            cfg,
            table: PageTable::new(cfg.num_sec_frames),
            stats: VmmStats::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &MemConfig {
        &self.cfg
    }

    #[inline]
    pub fn stats(&self) -> &VmmStats {
        &self.stats
    }

    /// Traduz `(pid, vaddr)` em endereço físico, servindo page faults no
    /// caminho. `now` é o relógio lógico do kernel.
    pub fn translate(
        &mut self,
        pid: Pid,
        vaddr: VirtAddr,
        kind: AccessKind,
        now: Timestamp,
        copier: &mut dyn BlockCopy,
    ) -> MmResult<PhysAddr> {
        self.stats.inc_translation();
        let page_size = self.cfg.page_size;
        let vpage = vaddr.page(page_size);
        let offset = vaddr.offset(page_size);
        crate::knoise!(
            Channel::Vmem,
            "{} vAddr {} (vpage {}, offset {})",
            if kind.is_write() { "WRITE" } else { "READ" },
            vaddr,
            vpage,
            offset
        );

        // Mapeamento autoritativo, chaveado por (pid, vpage).
        let frame = self.table.lookup(pid, vpage).ok_or_else(|| {
            crate::kerror!(
                "(VMM) falha de segmentação: pid {} nunca mapeou a vpage {}",
                pid,
                vpage
            );
            MmError::SegmentationFault
        })?;

        if self.table.residency_of(frame).is_none() {
            // Page fault: buscar a página da memória secundária.
            self.stats.inc_fault();
            crate::knoise!(Channel::Vmem, "PAGE FAULT");
            let target = reclaim::service_fault(
                &mut self.table,
                page_size,
                self.cfg.num_main_frames,
                &self.stats,
                copier,
            )?;
            copier.copy_sec_to_main(
                frame.index() * page_size,
                target.index() * page_size,
                page_size,
            );
            self.table.set_resident(frame, target);
        }

        let main = self.table.mark_accessed(frame, kind.is_write(), now)?;
        let paddr = main.index() * page_size + offset;

        // Checagem de invariante: um físico fora dos limites é defeito
        // interno, não condição do usuário.
        if paddr >= self.cfg.main_words {
            crate::kerror!(
                "(VMM) endereço físico {} fora da memória principal ({} palavras)",
                paddr,
                self.cfg.main_words
            );
            return Err(MmError::SegmentationFault);
        }

        Ok(PhysAddr::new(paddr))
    }

    /// Aloca um frame secundário para `pid` (loader).
    pub fn allocate(&mut self, pid: Pid) -> MmResult<SecFrameId> {
        allocator::allocate(&mut self.table, pid)
    }

    /// Vincula o frame recém-alocado à página virtual que ele guarda.
    pub fn bind(&mut self, frame: SecFrameId, vpage: VirtPage) {
        allocator::bind(&mut self.table, frame, vpage);
    }

    /// Libera todos os frames de `pid` (término do processo).
    pub fn release(&mut self, pid: Pid) {
        allocator::release(&mut self.table, pid);
    }

    /// Snapshot somente-leitura da page table (comando `dpt`).
    pub fn snapshot(&self) -> impl Iterator<Item = RecordView> + '_ {
        self.table.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &PageTable {
        &self.table
    }
}
