//! # Page Table
//!
//! Registro autoritativo de cada frame de memória secundária: quem o
//! ocupa, qual página virtual guarda e se existe cópia residente em
//! memória principal.
//!
//! ## MÁQUINA DE ESTADOS (por registro)
//!
//! ```text
//! Free ──▶ Occupied(NonResident) ──▶ Occupied(Resident)
//!   ▲              ▲      │ fault            │ evict
//!   │              └──────┴──────────────────┘
//!   └── término do processo (de qualquer sub-estado, sem write-back)
//! ```
//!
//! Nenhuma outra transição é legal: evictar um frame não-residente ou
//! reivindicar um frame ocupado é bug de programação e derruba a
//! simulação (`panic!`), não é erro recuperável.
//!
//! O mapeamento autoritativo é `lookup(pid, vpage)` — chaveado, nunca
//! derivado por aritmética posicional a partir do primeiro frame do
//! processo: a ordem de alocação não precisa coincidir com a ordem das
//! páginas virtuais.

use super::error::{MmError, MmResult};
use super::types::{MainFrameId, Pid, SecFrameId, Timestamp, VirtPage};

/// Sub-estado de residência de um frame ocupado.
///
/// `dirty` e `last_ref` só existem enquanto a página está residente;
/// fora de `In` eles simplesmente não têm representação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Residency {
    Out,
    In {
        main: MainFrameId,
        dirty: bool,
        last_ref: Timestamp,
    },
}

/// Um registro da page table (um por frame secundário).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Free,
    Occupied {
        owner: Pid,
        /// `None` entre `allocate` e `bind`.
        vpage: Option<VirtPage>,
        residency: Residency,
    },
}

/// Visão somente-leitura de um registro, para o dump de diagnóstico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView {
    pub frame: SecFrameId,
    pub occupied: bool,
    pub owner: Option<Pid>,
    pub vpage: Option<VirtPage>,
    pub main_frame: Option<MainFrameId>,
    pub dirty: bool,
    pub last_ref: Option<Timestamp>,
}

/// A page table: um `Slot` por frame secundário, indexado pelo id.
pub struct PageTable {
    slots: Vec<Slot>,
}

impl PageTable {
    /// Cria a tabela com todos os registros livres.
    pub fn new(num_sec_frames: usize) -> Self {
        Self {
            slots: vec![Slot::Free; num_sec_frames],
        }
    }

    /// Número de frames secundários rastreados.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Mapeamento autoritativo `(pid, vpage) → frame secundário`.
    pub fn lookup(&self, pid: Pid, vpage: VirtPage) -> Option<SecFrameId> {
        self.slots.iter().enumerate().find_map(|(i, slot)| match slot {
            Slot::Occupied {
                owner,
                vpage: Some(v),
                ..
            } if *owner == pid && *v == vpage => Some(SecFrameId::new(i)),
            _ => None,
        })
    }

    /// Primeiro frame livre em ordem crescente de id (first-fit determinístico).
    pub(crate) fn first_free(&self) -> Option<SecFrameId> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Slot::Free))
            .map(SecFrameId::new)
    }

    /// Reivindica um frame livre para `pid`. A página virtual fica pendente
    /// até o `bind`.
    pub(crate) fn claim(&mut self, frame: SecFrameId, pid: Pid) {
        let slot = &mut self.slots[frame.index()];
        assert!(
            matches!(slot, Slot::Free),
            "claim de frame secundário {} já ocupado",
            frame
        );
        *slot = Slot::Occupied {
            owner: pid,
            vpage: None,
            residency: Residency::Out,
        };
    }

    /// Registra qual página virtual do dono este frame guarda.
    ///
    /// Deve ser chamado exatamente uma vez por alocação, antes de o frame
    /// participar de qualquer tradução.
    pub(crate) fn bind(&mut self, frame: SecFrameId, vpage: VirtPage) {
        let owner = match &self.slots[frame.index()] {
            Slot::Occupied {
                owner,
                vpage: None,
                ..
            } => *owner,
            Slot::Occupied {
                vpage: Some(_), ..
            } => panic!("bind duplo no frame secundário {}", frame),
            Slot::Free => panic!("bind em frame secundário {} livre", frame),
        };
        // (pid, vpage) é único entre registros ocupados.
        assert!(
            self.lookup(owner, vpage).is_none(),
            "pid {} já tem a página virtual {} mapeada",
            owner,
            vpage
        );
        if let Slot::Occupied { vpage: v, .. } = &mut self.slots[frame.index()] {
            *v = Some(vpage);
        }
    }

    /// Atualiza `last_ref` (e `dirty`, em escrita). Retorna o frame
    /// principal que guarda a cópia residente.
    pub fn mark_accessed(
        &mut self,
        frame: SecFrameId,
        is_write: bool,
        now: Timestamp,
    ) -> MmResult<MainFrameId> {
        match &mut self.slots[frame.index()] {
            Slot::Occupied {
                residency:
                    Residency::In {
                        main,
                        dirty,
                        last_ref,
                    },
                ..
            } => {
                *last_ref = now;
                if is_write {
                    *dirty = true;
                }
                Ok(*main)
            }
            _ => Err(MmError::NotResident),
        }
    }

    /// Marca o frame como residente no frame principal `main`, limpo.
    pub(crate) fn set_resident(&mut self, frame: SecFrameId, main: MainFrameId) {
        debug_assert!(
            !self.resident_records().any(|(_, m, _)| m == main),
            "frame principal {} já referenciado por outro registro",
            main
        );
        match &mut self.slots[frame.index()] {
            Slot::Occupied {
                residency: residency @ Residency::Out,
                ..
            } => {
                *residency = Residency::In {
                    main,
                    dirty: false,
                    last_ref: 0,
                };
            }
            Slot::Occupied { .. } => {
                panic!("set_resident em frame secundário {} já residente", frame)
            }
            Slot::Free => panic!("set_resident em frame secundário {} livre", frame),
        }
    }

    /// Frame principal e bit dirty da cópia residente, se houver.
    pub(crate) fn residency_of(&self, frame: SecFrameId) -> Option<(MainFrameId, bool)> {
        match &self.slots[frame.index()] {
            Slot::Occupied {
                residency: Residency::In { main, dirty, .. },
                ..
            } => Some((*main, *dirty)),
            _ => None,
        }
    }

    /// Invalida só a residência: o frame continua ocupado pelo processo,
    /// apenas deixa de ter cópia em memória principal. Retorna o frame
    /// principal liberado.
    pub(crate) fn clear_resident(&mut self, frame: SecFrameId) -> MainFrameId {
        match &mut self.slots[frame.index()] {
            Slot::Occupied {
                residency: residency @ Residency::In { .. },
                ..
            } => {
                let main = match residency {
                    Residency::In { main, .. } => *main,
                    Residency::Out => unreachable!(),
                };
                *residency = Residency::Out;
                main
            }
            _ => panic!("eviction de frame secundário {} não residente", frame),
        }
    }

    /// Libera todos os registros de `pid`, residentes ou não, sem
    /// write-back. Idempotente.
    pub fn free_all_for(&mut self, pid: Pid) {
        for slot in &mut self.slots {
            if matches!(slot, Slot::Occupied { owner, .. } if *owner == pid) {
                *slot = Slot::Free;
            }
        }
    }

    /// Itera `(frame secundário, frame principal, last_ref)` dos registros
    /// ocupados e residentes.
    pub(crate) fn resident_records(
        &self,
    ) -> impl Iterator<Item = (SecFrameId, MainFrameId, Timestamp)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Occupied {
                residency: Residency::In { main, last_ref, .. },
                ..
            } => Some((SecFrameId::new(i), *main, *last_ref)),
            _ => None,
        })
    }

    /// Snapshot somente-leitura de todos os registros (comando `dpt`).
    pub fn snapshot(&self) -> impl Iterator<Item = RecordView> + '_ {
        self.slots.iter().enumerate().map(|(i, slot)| {
            let frame = SecFrameId::new(i);
            match slot {
                Slot::Free => RecordView {
                    frame,
                    occupied: false,
                    owner: None,
                    vpage: None,
                    main_frame: None,
                    dirty: false,
                    last_ref: None,
                },
                Slot::Occupied {
                    owner,
                    vpage,
                    residency,
                } => {
                    let (main_frame, dirty, last_ref) = match residency {
                        Residency::Out => (None, false, None),
                        Residency::In {
                            main,
                            dirty,
                            last_ref,
                        } => (Some(*main), *dirty, Some(*last_ref)),
                    };
                    RecordView {
                        frame,
                        occupied: true,
                        owner: Some(*owner),
                        vpage: *vpage,
                        main_frame,
                        dirty,
                        last_ref,
                    }
                }
            }
        })
    }
}
