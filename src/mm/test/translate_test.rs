//! Testes do tradutor: decomposição de endereço, serviço de fault e
//! falhas de segmentação.

use crate::memsys::MemSystem;
use crate::mm::types::{AccessKind, Pid, SecFrameId, VirtAddr, VirtPage, Word};
use crate::mm::{MemConfig, MmError, Vmm};

/// Página de 4 palavras, 2 frames principais, 4 frames secundários.
fn cfg() -> MemConfig {
    MemConfig::new(4, 8, 16).unwrap()
}

fn setup() -> (Vmm, MemSystem) {
    let cfg = cfg();
    (Vmm::new(cfg), MemSystem::new(&cfg))
}

/// Aloca e vincula uma página do processo, gravando `values` na memória
/// secundária do frame recebido.
fn load_page(vmm: &mut Vmm, mem: &mut MemSystem, pid: Pid, vpage: usize, values: &[Word]) -> SecFrameId {
    let frame = vmm.allocate(pid).unwrap();
    vmm.bind(frame, VirtPage::new(vpage));
    for (i, &v) in values.iter().enumerate() {
        mem.sec.write(frame.index() * vmm.config().page_size + i, v);
    }
    frame
}

#[test]
fn decomposicao_de_endereco() {
    let a = VirtAddr::new(11);
    assert_eq!(a.page(4), VirtPage::new(2));
    assert_eq!(a.offset(4), 3);

    // Reconstrução: page * page_size + offset == endereço original.
    assert_eq!(a.page(4).as_usize() * 4 + a.offset(4), 11);

    let zero = VirtAddr::new(0);
    assert_eq!(zero.page(4), VirtPage::new(0));
    assert_eq!(zero.offset(4), 0);
}

#[test]
fn duas_paginas_residentes_traduzem_deterministicamente() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, &[1, 2, 3, 4]);
    load_page(&mut vmm, &mut mem, pid, 1, &[5, 6, 7, 8]);

    // Primeiro fault ocupa o frame principal 0, o segundo o frame 1.
    let a = vmm
        .translate(pid, VirtAddr::new(0), AccessKind::Read, 1, &mut mem)
        .unwrap();
    assert_eq!(a.as_usize(), 0);

    let b = vmm
        .translate(pid, VirtAddr::new(5), AccessKind::Read, 2, &mut mem)
        .unwrap();
    assert_eq!(b.as_usize(), 5);

    // Hit na primeira página: mesmo frame, offset preservado, sem fault.
    let c = vmm
        .translate(pid, VirtAddr::new(2), AccessKind::Read, 3, &mut mem)
        .unwrap();
    assert_eq!(c.as_usize(), 2);
    assert_eq!(vmm.stats().page_faults(), 2);
}

#[test]
fn endereco_nunca_mapeado_e_segfault() {
    let (mut vmm, mut mem) = setup();
    let err = vmm.translate(Pid::new(1), VirtAddr::new(0), AccessKind::Read, 1, &mut mem);
    assert_eq!(err, Err(MmError::SegmentationFault));
    assert_eq!(vmm.stats().translations(), 1);
    assert_eq!(vmm.stats().page_faults(), 0);
}

#[test]
fn fault_carrega_a_pagina_e_traduz() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, &[10, 11, 12, 13]);

    let paddr = vmm
        .translate(pid, VirtAddr::new(2), AccessKind::Read, 1, &mut mem)
        .unwrap();
    assert_eq!(mem.main.read(paddr.as_usize()), 12);
    assert_eq!(vmm.stats().page_faults(), 1);

    // O offset sobrevive à tradução.
    assert_eq!(paddr.as_usize() % vmm.config().page_size, 2);
}

#[test]
fn hit_nao_gera_fault() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, &[1, 2, 3, 4]);

    let a = vmm
        .translate(pid, VirtAddr::new(0), AccessKind::Read, 1, &mut mem)
        .unwrap();
    let b = vmm
        .translate(pid, VirtAddr::new(3), AccessKind::Read, 2, &mut mem)
        .unwrap();

    assert_eq!(vmm.stats().translations(), 2);
    assert_eq!(vmm.stats().page_faults(), 1);
    // Mesma página, mesmo frame principal.
    assert_eq!(a.as_usize() / 4, b.as_usize() / 4);
}

#[test]
fn leitura_apos_escrita_na_mesma_pagina() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, &[0, 0, 0, 0]);

    let paddr = vmm
        .translate(pid, VirtAddr::new(1), AccessKind::Write, 1, &mut mem)
        .unwrap();
    mem.main.write(paddr.as_usize(), 77);

    let paddr = vmm
        .translate(pid, VirtAddr::new(1), AccessKind::Read, 2, &mut mem)
        .unwrap();
    assert_eq!(mem.main.read(paddr.as_usize()), 77);
}

#[test]
fn processos_nao_se_enxergam() {
    let (mut vmm, mut mem) = setup();
    let p1 = Pid::new(1);
    let p2 = Pid::new(2);
    load_page(&mut vmm, &mut mem, p1, 0, &[5, 5, 5, 5]);
    load_page(&mut vmm, &mut mem, p2, 0, &[9, 9, 9, 9]);

    let a = vmm
        .translate(p1, VirtAddr::new(0), AccessKind::Read, 1, &mut mem)
        .unwrap();
    let b = vmm
        .translate(p2, VirtAddr::new(0), AccessKind::Read, 2, &mut mem)
        .unwrap();

    assert_ne!(a, b);
    assert_eq!(mem.main.read(a.as_usize()), 5);
    assert_eq!(mem.main.read(b.as_usize()), 9);
}

#[test]
fn release_torna_o_espaco_invalido() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, &[1, 2, 3, 4]);
    vmm.translate(pid, VirtAddr::new(0), AccessKind::Read, 1, &mut mem)
        .unwrap();

    vmm.release(pid);
    let err = vmm.translate(pid, VirtAddr::new(0), AccessKind::Read, 2, &mut mem);
    assert_eq!(err, Err(MmError::SegmentationFault));
}
