//! Testes do motor de substituição: política LRU, desempate e write-back.

use crate::memsys::MemSystem;
use crate::mm::page_table::PageTable;
use crate::mm::reclaim;
use crate::mm::types::{AccessKind, MainFrameId, Pid, SecFrameId, VirtAddr, VirtPage, Word};
use crate::mm::{MemConfig, MmError, Vmm};

/// Página de 4 palavras, 2 frames principais, 4 frames secundários.
fn setup() -> (Vmm, MemSystem) {
    let cfg = MemConfig::new(4, 8, 16).unwrap();
    (Vmm::new(cfg), MemSystem::new(&cfg))
}

fn load_page(vmm: &mut Vmm, mem: &mut MemSystem, pid: Pid, vpage: usize, fill: Word) -> SecFrameId {
    let frame = vmm.allocate(pid).unwrap();
    vmm.bind(frame, VirtPage::new(vpage));
    for i in 0..vmm.config().page_size {
        mem.sec.write(frame.index() * vmm.config().page_size + i, fill);
    }
    frame
}

fn read(vmm: &mut Vmm, mem: &mut MemSystem, pid: Pid, addr: usize, now: u64) -> Word {
    let paddr = vmm
        .translate(pid, VirtAddr::new(addr), AccessKind::Read, now, mem)
        .unwrap();
    mem.main.read(paddr.as_usize())
}

fn write(vmm: &mut Vmm, mem: &mut MemSystem, pid: Pid, addr: usize, value: Word, now: u64) {
    let paddr = vmm
        .translate(pid, VirtAddr::new(addr), AccessKind::Write, now, mem)
        .unwrap();
    mem.main.write(paddr.as_usize(), value);
}

#[test]
fn frame_livre_antes_de_evictar() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, 1);
    load_page(&mut vmm, &mut mem, pid, 1, 2);

    read(&mut vmm, &mut mem, pid, 0, 1);
    read(&mut vmm, &mut mem, pid, 4, 2);

    // Dois frames principais, duas páginas: ninguém foi evictado.
    assert_eq!(vmm.stats().evictions(), 0);
    assert_eq!(vmm.stats().page_faults(), 2);
}

#[test]
fn vitima_e_a_menos_recentemente_usada() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    let f0 = load_page(&mut vmm, &mut mem, pid, 0, 1);
    let f1 = load_page(&mut vmm, &mut mem, pid, 1, 2);
    let f2 = load_page(&mut vmm, &mut mem, pid, 2, 3);

    read(&mut vmm, &mut mem, pid, 0, 1); // v0 em t=1
    read(&mut vmm, &mut mem, pid, 4, 2); // v1 em t=2
    read(&mut vmm, &mut mem, pid, 0, 3); // v0 de novo em t=3
    read(&mut vmm, &mut mem, pid, 8, 4); // v2 força eviction

    // A vítima é v1 (last_ref mais antigo), não v0.
    assert_eq!(vmm.table().residency_of(f1), None);
    assert!(vmm.table().residency_of(f0).is_some());
    assert!(vmm.table().residency_of(f2).is_some());
    assert_eq!(vmm.stats().evictions(), 1);
}

#[test]
fn empate_no_last_ref_escolhe_o_menor_indice() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    let f0 = load_page(&mut vmm, &mut mem, pid, 0, 1);
    let f1 = load_page(&mut vmm, &mut mem, pid, 1, 2);
    load_page(&mut vmm, &mut mem, pid, 2, 3);

    // Mesmo relógio nos dois acessos: empate deliberado.
    read(&mut vmm, &mut mem, pid, 0, 5);
    read(&mut vmm, &mut mem, pid, 4, 5);
    read(&mut vmm, &mut mem, pid, 8, 6);

    assert_eq!(vmm.table().residency_of(f0), None);
    assert!(vmm.table().residency_of(f1).is_some());
}

#[test]
fn pagina_suja_tem_write_back() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    let f0 = load_page(&mut vmm, &mut mem, pid, 0, 0);
    load_page(&mut vmm, &mut mem, pid, 1, 0);
    load_page(&mut vmm, &mut mem, pid, 2, 0);

    write(&mut vmm, &mut mem, pid, 0, 99, 1);
    read(&mut vmm, &mut mem, pid, 4, 2);
    read(&mut vmm, &mut mem, pid, 8, 3); // evicta v0 (suja)

    // A memória secundária reflete a escrita confirmada.
    assert_eq!(mem.sec.read(f0.index() * 4), 99);
    assert_eq!(vmm.stats().write_backs(), 1);
    assert_eq!(vmm.stats().evictions(), 1);
}

#[test]
fn pagina_limpa_nao_tem_write_back() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    let f0 = load_page(&mut vmm, &mut mem, pid, 0, 7);
    load_page(&mut vmm, &mut mem, pid, 1, 0);
    load_page(&mut vmm, &mut mem, pid, 2, 0);

    read(&mut vmm, &mut mem, pid, 0, 1);
    read(&mut vmm, &mut mem, pid, 4, 2);
    read(&mut vmm, &mut mem, pid, 8, 3); // evicta v0 (limpa)

    assert_eq!(mem.sec.read(f0.index() * 4), 7);
    assert_eq!(vmm.stats().write_backs(), 0);
    assert_eq!(vmm.stats().evictions(), 1);
}

#[test]
fn escrita_sobrevive_a_eviction_e_reincarnacao() {
    let (mut vmm, mut mem) = setup();
    let pid = Pid::new(1);
    load_page(&mut vmm, &mut mem, pid, 0, 0);
    load_page(&mut vmm, &mut mem, pid, 1, 0);
    load_page(&mut vmm, &mut mem, pid, 2, 0);

    write(&mut vmm, &mut mem, pid, 1, 42, 1);
    read(&mut vmm, &mut mem, pid, 4, 2);
    read(&mut vmm, &mut mem, pid, 8, 3); // v0 sai com write-back

    // v0 volta para a memória principal com o valor escrito.
    assert_eq!(read(&mut vmm, &mut mem, pid, 1, 4), 42);
    assert_eq!(vmm.stats().page_faults(), 4);
}

#[test]
fn select_victim_sem_residentes_e_erro() {
    let table = PageTable::new(2);
    assert_eq!(reclaim::select_victim(&table), Err(MmError::NoResidentPages));
}

#[test]
fn find_free_main_frame_entrega_o_menor() {
    let mut table = PageTable::new(3);
    assert_eq!(
        reclaim::find_free_main_frame(&table, 2),
        Some(MainFrameId::new(0))
    );

    table.claim(SecFrameId::new(0), Pid::new(1));
    table.bind(SecFrameId::new(0), VirtPage::new(0));
    table.set_resident(SecFrameId::new(0), MainFrameId::new(0));
    assert_eq!(
        reclaim::find_free_main_frame(&table, 2),
        Some(MainFrameId::new(1))
    );

    table.claim(SecFrameId::new(1), Pid::new(1));
    table.bind(SecFrameId::new(1), VirtPage::new(1));
    table.set_resident(SecFrameId::new(1), MainFrameId::new(1));
    assert_eq!(reclaim::find_free_main_frame(&table, 2), None);
}
