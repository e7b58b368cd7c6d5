//! Testes da page table: lookup chaveado, unicidade e máquina de estados.

use crate::mm::page_table::PageTable;
use crate::mm::types::{MainFrameId, Pid, SecFrameId, VirtPage};
use crate::mm::MmError;

fn table() -> PageTable {
    PageTable::new(4)
}

#[test]
fn comeca_toda_livre() {
    let t = table();
    assert_eq!(t.len(), 4);
    assert_eq!(t.first_free(), Some(SecFrameId::new(0)));
    assert!(t.snapshot().all(|rec| !rec.occupied));
}

#[test]
fn lookup_chaveado_por_pid_e_vpage() {
    let mut t = table();
    let p1 = Pid::new(1);
    let p2 = Pid::new(2);

    // Dois processos mapeiam a MESMA página virtual em frames distintos.
    t.claim(SecFrameId::new(0), p1);
    t.bind(SecFrameId::new(0), VirtPage::new(0));
    t.claim(SecFrameId::new(1), p2);
    t.bind(SecFrameId::new(1), VirtPage::new(0));

    assert_eq!(t.lookup(p1, VirtPage::new(0)), Some(SecFrameId::new(0)));
    assert_eq!(t.lookup(p2, VirtPage::new(0)), Some(SecFrameId::new(1)));
    assert_eq!(t.lookup(p1, VirtPage::new(1)), None);
    assert_eq!(t.lookup(Pid::new(9), VirtPage::new(0)), None);
}

#[test]
fn ordem_de_alocacao_nao_dita_o_mapeamento() {
    // As páginas virtuais chegam fora de ordem; o lookup tem que seguir o
    // vínculo registrado, nunca a posição do primeiro frame do processo.
    let mut t = table();
    let pid = Pid::new(7);

    t.claim(SecFrameId::new(0), pid);
    t.bind(SecFrameId::new(0), VirtPage::new(2));
    t.claim(SecFrameId::new(1), pid);
    t.bind(SecFrameId::new(1), VirtPage::new(0));

    assert_eq!(t.lookup(pid, VirtPage::new(2)), Some(SecFrameId::new(0)));
    assert_eq!(t.lookup(pid, VirtPage::new(0)), Some(SecFrameId::new(1)));
}

#[test]
fn first_free_pula_ocupados() {
    let mut t = table();
    t.claim(SecFrameId::new(0), Pid::new(1));
    t.claim(SecFrameId::new(1), Pid::new(1));
    assert_eq!(t.first_free(), Some(SecFrameId::new(2)));

    t.claim(SecFrameId::new(2), Pid::new(2));
    t.claim(SecFrameId::new(3), Pid::new(2));
    assert_eq!(t.first_free(), None);
}

#[test]
fn ciclo_de_residencia_completo() {
    let mut t = table();
    let pid = Pid::new(1);
    let frame = SecFrameId::new(0);
    let main = MainFrameId::new(1);

    t.claim(frame, pid);
    t.bind(frame, VirtPage::new(0));
    assert_eq!(t.residency_of(frame), None);
    assert_eq!(t.mark_accessed(frame, false, 5), Err(MmError::NotResident));

    // Fault servido: residente, limpa.
    t.set_resident(frame, main);
    assert_eq!(t.residency_of(frame), Some((main, false)));

    // Leitura atualiza last_ref, escrita também suja.
    assert_eq!(t.mark_accessed(frame, false, 5), Ok(main));
    assert_eq!(t.residency_of(frame), Some((main, false)));
    assert_eq!(t.mark_accessed(frame, true, 6), Ok(main));
    assert_eq!(t.residency_of(frame), Some((main, true)));

    // Eviction invalida só a residência; o frame continua do processo.
    assert_eq!(t.clear_resident(frame), main);
    assert_eq!(t.residency_of(frame), None);
    assert_eq!(t.lookup(pid, VirtPage::new(0)), Some(frame));
}

#[test]
fn termino_libera_apenas_o_dono() {
    let mut t = table();
    let p1 = Pid::new(1);
    let p2 = Pid::new(2);

    t.claim(SecFrameId::new(0), p1);
    t.bind(SecFrameId::new(0), VirtPage::new(0));
    t.claim(SecFrameId::new(1), p2);
    t.bind(SecFrameId::new(1), VirtPage::new(0));
    t.set_resident(SecFrameId::new(0), MainFrameId::new(0));

    // Libera residentes e não-residentes do p1, sem tocar no p2.
    t.free_all_for(p1);
    assert_eq!(t.lookup(p1, VirtPage::new(0)), None);
    assert_eq!(t.lookup(p2, VirtPage::new(0)), Some(SecFrameId::new(1)));
    assert_eq!(t.first_free(), Some(SecFrameId::new(0)));

    // Idempotente.
    t.free_all_for(p1);
    assert_eq!(t.lookup(p2, VirtPage::new(0)), Some(SecFrameId::new(1)));
}

#[test]
fn snapshot_reflete_o_estado() {
    let mut t = table();
    let pid = Pid::new(3);
    t.claim(SecFrameId::new(1), pid);
    t.bind(SecFrameId::new(1), VirtPage::new(4));
    t.set_resident(SecFrameId::new(1), MainFrameId::new(0));
    t.mark_accessed(SecFrameId::new(1), true, 9).unwrap();

    let recs: Vec<_> = t.snapshot().collect();
    assert!(!recs[0].occupied);
    assert!(recs[1].occupied);
    assert_eq!(recs[1].owner, Some(pid));
    assert_eq!(recs[1].vpage, Some(VirtPage::new(4)));
    assert_eq!(recs[1].main_frame, Some(MainFrameId::new(0)));
    assert!(recs[1].dirty);
    assert_eq!(recs[1].last_ref, Some(9));
}

#[test]
#[should_panic(expected = "já ocupado")]
fn claim_de_frame_ocupado_panica() {
    let mut t = table();
    t.claim(SecFrameId::new(0), Pid::new(1));
    t.claim(SecFrameId::new(0), Pid::new(2));
}

#[test]
#[should_panic(expected = "bind duplo")]
fn bind_duplo_panica() {
    let mut t = table();
    t.claim(SecFrameId::new(0), Pid::new(1));
    t.bind(SecFrameId::new(0), VirtPage::new(0));
    t.bind(SecFrameId::new(0), VirtPage::new(1));
}

#[test]
#[should_panic(expected = "já tem a página virtual")]
fn vinculo_duplicado_do_mesmo_pid_panica() {
    let mut t = table();
    let pid = Pid::new(1);
    t.claim(SecFrameId::new(0), pid);
    t.bind(SecFrameId::new(0), VirtPage::new(0));
    t.claim(SecFrameId::new(1), pid);
    t.bind(SecFrameId::new(1), VirtPage::new(0));
}

#[test]
#[should_panic(expected = "não residente")]
fn eviction_de_nao_residente_panica() {
    let mut t = table();
    t.claim(SecFrameId::new(0), Pid::new(1));
    t.bind(SecFrameId::new(0), VirtPage::new(0));
    t.clear_resident(SecFrameId::new(0));
}
