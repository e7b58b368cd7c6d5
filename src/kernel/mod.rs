//! # Kernel Simulado
//!
//! O sistema operacional didático por cima do hardware simulado: tabela
//! de processos, carga de imagens página a página na memória secundária
//! e o laço de execução com fatias de tempo.
//!
//! ## Disciplina de seção crítica
//!
//! O `Vmm` vive dentro de um `spin::Mutex`: cada acesso da CPU atravessa
//! o barramento do kernel segurando o lock, de modo que a sequência
//! completa de serviço de fault (escolha de frame, write-back, cópia,
//! marcação de residência) nunca é observada pela metade.

pub mod loader;
pub mod process;

pub use loader::Program;
pub use process::{Process, ProcessState};

use spin::Mutex;

use crate::core::Channel;
use crate::cpu::{self, CpuOutcome, MemoryBus};
use crate::memsys::MemSystem;
use crate::mm::{
    AccessKind, MemConfig, MmResult, Pid, Timestamp, VirtAddr, VirtPage, Vmm, Word,
};

/// O barramento que o kernel apresenta à CPU: endereços virtuais entram,
/// a tradução acontece aqui dentro e a palavra sai da memória principal.
struct KernelBus<'a> {
    pid: Pid,
    vmm: &'a mut Vmm,
    mem: &'a mut MemSystem,
    clock: &'a mut Timestamp,
}

impl MemoryBus for KernelBus<'_> {
    fn tick(&mut self) -> Timestamp {
        *self.clock += 1;
        *self.clock
    }

    fn read(&mut self, addr: usize) -> MmResult<Word> {
        let paddr = self.vmm.translate(
            self.pid,
            VirtAddr::new(addr),
            AccessKind::Read,
            *self.clock,
            self.mem,
        )?;
        Ok(self.mem.main.read(paddr.as_usize()))
    }

    fn write(&mut self, addr: usize, value: Word) -> MmResult<()> {
        let paddr = self.vmm.translate(
            self.pid,
            VirtAddr::new(addr),
            AccessKind::Write,
            *self.clock,
            self.mem,
        )?;
        self.mem.main.write(paddr.as_usize(), value);
        Ok(())
    }
}

/// O kernel: dono do VMM, das memórias, do relógio e dos processos.
pub struct Kernel {
    cfg: MemConfig,
    vmm: Mutex<Vmm>,
    mem: MemSystem,
    clock: Timestamp,
    quantum: u32,
    procs: Vec<Process>,
    next_pid: u32,
}

impl Kernel {
    pub fn new(cfg: MemConfig, quantum: u32) -> Self {
        crate::kinfo!("(KERNEL) boot: quantum de {} instruções", quantum);
        Self {
            cfg,
            vmm: Mutex::new(Vmm::new(cfg)),
            mem: MemSystem::new(&cfg),
            clock: 0,
            quantum,
            procs: Vec::new(),
            next_pid: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &MemConfig {
        &self.cfg
    }

    #[inline]
    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    /// Acesso ao VMM (diagnóstico e testes). Segura o lock enquanto o
    /// guard viver.
    pub fn vmm(&self) -> spin::MutexGuard<'_, Vmm> {
        self.vmm.lock()
    }

    /// Entrada da tabela de processos, se o pid existir.
    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.procs.iter().find(|p| p.pid == pid)
    }

    /// Carrega uma imagem de programa: aloca e vincula frames secundários
    /// em ordem de página virtual e transmite o código palavra a palavra.
    /// Nada fica residente na memória principal até o primeiro acesso.
    ///
    /// Se a memória secundária esgotar no meio da carga, tudo que já foi
    /// alocado é devolvido e o processo não entra na tabela.
    pub fn load(&mut self, program: Program) -> MmResult<Pid> {
        let pid = Pid::new(self.next_pid);
        let total = program.total_words();
        let pages = self.cfg.pages_for(total);
        crate::kinfo!(
            "(KERNEL) carregando '{}' como pid {}: {} palavras, {} páginas",
            program.name,
            pid,
            total,
            pages
        );

        let mut vmm = self.vmm.lock();
        for vpage in 0..pages {
            let frame = match vmm.allocate(pid) {
                Ok(frame) => frame,
                Err(err) => {
                    crate::kfail!("carga de '{}' abortada: {}", program.name, err);
                    vmm.release(pid);
                    return Err(err);
                }
            };
            vmm.bind(frame, VirtPage::new(vpage));

            // Transmite a fatia de código desta página; o resto do frame
            // (heap/pilha, ou frame reciclado) é zerado.
            let base = vpage * self.cfg.page_size;
            for off in 0..self.cfg.page_size {
                let word = program.code.get(base + off).copied().unwrap_or(0);
                self.mem
                    .sec
                    .write(frame.index() * self.cfg.page_size + off, word);
            }
            crate::knoise!(
                Channel::Os,
                "vpage {} do pid {} no frame secundário {}",
                vpage,
                pid,
                frame
            );
        }
        drop(vmm);

        self.procs
            .push(Process::new(pid, program.name, program.code.len(), total));
        self.next_pid += 1;
        crate::kok!("pid {} pronto para executar", pid);
        Ok(pid)
    }

    /// Executa o processo até o fim (ou até uma falha fatal), em fatias
    /// de `quantum` instruções. `None` se o pid não existe ou já terminou.
    ///
    /// No término — normal ou não — todos os frames do processo são
    /// devolvidos; o conteúdo residente morre com ele.
    pub fn run(&mut self, pid: Pid) -> Option<CpuOutcome> {
        let idx = self
            .procs
            .iter()
            .position(|p| p.pid == pid && p.state != ProcessState::Terminated)?;

        let Kernel {
            vmm,
            mem,
            clock,
            quantum,
            procs,
            ..
        } = self;
        let proc = &mut procs[idx];
        proc.state = ProcessState::Running;
        crate::knoise!(Channel::Os, "despachando pid {}", pid);

        let mut vmm = vmm.lock();
        let outcome = loop {
            let mut bus = KernelBus {
                pid,
                vmm: &mut vmm,
                mem,
                clock,
            };
            match cpu::run(&mut proc.cpu, &mut bus, *quantum) {
                CpuOutcome::ClockTick => {
                    // Fim de fatia. Sem outros processos prontos no laço,
                    // o mesmo volta à CPU.
                    crate::knoise!(Channel::Os, "fim de fatia do pid {}", pid);
                }
                outcome => break outcome,
            }
        };

        match outcome {
            CpuOutcome::ProcessEnd => {
                crate::kok!("pid {} terminou normalmente", pid);
            }
            CpuOutcome::BadInstruction => {
                crate::kfail!("pid {} abortado: instrução ilegal", pid);
            }
            CpuOutcome::BusError => {
                crate::kfail!("pid {} abortado: erro de barramento", pid);
            }
            CpuOutcome::ClockTick => unreachable!("fatia não encerra o laço"),
        }

        vmm.release(pid);
        proc.state = ProcessState::Terminated;
        Some(outcome)
    }

    /// Imprime a tabela de processos (comando `ps`).
    pub fn ps(&self) {
        println!(" PID  PROGRAMA      ESTADO       CÓDIGO  TOTAL  PC     SP");
        println!(" ---  ------------  -----------  ------  -----  -----  -----");
        for p in &self.procs {
            println!(
                " {:<4} {:<13} {:<12} {:<7} {:<6} {:<6} {:<6}",
                p.pid,
                p.name,
                p.state.as_str(),
                p.code_words,
                p.total_words,
                p.cpu.pc,
                p.cpu.sp
            );
        }
        if self.procs.is_empty() {
            println!(" (nenhum processo)");
        }
    }

    /// Imprime um intervalo da memória principal (comando `dmem`).
    pub fn dmem(&self, start: usize, end: usize) {
        self.mem.main.dump(start, end);
    }

    /// Imprime a page table e os contadores do VMM (comando `dpt`).
    pub fn dpt(&self) {
        let vmm = self.vmm.lock();
        println!(" FRAME  LIVRE  PID  VPAGE  MAIN  DIRTY  LASTREF");
        println!(" -----  -----  ---  -----  ----  -----  -------");
        for rec in vmm.snapshot() {
            let opt = |v: Option<String>| v.unwrap_or_else(|| "-".into());
            println!(
                " {:<6} {:<6} {:<4} {:<6} {:<5} {:<6} {:<7}",
                rec.frame,
                if rec.occupied { "não" } else { "sim" },
                opt(rec.owner.map(|p| p.to_string())),
                opt(rec.vpage.map(|v| v.to_string())),
                opt(rec.main_frame.map(|m| m.to_string())),
                if rec.dirty { "sim" } else { "não" },
                opt(rec.last_ref.map(|t| t.to_string())),
            );
        }
        let stats = vmm.stats();
        println!(
            " traduções: {}  faults: {}  evicções: {}  write-backs: {}  clock: {}",
            stats.translations(),
            stats.page_faults(),
            stats.evictions(),
            stats.write_backs(),
            self.clock
        );
    }

    #[cfg(test)]
    pub(crate) fn cpu_of(&self, pid: Pid) -> Option<&cpu::CpuContext> {
        self.process(pid).map(|p| &p.cpu)
    }
}
