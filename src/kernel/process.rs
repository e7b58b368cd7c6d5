//! Tabela de processos do kernel simulado.

use crate::cpu::CpuContext;
use crate::mm::Pid;

/// Estado de escalonamento de um processo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Carregado, pronto para executar
    Ready,
    /// Executando (dono da CPU)
    Running,
    /// Terminou (frames já devolvidos)
    Terminated,
}

impl ProcessState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Ready => "pronto",
            ProcessState::Running => "executando",
            ProcessState::Terminated => "terminado",
        }
    }
}

/// Uma entrada da tabela de processos.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub name: &'static str,
    pub state: ProcessState,
    /// Palavras de código da imagem
    pub code_words: usize,
    /// Tamanho total do espaço virtual (código + heap + pilha)
    pub total_words: usize,
    /// Contexto de CPU salvo entre fatias
    pub cpu: CpuContext,
}

impl Process {
    pub fn new(pid: Pid, name: &'static str, code_words: usize, total_words: usize) -> Self {
        Self {
            pid,
            name,
            state: ProcessState::Ready,
            code_words,
            total_words,
            cpu: CpuContext::new(pid, total_words as crate::mm::Word),
        }
    }
}
