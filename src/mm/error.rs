//! Tipos de Erro do Subsistema de Memória
//!
//! Define erros estruturados para diagnóstico preciso de falhas no VMM.
//!
//! Nada aqui é re-tentado silenciosamente: um fault ou é servido de forma
//! transparente (page fault → fetch-and-map) ou é propagado como um destes
//! erros. Condições irrecuperáveis (falha do primitivo de cópia, transição
//! ilegal da máquina de estados) são `panic!`, não variantes.

/// Erros do subsistema de memória
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// Configuração inválida (página ou contagem de frames não-positiva)
    ConfigInvalid,
    /// Sem frame secundário livre para alocar
    OutOfSecondaryFrames,
    /// Endereço virtual não mapeado, ou endereço físico fora dos limites
    SegmentationFault,
    /// Motor de substituição chamado sem nenhuma página residente
    NoResidentPages,
    /// Operação exige página residente, mas o frame não está em memória
    NotResident,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigInvalid => "Configuração de memória inválida",
            Self::OutOfSecondaryFrames => "Sem frames secundários livres",
            Self::SegmentationFault => "Falha de segmentação",
            Self::NoResidentPages => "Nenhuma página residente (bug interno)",
            Self::NotResident => "Página não residente em memória principal",
        }
    }
}

impl std::fmt::Display for MmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::error::Error for MmError {}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;
