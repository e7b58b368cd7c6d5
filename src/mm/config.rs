//! # Configuração do Módulo de Memória
//!
//! Os tamanhos vêm de fora (shell/kernel) em palavras; as contagens de
//! frames são derivadas daqui. A validação falha cedo: página zero,
//! memória zero ou tamanho que não é múltiplo inteiro da página são
//! `ConfigInvalid` na construção, nunca surpresas na tradução.

use super::error::{MmError, MmResult};

// =============================================================================
// DEFAULTS DO SIMULADOR
// =============================================================================

/// Palavras por página (default)
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Palavras de memória principal (default: 4 frames)
pub const DEFAULT_MAIN_WORDS: usize = 32;

/// Palavras de memória secundária (default: 16 frames)
pub const DEFAULT_SEC_WORDS: usize = 128;

/// Instruções por fatia de execução (o `RUN_LIMIT` do hardware didático)
pub const DEFAULT_QUANTUM: u32 = 6;

// =============================================================================
// CONFIGURAÇÃO VALIDADA
// =============================================================================

/// Geometria de memória do simulador, validada na construção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemConfig {
    /// Palavras por página
    pub page_size: usize,
    /// Palavras de memória principal
    pub main_words: usize,
    /// Palavras de memória secundária
    pub sec_words: usize,
    /// Frames de memória principal (`main_words / page_size`)
    pub num_main_frames: usize,
    /// Frames de memória secundária (`sec_words / page_size`)
    pub num_sec_frames: usize,
}

impl MemConfig {
    /// Deriva a geometria a partir dos tamanhos externos.
    pub fn new(page_size: usize, main_words: usize, sec_words: usize) -> MmResult<Self> {
        if page_size == 0 {
            crate::kerror!("(MM) page_size deve ser positivo");
            return Err(MmError::ConfigInvalid);
        }
        if main_words == 0 || main_words % page_size != 0 {
            crate::kerror!(
                "(MM) memória principal ({} palavras) não é múltiplo da página ({})",
                main_words,
                page_size
            );
            return Err(MmError::ConfigInvalid);
        }
        if sec_words == 0 || sec_words % page_size != 0 {
            crate::kerror!(
                "(MM) memória secundária ({} palavras) não é múltiplo da página ({})",
                sec_words,
                page_size
            );
            return Err(MmError::ConfigInvalid);
        }

        Ok(Self {
            page_size,
            main_words,
            sec_words,
            num_main_frames: main_words / page_size,
            num_sec_frames: sec_words / page_size,
        })
    }

    /// Configuração default do simulador.
    pub fn default_sim() -> Self {
        // Os defaults são válidos por construção.
        match Self::new(DEFAULT_PAGE_SIZE, DEFAULT_MAIN_WORDS, DEFAULT_SEC_WORDS) {
            Ok(cfg) => cfg,
            Err(_) => unreachable!("defaults inválidos"),
        }
    }

    /// Geometria vinda da linha de comando: `<principal> <secundária>
    /// <página>`, tudo em palavras. Sem argumentos, usa os defaults.
    pub fn from_args(args: &[String]) -> MmResult<Self> {
        match args {
            [] => Ok(Self::default_sim()),
            [main_words, sec_words, page_size] => {
                let main_words = parse_words(main_words)?;
                let sec_words = parse_words(sec_words)?;
                let page_size = parse_words(page_size)?;
                Self::new(page_size, main_words, sec_words)
            }
            _ => {
                crate::kerror!("(MM) esperados 0 ou 3 argumentos de geometria");
                Err(MmError::ConfigInvalid)
            }
        }
    }

    /// Quantas páginas inteiras são necessárias para `words` palavras.
    #[inline]
    pub const fn pages_for(&self, words: usize) -> usize {
        (words + self.page_size - 1) / self.page_size
    }
}

fn parse_words(arg: &str) -> MmResult<usize> {
    arg.parse().map_err(|_| {
        crate::kerror!("(MM) tamanho inválido na linha de comando: '{}'", arg);
        MmError::ConfigInvalid
    })
}
