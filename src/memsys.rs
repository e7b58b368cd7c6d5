//! # Sistema de Memória Simulado
//!
//! Memória principal e secundária como arrays planos de palavras,
//! particionados em páginas de tamanho fixo. O VMM nunca toca o conteúdo
//! diretamente: tudo passa pelo primitivo de cópia de blocos
//! (`BlockCopy`), exatamente como o hardware didático expõe
//! `copySecToMain`/`copyMainToSec`.
//!
//! Cópia fora dos limites é fatal e aborta a simulação: depois de uma
//! cópia parcial não há como garantir integridade de dados.

use crate::core::Channel;
use crate::mm::{BlockCopy, MemConfig, Word};

/// Memória principal (física).
pub struct MainMemory {
    words: Vec<Word>,
}

impl MainMemory {
    pub fn new(size_words: usize) -> Self {
        Self {
            words: vec![0; size_words],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Lê uma palavra. Endereços vêm do tradutor, já validados; um índice
    /// inválido aqui é defeito interno e derruba a simulação.
    #[inline]
    pub fn read(&self, addr: usize) -> Word {
        self.words[addr]
    }

    /// Escreve uma palavra.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) {
        self.words[addr] = value;
    }

    /// Dump de um intervalo de endereços (diagnóstico). Intervalo é
    /// recortado para dentro dos limites.
    pub fn dump(&self, start: usize, end: usize) {
        let end = end.min(self.words.len());
        for (addr, word) in self.words[start.min(end)..end].iter().enumerate() {
            println!("  M[{:4}] = {}", start + addr, word);
        }
    }
}

/// Memória secundária (o "disco" de paginação).
pub struct SecondaryMemory {
    words: Vec<Word>,
}

impl SecondaryMemory {
    pub fn new(size_words: usize) -> Self {
        Self {
            words: vec![0; size_words],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn read(&self, addr: usize) -> Word {
        self.words[addr]
    }

    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) {
        self.words[addr] = value;
    }
}

/// As duas memórias juntas — o colaborador que o VMM enxerga.
pub struct MemSystem {
    pub main: MainMemory,
    pub sec: SecondaryMemory,
}

impl MemSystem {
    pub fn new(cfg: &MemConfig) -> Self {
        crate::kinfo!(
            "(MEM) principal: {} palavras, secundária: {} palavras",
            cfg.main_words,
            cfg.sec_words
        );
        Self {
            main: MainMemory::new(cfg.main_words),
            sec: SecondaryMemory::new(cfg.sec_words),
        }
    }
}

impl BlockCopy for MemSystem {
    fn copy_sec_to_main(&mut self, sec_offset: usize, main_offset: usize, words: usize) {
        crate::knoise!(
            Channel::Mem,
            "copiando {} palavras sec[{}..] -> main[{}..]",
            words,
            sec_offset,
            main_offset
        );
        if sec_offset + words > self.sec.len() || main_offset + words > self.main.len() {
            crate::kerror!(
                "(MEM) cópia sec->main fora dos limites: sec[{}+{}] main[{}+{}]",
                sec_offset,
                words,
                main_offset,
                words
            );
            panic!("cópia de bloco fora dos limites");
        }
        for i in 0..words {
            let value = self.sec.read(sec_offset + i);
            self.main.write(main_offset + i, value);
        }
    }

    fn copy_main_to_sec(&mut self, main_offset: usize, sec_offset: usize, words: usize) {
        crate::knoise!(
            Channel::Mem,
            "copiando {} palavras main[{}..] -> sec[{}..]",
            words,
            main_offset,
            sec_offset
        );
        if main_offset + words > self.main.len() || sec_offset + words > self.sec.len() {
            crate::kerror!(
                "(MEM) cópia main->sec fora dos limites: main[{}+{}] sec[{}+{}]",
                main_offset,
                words,
                sec_offset,
                words
            );
            panic!("cópia de bloco fora dos limites");
        }
        for i in 0..words {
            let value = self.main.read(main_offset + i);
            self.sec.write(sec_offset + i, value);
        }
    }
}
