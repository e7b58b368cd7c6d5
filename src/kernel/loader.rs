//! Programas de demonstração e sua representação carregável.
//!
//! Um programa é a sequência de palavras da sua imagem de código mais a
//! reserva de heap e pilha. O kernel transmite a imagem página a página
//! para a memória secundária; nada fica residente até o primeiro acesso.

use crate::cpu::{
    OP_ADDR, OP_BRNN, OP_COMP, OP_DECR, OP_DISM, OP_EXIT, OP_GOSU, OP_LOIM, OP_NOP, OP_RETU,
    OP_STDM,
};
use crate::mm::Word;

/// Palavras reservadas além do código (heap no início, pilha no fim).
const EXTRA_WORDS: usize = 8;

/// Uma imagem de programa pronta para carga.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: &'static str,
    pub code: Vec<Word>,
    /// Palavras de heap + pilha além do código
    pub extra_words: usize,
}

impl Program {
    /// Tamanho total do espaço virtual do processo.
    #[inline]
    pub fn total_words(&self) -> usize {
        self.code.len() + self.extra_words
    }
}

/// Contagem regressiva: exibe 3, 2, 1 via heap e termina.
pub fn demo_countdown() -> Program {
    // O heap começa logo após o código (palavra 16).
    const H: Word = 16;
    let code = vec![
        OP_LOIM, 0, 3, //      0: r0 = 3
        OP_STDM, 0, H, //      3: heap = r0
        OP_DISM, H, //         6: exibe heap
        OP_DECR, 0, //         8: r0 -= 1
        OP_COMP, 0, 1, //     10: compara com r1 (0)
        OP_BRNN, 3, //        13: repete enquanto diferente
        OP_EXIT, //           15
    ];
    debug_assert_eq!(code.len(), H as usize);
    Program {
        name: "contagem",
        code,
        extra_words: EXTRA_WORDS,
    }
}

/// Soma por sub-rotina: chama `ADDR` via GOSU/RETU e exibe 7 + 5.
pub fn demo_sub_rotina() -> Program {
    const H: Word = 19;
    let code = vec![
        OP_LOIM, 0, 7, //      0: r0 = 7
        OP_LOIM, 1, 5, //      3: r1 = 5
        OP_GOSU, 15, //        6: chama a sub-rotina
        OP_STDM, 0, H, //      8: heap = r0
        OP_DISM, H, //        11: exibe heap
        OP_EXIT, //           13
        OP_NOP, //            14
        OP_ADDR, 0, 1, //     15: r0 += r1
        OP_RETU, //           18
    ];
    debug_assert_eq!(code.len(), H as usize);
    Program {
        name: "sub-rotina",
        code,
        extra_words: EXTRA_WORDS,
    }
}

/// Programa de demonstração pelo número do catálogo (1-based).
pub fn by_number(n: usize) -> Option<Program> {
    match n {
        1 => Some(demo_countdown()),
        2 => Some(demo_sub_rotina()),
        _ => None,
    }
}

/// Nomes do catálogo, na ordem de `by_number`.
pub fn catalog() -> &'static [&'static str] {
    &["contagem", "sub-rotina"]
}
