//! Crisol — Simulador Educacional de Memória Virtual.
//!
//! Ponto central de exportação dos módulos do simulador.
//! Reproduz, em espaço de usuário, a camada de gerenciamento de memória
//! de um sistema operacional didático: uma CPU executa programas contra
//! endereços virtuais, o kernel carrega imagens de processo na memória
//! secundária e o VMM traduz endereços sob demanda com substituição LRU.

// --- Módulos Centrais (Infraestrutura) ---
pub mod core; // Logging e canais de diagnóstico (noise)

// --- Hardware Simulado ---
pub mod cpu; // Interpretador da CPU (FRISC)
pub mod memsys; // Memória principal e secundária (arrays de palavras)

// --- Gerenciamento de Memória (o núcleo) ---
pub mod mm; // Page Table, Alocador, Tradutor, Substituição LRU

// --- Sistema Operacional Simulado ---
pub mod kernel; // Tabela de processos, loader, laço de execução
pub mod shell; // Laço de comandos interativo (load/run/ps/dpt)
