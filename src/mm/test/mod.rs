//! Testes do subsistema de memória.
//!
//! Cada arquivo cobre um módulo: a máquina de estados da page table, o
//! alocador de frames secundários, o tradutor com serviço de fault e o
//! motor de substituição LRU com write-back.

mod page_table_test;
mod reclaim_test;
mod translate_test;
