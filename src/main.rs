//! Ponto de entrada do simulador: monta o kernel com a geometria pedida
//! na linha de comando (ou os defaults) e entrega o controle ao shell.

use std::env;
use std::process::ExitCode;

use crisol::kernel::Kernel;
use crisol::mm::config::DEFAULT_QUANTUM;
use crisol::mm::MemConfig;
use crisol::shell;

fn main() -> ExitCode {
    println!("═══════════════════════════════════════════════");
    println!("  CRISOL — Simulador de Memória Virtual");
    println!("═══════════════════════════════════════════════");

    let args: Vec<String> = env::args().skip(1).collect();
    let cfg = match MemConfig::from_args(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("uso: crisol [<principal> <secundária> <página>]  (tamanhos em palavras)");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "página de {} palavras | principal {} | secundária {}",
        cfg.page_size, cfg.main_words, cfg.sec_words
    );

    let mut kernel = Kernel::new(cfg, DEFAULT_QUANTUM);
    shell::run(&mut kernel);
    ExitCode::SUCCESS
}
