//! # Shell Interativo
//!
//! O laço de comandos do simulador: carrega programas de demonstração,
//! executa processos e inspeciona o estado do kernel e do VMM. Os
//! comandos `*noise` ligam o chatter de diagnóstico de cada subsistema.

use std::io::{self, BufRead, Write};

use crate::core::{noise, Channel};
use crate::kernel::{loader, Kernel};
use crate::mm::Pid;

const PROMPT: &str = "crisol> ";

/// Laço principal do shell. Retorna quando o usuário pede `exit` ou a
/// entrada acaba (EOF).
pub fn run(kernel: &mut Kernel) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        if !dispatch(kernel, &line) {
            break;
        }
    }
    println!("até logo");
}

/// Executa uma linha de comando. `false` encerra o shell.
fn dispatch(kernel: &mut Kernel, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let cmd = match parts.next() {
        Some(cmd) => cmd,
        None => return true,
    };

    match cmd {
        "load" => match parts.next().map(str::parse::<usize>) {
            Some(Ok(n)) => {
                match loader::by_number(n) {
                    Some(program) => {
                        if let Ok(pid) = kernel.load(program) {
                            println!("carregado como pid {}", pid);
                        }
                    }
                    None => println!("programa {} não existe (veja `load` sem argumento)", n),
                }
            }
            _ => {
                println!("uso: load <n>");
                for (i, name) in loader::catalog().iter().enumerate() {
                    println!("  {} - {}", i + 1, name);
                }
            }
        },
        "run" => match parts.next().map(str::parse::<u32>) {
            Some(Ok(pid)) => {
                if kernel.run(Pid::new(pid)).is_none() {
                    println!("pid {} não existe ou já terminou", pid);
                }
            }
            _ => println!("uso: run <pid>"),
        },
        "ps" => kernel.ps(),
        "dpt" => kernel.dpt(),
        "dmem" => {
            let start = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
            let end = parts
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(kernel.config().main_words);
            kernel.dmem(start, end);
        }
        "osnoise" => report(Channel::Os, noise::toggle(Channel::Os)),
        "cpunoise" => report(Channel::Cpu, noise::toggle(Channel::Cpu)),
        "memnoise" => report(Channel::Mem, noise::toggle(Channel::Mem)),
        "vmemnoise" => report(Channel::Vmem, noise::toggle(Channel::Vmem)),
        "noise" => noise::toggle_all(),
        "help" | "?" => help(),
        "exit" | "quit" => return false,
        other => println!("comando desconhecido: {} (tente `help`)", other),
    }
    true
}

fn report(ch: Channel, on: bool) {
    println!(
        "canal {} {}",
        ch.prefix().trim_end_matches(": "),
        if on { "ligado" } else { "desligado" }
    );
}

fn help() {
    println!("comandos:");
    println!("  load <n>    carrega o programa de demonstração n");
    println!("  run <pid>   executa o processo até o fim");
    println!("  ps          tabela de processos");
    println!("  dpt         page table e contadores do VMM");
    println!("  dmem [i f]  palavras da memória principal em [i, f)");
    println!("  osnoise     liga/desliga o chatter do kernel");
    println!("  cpunoise    liga/desliga o chatter da CPU");
    println!("  memnoise    liga/desliga o chatter da memória");
    println!("  vmemnoise   liga/desliga o chatter do VMM");
    println!("  noise       inverte todos os canais");
    println!("  exit        encerra o simulador");
}
