//! # CPU Simulada (FRISC)
//!
//! Interpretador da CPU didática: dez registradores de uso geral, pc, sp
//! e uma PSW com flags de comparação. Cada instrução é uma palavra de
//! opcode (o caractere do mnemônico) seguida de zero a duas palavras de
//! operando.
//!
//! A CPU não conhece memória física: todo acesso sai por um `MemoryBus`,
//! atrás do qual o kernel coloca a tradução do VMM. Uma falha de
//! segmentação na tradução vira `BusError` aqui.
//!
//! A CPU devolve o controle ao kernel por quatro motivos: fim do quantum
//! (`ClockTick`), fim do programa (`ProcessEnd`), instrução malformada
//! (`BadInstruction`) ou acesso ilegal (`BusError`).

use bitflags::bitflags;

use crate::core::Channel;
use crate::mm::{MmResult, Pid, Timestamp, Word};

/// Registradores de uso geral.
pub const NUM_REGS: usize = 10;

bitflags! {
    /// Flags da Processor Status Word, escritas por `COMP`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Psw: u8 {
        /// Último COMP deu igual
        const ZERO = 1 << 0;
        /// Último COMP deu menor
        const NEGATIVE = 1 << 1;
    }
}

// =============================================================================
// OPCODES
// =============================================================================
//
// Uma palavra por opcode; o valor é o caractere do mnemônico original.
//

/// `LODM r addr` — reg[r] = mem[addr]
pub const OP_LODM: Word = 'm' as Word;
/// `LOIM r imm` — reg[r] = imm
pub const OP_LOIM: Word = 'l' as Word;
/// `STDM r addr` — mem[addr] = reg[r]
pub const OP_STDM: Word = 's' as Word;
/// `INCR r` — reg[r] += 1
pub const OP_INCR: Word = 'i' as Word;
/// `DECR r` — reg[r] -= 1
pub const OP_DECR: Word = 'r' as Word;
/// `ADDR r1 r2` — reg[r1] += reg[r2]
pub const OP_ADDR: Word = 'a' as Word;
/// `SUBR r1 r2` — reg[r1] -= reg[r2]
pub const OP_SUBR: Word = 'u' as Word;
/// `COMP r1 r2` — PSW ← comparação de reg[r1] com reg[r2]
pub const OP_COMP: Word = 'c' as Word;
/// `BRAN addr` — desvio incondicional
pub const OP_BRAN: Word = 'b' as Word;
/// `BRNN addr` — desvia se o último COMP não deu igual
pub const OP_BRNN: Word = 'n' as Word;
/// `CLER r` — reg[r] = 0
pub const OP_CLER: Word = 'z' as Word;
/// `DISC r` — exibe o registrador no console
pub const OP_DISC: Word = 'd' as Word;
/// `DISM addr` — exibe a palavra de memória no console
pub const OP_DISM: Word = 'o' as Word;
/// `NOP`
pub const OP_NOP: Word = 'x' as Word;
/// `PUSH r` — empilha reg[r]
pub const OP_PUSH: Word = 'P' as Word;
/// `POP r` — desempilha para reg[r]
pub const OP_POP: Word = 'O' as Word;
/// `GOSU addr` — empilha o pc de retorno e desvia
pub const OP_GOSU: Word = 'S' as Word;
/// `RETU` — retorna ao pc empilhado
pub const OP_RETU: Word = 'R' as Word;
/// `EXIT` — encerra o programa
pub const OP_EXIT: Word = 'e' as Word;

/// Estado completo da CPU de um processo (salvo entre fatias).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuContext {
    pub pid: Pid,
    pub pc: Word,
    pub sp: Word,
    pub psw: Psw,
    pub reg: [Word; NUM_REGS],
}

impl CpuContext {
    /// Contexto inicial: pc no começo da imagem, sp no topo dela.
    pub fn new(pid: Pid, sp: Word) -> Self {
        Self {
            pid,
            pc: 0,
            sp,
            psw: Psw::empty(),
            reg: [0; NUM_REGS],
        }
    }
}

/// Por que a CPU devolveu o controle ao kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuOutcome {
    /// Quantum esgotado
    ClockTick,
    /// Programa terminou (EXIT)
    ProcessEnd,
    /// Instrução malformada
    BadInstruction,
    /// Acesso ilegal à memória
    BusError,
}

/// O barramento que a CPU enxerga: endereços virtuais, relógio do kernel.
pub trait MemoryBus {
    /// Avança o relógio lógico (um tick por instrução executada).
    fn tick(&mut self) -> Timestamp;
    fn read(&mut self, addr: usize) -> MmResult<Word>;
    fn write(&mut self, addr: usize, value: Word) -> MmResult<()>;
}

/// Executa até `quantum` instruções do contexto dado.
pub fn run(ctx: &mut CpuContext, bus: &mut dyn MemoryBus, quantum: u32) -> CpuOutcome {
    for _ in 0..quantum {
        bus.tick();
        match step(ctx, bus) {
            None => {}
            Some(outcome) => return outcome,
        }
    }
    crate::knoise!(Channel::Cpu, "quantum esgotado, pid {} pc {}", ctx.pid, ctx.pc);
    CpuOutcome::ClockTick
}

/// Executa uma instrução. `None` = continuar.
fn step(ctx: &mut CpuContext, bus: &mut dyn MemoryBus) -> Option<CpuOutcome> {
    match step_inner(ctx, bus) {
        Ok(done) => done,
        Err(outcome) => Some(outcome),
    }
}

fn step_inner(
    ctx: &mut CpuContext,
    bus: &mut dyn MemoryBus,
) -> Result<Option<CpuOutcome>, CpuOutcome> {
    let op = fetch(ctx, bus)?;
    crate::knoise!(
        Channel::Cpu,
        "pid {} pc {} op '{}'",
        ctx.pid,
        ctx.pc - 1,
        opcode_char(op)
    );

    match op {
        OP_NOP => {}
        OP_EXIT => return Ok(Some(CpuOutcome::ProcessEnd)),
        OP_LOIM => {
            let r = fetch_reg(ctx, bus)?;
            let imm = fetch(ctx, bus)?;
            ctx.reg[r] = imm;
        }
        OP_LODM => {
            let r = fetch_reg(ctx, bus)?;
            let addr = fetch_addr(ctx, bus)?;
            ctx.reg[r] = bus.read(addr).map_err(|_| CpuOutcome::BusError)?;
        }
        OP_STDM => {
            let r = fetch_reg(ctx, bus)?;
            let addr = fetch_addr(ctx, bus)?;
            bus.write(addr, ctx.reg[r])
                .map_err(|_| CpuOutcome::BusError)?;
        }
        OP_INCR => {
            let r = fetch_reg(ctx, bus)?;
            ctx.reg[r] += 1;
        }
        OP_DECR => {
            let r = fetch_reg(ctx, bus)?;
            ctx.reg[r] -= 1;
        }
        OP_ADDR => {
            let r1 = fetch_reg(ctx, bus)?;
            let r2 = fetch_reg(ctx, bus)?;
            ctx.reg[r1] += ctx.reg[r2];
        }
        OP_SUBR => {
            let r1 = fetch_reg(ctx, bus)?;
            let r2 = fetch_reg(ctx, bus)?;
            ctx.reg[r1] -= ctx.reg[r2];
        }
        OP_COMP => {
            let r1 = fetch_reg(ctx, bus)?;
            let r2 = fetch_reg(ctx, bus)?;
            ctx.psw = Psw::empty();
            if ctx.reg[r1] == ctx.reg[r2] {
                ctx.psw |= Psw::ZERO;
            }
            if ctx.reg[r1] < ctx.reg[r2] {
                ctx.psw |= Psw::NEGATIVE;
            }
        }
        OP_CLER => {
            let r = fetch_reg(ctx, bus)?;
            ctx.reg[r] = 0;
        }
        OP_BRAN => {
            let target = fetch(ctx, bus)?;
            ctx.pc = target;
        }
        OP_BRNN => {
            let target = fetch(ctx, bus)?;
            if !ctx.psw.contains(Psw::ZERO) {
                ctx.pc = target;
            }
        }
        OP_DISC => {
            let r = fetch_reg(ctx, bus)?;
            println!("R{} = {}", r, ctx.reg[r]);
        }
        OP_DISM => {
            let addr = fetch_addr(ctx, bus)?;
            let value = bus.read(addr).map_err(|_| CpuOutcome::BusError)?;
            println!("M[{}] = {}", addr, value);
        }
        OP_PUSH => {
            let r = fetch_reg(ctx, bus)?;
            let value = ctx.reg[r];
            push(ctx, bus, value)?;
        }
        OP_POP => {
            let r = fetch_reg(ctx, bus)?;
            ctx.reg[r] = pop(ctx, bus)?;
        }
        OP_GOSU => {
            let target = fetch(ctx, bus)?;
            let ret = ctx.pc;
            push(ctx, bus, ret)?;
            ctx.pc = target;
        }
        OP_RETU => {
            ctx.pc = pop(ctx, bus)?;
        }
        _ => {
            crate::kerror!(
                "(CPU) instrução desconhecida {} no pc {} (pid {})",
                op,
                ctx.pc - 1,
                ctx.pid
            );
            return Err(CpuOutcome::BadInstruction);
        }
    }
    Ok(None)
}

/// Busca a próxima palavra no pc e avança.
fn fetch(ctx: &mut CpuContext, bus: &mut dyn MemoryBus) -> Result<Word, CpuOutcome> {
    let addr = to_addr(ctx.pc)?;
    let word = bus.read(addr).map_err(|_| CpuOutcome::BusError)?;
    ctx.pc += 1;
    Ok(word)
}

/// Busca um operando de registrador e valida o índice.
fn fetch_reg(ctx: &mut CpuContext, bus: &mut dyn MemoryBus) -> Result<usize, CpuOutcome> {
    let r = fetch(ctx, bus)?;
    if !(0..NUM_REGS as Word).contains(&r) {
        crate::kerror!("(CPU) registrador inválido {} (pid {})", r, ctx.pid);
        return Err(CpuOutcome::BadInstruction);
    }
    Ok(r as usize)
}

/// Busca um operando de endereço e valida que é não-negativo.
fn fetch_addr(ctx: &mut CpuContext, bus: &mut dyn MemoryBus) -> Result<usize, CpuOutcome> {
    to_addr(fetch(ctx, bus)?)
}

/// Endereços virtuais negativos nunca chegam ao VMM.
fn to_addr(word: Word) -> Result<usize, CpuOutcome> {
    if word < 0 {
        return Err(CpuOutcome::BusError);
    }
    Ok(word as usize)
}

fn push(ctx: &mut CpuContext, bus: &mut dyn MemoryBus, value: Word) -> Result<(), CpuOutcome> {
    let sp = to_addr(ctx.sp - 1)?;
    bus.write(sp, value).map_err(|_| CpuOutcome::BusError)?;
    ctx.sp -= 1;
    Ok(())
}

fn pop(ctx: &mut CpuContext, bus: &mut dyn MemoryBus) -> Result<Word, CpuOutcome> {
    let sp = to_addr(ctx.sp)?;
    let value = bus.read(sp).map_err(|_| CpuOutcome::BusError)?;
    ctx.sp += 1;
    Ok(value)
}

fn opcode_char(op: Word) -> char {
    u8::try_from(op).map(char::from).unwrap_or('?')
}
