//! Canais de diagnóstico ligáveis em runtime ("noise").
//!
//! Além dos níveis de log filtrados em compile-time, o simulador mantém
//! quatro canais de chatter por subsistema que o usuário liga e desliga
//! pelo shell (`osnoise`, `cpunoise`, `memnoise`, `vmemnoise`). Cada canal
//! é um bit em uma máscara atômica compartilhada.

use std::sync::atomic::{AtomicU8, Ordering};

/// Máscara global dos canais ativos. Começa com tudo desligado.
static NOISE: AtomicU8 = AtomicU8::new(0);

/// Subsistemas com canal de diagnóstico próprio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Os,
    Cpu,
    Mem,
    Vmem,
}

impl Channel {
    const fn mask(self) -> u8 {
        match self {
            Channel::Cpu => 1 << 0,
            Channel::Mem => 1 << 1,
            Channel::Os => 1 << 2,
            Channel::Vmem => 1 << 3,
        }
    }

    /// Prefixo impresso nas mensagens do canal.
    pub const fn prefix(self) -> &'static str {
        match self {
            Channel::Os => "OS: ",
            Channel::Cpu => "CPU: ",
            Channel::Mem => "MEM: ",
            Channel::Vmem => "VMEM: ",
        }
    }
}

/// O canal está ligado?
#[inline]
pub fn enabled(ch: Channel) -> bool {
    NOISE.load(Ordering::Relaxed) & ch.mask() != 0
}

/// Inverte o estado do canal e retorna o novo estado (true = ligado).
pub fn toggle(ch: Channel) -> bool {
    let prev = NOISE.fetch_xor(ch.mask(), Ordering::Relaxed);
    let on = prev & ch.mask() == 0;
    if on {
        crate::kinfo!("(NOISE) Canal {:?} ligado", ch);
    }
    on
}

/// Inverte todos os canais de uma vez (comando `noise` do shell).
pub fn toggle_all() {
    toggle(Channel::Cpu);
    toggle(Channel::Mem);
    toggle(Channel::Os);
    toggle(Channel::Vmem);
}

/// knoise! - Chatter de diagnóstico condicionado ao canal em runtime.
///
/// # Uso
/// ```ignore
/// knoise!(Channel::Vmem, "PAGE FAULT pid={} vpage={}", pid, vpage);
/// ```
#[macro_export]
macro_rules! knoise {
    ($ch:expr, $($arg:tt)*) => {{
        if $crate::core::noise::enabled($ch) {
            print!("{}", $ch.prefix());
            println!($($arg)*);
        }
    }};
}
