// =============================================================================
// SISTEMA DE LOGGING - ZERO OVERHEAD
// =============================================================================
//
// Sistema de logging do Crisol com custo ZERO em release.
//
// ARQUITETURA:
// Este sistema foi projetado para ser completamente removível em release:
// - Usa features do Cargo para compile-time filtering
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - Escreve na saída padrão do processo (o "console serial" do simulador)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada operação)
//
// FEATURES:
// - no_logs:   Remove 100% dos logs (custo zero no binário)
// - log_error: Apenas ERROR, WARN
// - log_info:  ERROR, WARN, INFO
// - log_debug: ERROR, WARN, INFO, DEBUG
// - log_trace: Todos os níveis (padrão)
//
// COMO USAR:
//   kinfo!("(VMM) Inicializando...");
//   kdebug!("(VMM) frame={} vpage={}", frame, vpage);
//
// =============================================================================

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================
//
// Formato: \x1b[<código>m  onde:
//   1;31 = Bold Red
//   1;33 = Bold Yellow
//   32   = Green
//   36   = Cyan
//   35   = Magenta
//   0    = Reset
//

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================
//
// kerror! - Sempre ativo (exceto com no_logs)
// Usado para erros críticos que podem encerrar a simulação.
//

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        eprint!("{}", $crate::core::logging::P_ERROR);
        eprintln!($($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        eprint!("{}", $crate::core::logging::P_WARN);
        eprintln!($($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(any(feature = "log_info", feature = "log_debug", feature = "log_trace"))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        print!("{}", $crate::core::logging::P_INFO);
        println!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log_info", feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(any(feature = "log_debug", feature = "log_trace"))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        print!("{}", $crate::core::logging::P_DEBUG);
        println!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(feature = "log_trace")]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        print!("{}", $crate::core::logging::P_TRACE);
        println!($($arg)*);
    }};
}

#[cfg(not(feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($($arg:tt)*) => {{
        print!("\x1b[32m[OK]\x1b[0m ");
        println!($($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($($arg:tt)*) => {{
        eprint!("\x1b[1;31m[FAIL]\x1b[0m ");
        eprintln!($($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
