//! Tipos básicos do simulador: palavra de máquina, relógio lógico e
//! newtypes de ids e endereços.
//!
//! Os ids usam wrappers type-safe em vez de inteiros com sentinela `-1`:
//! "ausente" é `Option<...>`, nunca um valor mágico.

use std::fmt;

/// Palavra de máquina do simulador (o `WORD` do hardware didático).
pub type Word = i64;

/// Relógio lógico: um tick por instrução executada.
pub type Timestamp = u64;

/// Identificador de processo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Pid(u32);

impl Pid {
    #[inline]
    pub const fn new(pid: u32) -> Self {
        Self(pid)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Número de página virtual dentro do espaço de endereçamento de um processo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtPage(usize);

impl VirtPage {
    #[inline]
    pub const fn new(page: usize) -> Self {
        Self(page)
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for VirtPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frame de memória secundária. O id é o índice na page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SecFrameId(usize);

impl SecFrameId {
    #[inline]
    pub const fn new(frame: usize) -> Self {
        Self(frame)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SecFrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frame de memória principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MainFrameId(usize);

impl MainFrameId {
    #[inline]
    pub const fn new(frame: usize) -> Self {
        Self(frame)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MainFrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Endereço virtual (wrapper type-safe).
///
/// Endereços são inteiros não-negativos; valores negativos da CPU são
/// rejeitados antes de chegar aqui.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(usize);

impl VirtAddr {
    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Página virtual que contém este endereço.
    #[inline]
    pub const fn page(self, page_size: usize) -> VirtPage {
        VirtPage::new(self.0 / page_size)
    }

    /// Deslocamento dentro da página. Sempre em `[0, page_size)`.
    #[inline]
    pub const fn offset(self, page_size: usize) -> usize {
        self.0 % page_size
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Endereço físico na memória principal (wrapper type-safe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysAddr(usize);

impl PhysAddr {
    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tipo de acesso à memória.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, AccessKind::Write)
    }
}
