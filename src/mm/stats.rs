//! Contadores do VMM.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct VmmStats {
    translations: AtomicU64,
    page_faults: AtomicU64,
    evictions: AtomicU64,
    write_backs: AtomicU64,
}

impl VmmStats {
    pub const fn new() -> Self {
        Self {
            translations: AtomicU64::new(0),
            page_faults: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            write_backs: AtomicU64::new(0),
        }
    }

    pub fn inc_translation(&self) {
        self.translations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fault(&self) {
        self.page_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_write_back(&self) {
        self.write_backs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn translations(&self) -> u64 {
        self.translations.load(Ordering::Relaxed)
    }

    pub fn page_faults(&self) -> u64 {
        self.page_faults.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn write_backs(&self) -> u64 {
        self.write_backs.load(Ordering::Relaxed)
    }
}
