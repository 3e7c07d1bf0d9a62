//! Narrow "record access" capability handed to the MMU.

use std::fmt;

use crate::Cell;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One completed memory access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AccessRecord {
    pub kind: AccessKind,
    pub address: usize,
    pub page: usize,
    pub offset: usize,
    pub frame: usize,
    /// Value read, or value written.
    pub value: Cell,
    /// Whether the access had to go through fault handling.
    pub faulted: bool,
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            AccessKind::Read => "Value at address",
            AccessKind::Write => "Wrote address",
        };

        write!(
            f,
            "{} {}: {} (page {}, offset {}, frame {}{})",
            verb,
            self.address,
            self.value,
            self.page,
            self.offset,
            self.frame,
            if self.faulted { ", fault" } else { "" }
        )
    }
}

/// Sink for per-access reports. Recording never affects translation.
pub trait AccessRecorder {
    fn record(&mut self, access: &AccessRecord);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl AccessRecorder for NullRecorder {
    fn record(&mut self, _access: &AccessRecord) {}
}

/// Keeps every record in memory.
impl AccessRecorder for Vec<AccessRecord> {
    fn record(&mut self, access: &AccessRecord) {
        self.push(*access);
    }
}

impl<R: AccessRecorder + ?Sized> AccessRecorder for &mut R {
    fn record(&mut self, access: &AccessRecord) {
        (**self).record(access)
    }
}

impl<R: AccessRecorder + ?Sized> AccessRecorder for Box<R> {
    fn record(&mut self, access: &AccessRecord) {
        (**self).record(access)
    }
}
