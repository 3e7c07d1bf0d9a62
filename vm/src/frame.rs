use std::fmt;

use crate::{
    error::{Result, VmError},
    Cell,
};

/// One physical memory slot.
///
/// `timestamp` is a logical clock value handed in by the frame table, never
/// wall time, so LRU ordering is reproducible.
#[derive(Debug, Clone)]
pub struct Frame {
    cells: Vec<Cell>,
    dirty: bool,
    timestamp: u64,
}

impl Frame {
    pub fn new(size: usize) -> Self {
        Frame {
            cells: vec![0; size],
            dirty: false,
            timestamp: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn read(&self, offset: usize) -> Result<Cell> {
        self.cells.get(offset).copied().ok_or(VmError::OffsetOutOfRange {
            offset,
            len: self.cells.len(),
        })
    }

    pub fn write(&mut self, offset: usize, value: Cell) -> Result<()> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(offset)
            .ok_or(VmError::OffsetOutOfRange { offset, len })?;

        *cell = value;

        Ok(())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Records an access at logical time `now`.
    pub fn touch(&mut self, now: u64) {
        debug_assert!(now > self.timestamp, "logical clock went backwards");

        self.timestamp = now;
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[dirty={} t={}]", self.dirty, self.timestamp)?;

        for (i, cell) in self.cells.iter().enumerate() {
            if i % 16 == 0 {
                writeln!(f)?;
                write!(f, " ")?;
            }
            write!(f, " {}", cell)?;
        }

        writeln!(f)
    }
}
