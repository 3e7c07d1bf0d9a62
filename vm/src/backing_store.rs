//! Backing store: the slow, durable home of every page.

use crate::{
    error::{Result, VmError},
    Cell,
};

/// Per-page durable storage behind the frame pool.
///
/// Implementations must bounds-check every access and fail with
/// [`VmError::PageOutOfRange`] / [`VmError::OffsetOutOfRange`] instead of
/// clamping.
pub trait BackingStore {
    fn num_pages(&self) -> usize;

    fn page_size(&self) -> usize;

    fn read(&mut self, page: usize, offset: usize) -> Result<Cell>;

    fn write(&mut self, page: usize, offset: usize, value: Cell) -> Result<()>;

    /// Copies the whole page into `target`, cell by cell.
    fn load_page_into(&mut self, page: usize, target: &mut [Cell]) -> Result<()> {
        for (offset, cell) in target.iter_mut().enumerate() {
            *cell = self.read(page, offset)?;
        }

        Ok(())
    }

    /// Writes `buffer` back over the whole page, cell by cell.
    fn flush_page(&mut self, page: usize, buffer: &[Cell]) -> Result<()> {
        for (offset, &value) in buffer.iter().enumerate() {
            self.write(page, offset, value)?;
        }

        Ok(())
    }

    /// Makes sure writes reached durable storage. No-op for in-memory stores.
    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Validates a `(page, offset)` pair against a store geometry.
pub fn check_bounds(page: usize, offset: usize, num_pages: usize, page_size: usize) -> Result<()> {
    if page >= num_pages {
        return Err(VmError::PageOutOfRange { page, num_pages });
    }
    if offset >= page_size {
        return Err(VmError::OffsetOutOfRange {
            offset,
            len: page_size,
        });
    }

    Ok(())
}

/// Zero-initialized store held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryBackingStore {
    pages: Vec<Vec<Cell>>,
    page_size: usize,
}

impl MemoryBackingStore {
    pub fn new(num_pages: usize, page_size: usize) -> Self {
        MemoryBackingStore {
            pages: vec![vec![0; page_size]; num_pages],
            page_size,
        }
    }

    /// Read-only view of a page, as last written back.
    pub fn page(&self, page: usize) -> Option<&[Cell]> {
        self.pages.get(page).map(Vec::as_slice)
    }
}

impl BackingStore for MemoryBackingStore {
    fn num_pages(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn read(&mut self, page: usize, offset: usize) -> Result<Cell> {
        check_bounds(page, offset, self.pages.len(), self.page_size)?;

        Ok(self.pages[page][offset])
    }

    fn write(&mut self, page: usize, offset: usize, value: Cell) -> Result<()> {
        check_bounds(page, offset, self.pages.len(), self.page_size)?;

        self.pages[page][offset] = value;

        Ok(())
    }
}
