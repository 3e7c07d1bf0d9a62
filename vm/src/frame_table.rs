//! Pool of physical frames, victim selection and the evict-then-load swap.

use std::fmt;

use log::debug;

use crate::{
    backing_store::BackingStore,
    error::{Result, VmError},
    frame::Frame,
    page_replacer::ReplacementPolicy,
    page_table::PageTable,
    Cell,
};

pub struct FrameTable {
    frames: Vec<Frame>,
    /// Next FIFO victim; always in `[0, frames.len())`.
    fifo_cursor: usize,
    /// Logical clock behind every frame timestamp.
    clock: u64,
}

impl FrameTable {
    pub fn new(num_frames: usize, frame_size: usize) -> Self {
        FrameTable {
            frames: (0..num_frames).map(|_| Frame::new(frame_size)).collect(),
            fifo_cursor: 0,
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, frame_index: usize) -> Option<&Frame> {
        self.frames.get(frame_index)
    }

    pub fn fifo_cursor(&self) -> usize {
        self.fifo_cursor
    }

    fn frame_mut(&mut self, frame_index: usize) -> Result<&mut Frame> {
        let num_frames = self.frames.len();

        self.frames.get_mut(frame_index).ok_or(VmError::FrameOutOfRange {
            frame: frame_index,
            num_frames,
        })
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Picks the frame to evict next. Does not change any state.
    ///
    /// FIFO returns the ring cursor; LRU returns the frame with the strictly
    /// smallest timestamp, lowest index on ties.
    pub fn select_victim(&self, policy: ReplacementPolicy) -> usize {
        match policy {
            ReplacementPolicy::Fifo => self.fifo_cursor,
            ReplacementPolicy::Lru => {
                let mut victim = 0;

                for (idx, frame) in self.frames.iter().enumerate().skip(1) {
                    if frame.timestamp() < self.frames[victim].timestamp() {
                        victim = idx;
                    }
                }

                victim
            }
        }
    }

    /// Replaces whatever `frame_index` holds with `new_page`.
    ///
    /// A dirty frame is written back to `victim_page` first (skipped when the
    /// frame was never bound). The victim is invalidated before `new_page` is
    /// bound, so no frame ever backs two valid entries. Under FIFO the ring
    /// cursor advances once the swap commits.
    pub fn swap<S: BackingStore + ?Sized>(
        &mut self,
        policy: ReplacementPolicy,
        new_page: usize,
        victim_page: Option<usize>,
        frame_index: usize,
        page_table: &mut PageTable,
        store: &mut S,
    ) -> Result<()> {
        let num_frames = self.frames.len();
        let frame = self.frame_mut(frame_index)?;

        if let Some(victim_page) = victim_page {
            if frame.is_dirty() {
                debug!("frame_table: frame {} dirty, writing page {} back", frame_index, victim_page);

                store.flush_page(victim_page, frame.cells())?;
                frame.clear_dirty();
            }
        }

        debug!("frame_table: loading page {} into frame {}", new_page, frame_index);

        if let Err(err) = store.load_page_into(new_page, frame.cells_mut()) {
            // The frame no longer holds the victim's content.
            if let Some(victim_page) = victim_page {
                page_table.invalidate(victim_page);
            }
            return Err(err);
        }
        frame.clear_dirty();

        if let Some(victim_page) = victim_page {
            page_table.invalidate(victim_page);
        }
        page_table.bind(new_page, frame_index);

        if policy == ReplacementPolicy::Fifo {
            self.fifo_cursor = (frame_index + 1) % num_frames;
        }

        Ok(())
    }

    pub fn access_write(&mut self, frame_index: usize, offset: usize, value: Cell) -> Result<()> {
        let now = self.tick();
        let frame = self.frame_mut(frame_index)?;

        frame.write(offset, value)?;
        frame.mark_dirty();
        frame.touch(now);

        Ok(())
    }

    pub fn access_read(&mut self, frame_index: usize, offset: usize) -> Result<Cell> {
        let now = self.tick();
        let frame = self.frame_mut(frame_index)?;

        let value = frame.read(offset)?;
        frame.touch(now);

        Ok(value)
    }

    /// Writes every dirty, bound frame back to the store and marks it clean.
    /// Returns how many frames were written.
    pub fn flush_dirty<S: BackingStore + ?Sized>(&mut self, page_table: &PageTable, store: &mut S) -> Result<usize> {
        let mut flushed = 0;

        for (frame_index, frame) in self.frames.iter_mut().enumerate() {
            if !frame.is_dirty() {
                continue;
            }

            if let Some(page) = page_table.reverse_lookup(frame_index) {
                debug!("frame_table: flushing frame {} to page {}", frame_index, page);

                store.flush_page(page, frame.cells())?;
                frame.clear_dirty();
                flushed += 1;
            }
        }

        store.sync()?;

        Ok(flushed)
    }
}

impl fmt::Display for FrameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} frames, fifo cursor at {}", self.frames.len(), self.fifo_cursor)?;

        for (idx, frame) in self.frames.iter().enumerate() {
            write!(f, "frame {} {}", idx, frame)?;
        }

        Ok(())
    }
}
