//! The MMU: address translation, fault handling and the actual cell access.

use std::fmt;

use log::{debug, error, trace};

use crate::{
    backing_store::{BackingStore, MemoryBackingStore},
    config::MmuConfig,
    error::{Result, VmError},
    frame_table::FrameTable,
    page_replacer::ReplacementPolicy,
    page_table::PageTable,
    recorder::{AccessKind, AccessRecord, AccessRecorder, NullRecorder},
    stats::SimulationStats,
    Cell,
};

/// Returned by [`Mmu::read_memory`] when the read could not be served.
pub const INVALID_READ: Cell = -9999;

/// An address split into page number and offset within the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub address: usize,
    pub page: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// `page = address / page_size`, `offset = address % page_size`.
    pub fn split(address: usize, page_size: usize) -> Self {
        VirtualAddress {
            address,
            page: address / page_size,
            offset: address % page_size,
        }
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA({:#06X}) = (page={}, offset={})", self.address, self.page, self.offset)
    }
}

/// Logs defects at `error!` before they propagate.
fn report<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if err.is_defect() {
            error!("mmu: internal invariant violated: {}", err);
        }
    }

    result
}

/// Demand-paged address translator over a frame pool and a backing store.
///
/// Owns the page table, frame table, store, recorder and statistics for its
/// whole lifetime. Every access runs translate, fault handling and the cell
/// access to completion before returning.
pub struct Mmu<S: BackingStore = MemoryBackingStore, R: AccessRecorder = NullRecorder> {
    config: MmuConfig,
    page_table: PageTable,
    store: S,
    frame_table: FrameTable,
    recorder: R,
    stats: SimulationStats,
}

impl Mmu {
    /// In-memory store, no access recording.
    pub fn new(config: MmuConfig) -> Result<Self> {
        Mmu::with_recorder(config, NullRecorder)
    }
}

impl<R: AccessRecorder> Mmu<MemoryBackingStore, R> {
    pub fn with_recorder(config: MmuConfig, recorder: R) -> Result<Self> {
        config.validate()?;

        let store = MemoryBackingStore::new(config.num_pages, config.page_size);

        Mmu::with_parts(config, store, recorder)
    }
}

impl<S, R> Mmu<S, R>
where
    S: BackingStore,
    R: AccessRecorder,
{
    /// Builds an MMU over an existing store. The store geometry has to match
    /// the configuration.
    pub fn with_parts(config: MmuConfig, store: S, recorder: R) -> Result<Self> {
        config.validate()?;

        if store.num_pages() != config.num_pages || store.page_size() != config.page_size {
            return Err(VmError::InvalidConfig(
                "backing store geometry does not match the configuration",
            ));
        }

        let page_table = PageTable::new(config.num_pages);
        let frame_table = FrameTable::new(config.num_frames, config.page_size);

        debug!(
            "mmu: {} pages x {} cells over {} frames, policy {}",
            config.num_pages, config.page_size, config.num_frames, config.policy
        );

        Ok(Mmu {
            config,
            page_table,
            store,
            frame_table,
            recorder,
            stats: SimulationStats::new(),
        })
    }

    /// Splits `address`, failing if it lies outside the address space.
    pub fn translate(&self, address: usize) -> Result<VirtualAddress> {
        let va = VirtualAddress::split(address, self.config.page_size);

        if va.page >= self.config.num_pages {
            return Err(VmError::AddressOutOfRange {
                address,
                limit: self.config.address_space_len(),
            });
        }

        Ok(va)
    }

    fn handle_page_fault(&mut self, page_number: usize) -> Result<usize> {
        let policy = self.config.policy;
        let victim_frame = self.frame_table.select_victim(policy);
        let victim_page = self.page_table.reverse_lookup(victim_frame);

        match victim_page {
            Some(victim) => debug!(
                "mmu: page fault on page {}, evicting page {} from frame {} ({})",
                page_number, victim, victim_frame, policy
            ),
            None => debug!(
                "mmu: page fault on page {}, frame {} is free",
                page_number, victim_frame
            ),
        }

        self.frame_table.swap(
            policy,
            page_number,
            victim_page,
            victim_frame,
            &mut self.page_table,
            &mut self.store,
        )?;

        self.stats.record_fault(page_number);

        Ok(victim_frame)
    }

    /// Makes `page_number` resident; returns its frame and whether it faulted.
    fn ensure_resident(&mut self, page_number: usize) -> Result<(usize, bool)> {
        if let Some(frame_index) = self.page_table.lookup(page_number) {
            trace!("mmu: page hit, page {} in frame {}", page_number, frame_index);
            return Ok((frame_index, false));
        }

        let victim_frame = self.handle_page_fault(page_number)?;

        let frame_index = self
            .page_table
            .lookup(page_number)
            .ok_or(VmError::FrameOutOfRange {
                frame: victim_frame,
                num_frames: self.frame_table.len(),
            })?;

        Ok((frame_index, true))
    }

    fn access(&mut self, kind: AccessKind, address: usize, value: Cell) -> Result<Cell> {
        let va = self.translate(address)?;

        trace!("mmu: {:?} {}", kind, va);

        let (frame, faulted) = self.ensure_resident(va.page)?;

        let value = match kind {
            AccessKind::Write => {
                self.frame_table.access_write(frame, va.offset, value)?;
                value
            }
            AccessKind::Read => self.frame_table.access_read(frame, va.offset)?,
        };

        self.recorder.record(&AccessRecord {
            kind,
            address,
            page: va.page,
            offset: va.offset,
            frame,
            value,
            faulted,
        });

        Ok(value)
    }

    pub fn write(&mut self, address: usize, value: Cell) -> Result<()> {
        report(self.access(AccessKind::Write, address, value)).map(|_| ())
    }

    pub fn read(&mut self, address: usize) -> Result<Cell> {
        report(self.access(AccessKind::Read, address, 0))
    }

    /// Like [`write`](Self::write), reporting failure as `false`.
    pub fn write_memory(&mut self, address: usize, value: Cell) -> bool {
        match self.write(address, value) {
            Ok(()) => true,
            Err(err) => {
                debug!("mmu: write to {:#06X} failed: {}", address, err);
                false
            }
        }
    }

    /// Like [`read`](Self::read), but never fails: returns [`INVALID_READ`]
    /// when the read cannot be served.
    pub fn read_memory(&mut self, address: usize) -> Cell {
        match self.read(address) {
            Ok(value) => value,
            Err(err) => {
                debug!("mmu: read from {:#06X} failed: {}", address, err);
                INVALID_READ
            }
        }
    }

    /// Writes every dirty frame back so the store reflects all writes.
    pub fn flush(&mut self) -> Result<usize> {
        report(self.frame_table.flush_dirty(&self.page_table, &mut self.store))
    }

    pub fn fault_count(&self) -> usize {
        self.stats.fault_count()
    }

    pub fn fault_order(&self) -> &[usize] {
        self.stats.fault_order()
    }

    pub fn reference_string(&self) -> String {
        self.stats.reference_string()
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn config(&self) -> &MmuConfig {
        &self.config
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.config.policy
    }

    /// `(page, frame)` pairs currently resident, in page order.
    pub fn resident_pages(&self) -> Vec<(usize, usize)> {
        self.page_table.resident().collect()
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frame_table(&self) -> &FrameTable {
        &self.frame_table
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut R {
        &mut self.recorder
    }

    /// Takes the MMU apart, without flushing dirty frames.
    pub fn into_parts(self) -> (S, R, SimulationStats) {
        (self.store, self.recorder, self.stats)
    }
}
