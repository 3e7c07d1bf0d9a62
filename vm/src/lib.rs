//! Demand-paged virtual memory simulator.
//!
//! A fixed virtual address space lives in a [`BackingStore`]; pages are
//! mapped on demand into a small pool of frames, evicted by LRU or FIFO, and
//! written back when dirty. [`Mmu`] is the entry point.

pub mod backing_store;
pub mod config;
pub mod error;
pub mod frame;
pub mod frame_table;
pub mod mmu;
pub mod page_replacer;
pub mod page_table;
pub mod recorder;
pub mod simulation;
pub mod stats;

/// Contents of one memory cell.
pub type Cell = i32;

pub use backing_store::{BackingStore, MemoryBackingStore};
pub use config::MmuConfig;
pub use error::{Result, VmError};
pub use mmu::{Mmu, VirtualAddress, INVALID_READ};
pub use page_replacer::ReplacementPolicy;
pub use recorder::{AccessKind, AccessRecord, AccessRecorder, NullRecorder};
pub use simulation::{Simulation, SimulationReport};
pub use stats::SimulationStats;
