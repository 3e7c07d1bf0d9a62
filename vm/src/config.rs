//! Geometry and policy of a simulated address space.

use crate::{
    error::{Result, VmError},
    page_replacer::ReplacementPolicy,
};

/// Construction-time configuration of an [`Mmu`](crate::mmu::Mmu).
///
/// Immutable once the MMU is built. `page_size` is the only source of truth
/// for the page/offset split of every address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MmuConfig {
    pub num_pages: usize,
    pub num_frames: usize,
    pub page_size: usize,
    pub policy: ReplacementPolicy,
}

impl MmuConfig {
    pub fn new(num_pages: usize, num_frames: usize, page_size: usize, policy: ReplacementPolicy) -> Self {
        MmuConfig {
            num_pages,
            num_frames,
            page_size,
            policy,
        }
    }

    pub fn with_policy(self, policy: ReplacementPolicy) -> Self {
        MmuConfig { policy, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_pages == 0 {
            return Err(VmError::InvalidConfig("num_pages must be at least 1"));
        }
        if self.num_frames == 0 {
            return Err(VmError::InvalidConfig("num_frames must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(VmError::InvalidConfig("page_size must be at least 1"));
        }
        if self.num_pages.checked_mul(self.page_size).is_none() {
            return Err(VmError::InvalidConfig("address space does not fit in usize"));
        }

        Ok(())
    }

    /// Number of addressable cells, `num_pages * page_size`.
    pub fn address_space_len(&self) -> usize {
        self.num_pages * self.page_size
    }
}

impl Default for MmuConfig {
    /// 16 pages of 1024 cells over 4 frames, LRU.
    fn default() -> Self {
        MmuConfig::new(16, 4, 1024, ReplacementPolicy::Lru)
    }
}
