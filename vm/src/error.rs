//! Error kinds surfaced by the MMU and its components.

use thiserror::Error;

use crate::Cell;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VmError>;

#[derive(Error, Debug)]
pub enum VmError {
    /// The virtual address lies past the end of the address space.
    #[error("address {address:#06X} out of range (address space has {limit} cells)")]
    AddressOutOfRange { address: usize, limit: usize },

    /// A page number outside `[0, num_pages)` reached a store or table.
    #[error("page {page} out of range (store has {num_pages} pages)")]
    PageOutOfRange { page: usize, num_pages: usize },

    /// An offset outside `[0, len)` reached a page or frame accessor.
    #[error("offset {offset} out of range (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// A frame index produced by the translator itself is invalid.
    #[error("frame {frame} out of range ({num_frames} frames)")]
    FrameOutOfRange { frame: usize, num_frames: usize },

    #[error("unsupported replacement policy: {0}")]
    UnsupportedPolicy(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("address {address:#06X} holds {found}, expected {expected}")]
    ValueMismatch {
        address: usize,
        expected: Cell,
        found: Cell,
    },

    #[error("backing store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VmError {
    /// True for errors that can only come from a bug in the MMU itself,
    /// never from caller input. Continuing after one of these would corrupt
    /// the page table / frame state.
    pub fn is_defect(&self) -> bool {
        matches!(self, VmError::FrameOutOfRange { .. } | VmError::UnsupportedPolicy(_))
    }

    /// True for the caller-facing "address out of range" family.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            VmError::AddressOutOfRange { .. }
                | VmError::PageOutOfRange { .. }
                | VmError::OffsetOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_defects() {
        assert!(VmError::FrameOutOfRange { frame: 9, num_frames: 4 }.is_defect());
        assert!(VmError::UnsupportedPolicy("clock".into()).is_defect());
        assert!(!VmError::PageOutOfRange { page: 20, num_pages: 16 }.is_defect());
    }

    #[test]
    fn classifies_out_of_range() {
        assert!(VmError::AddressOutOfRange { address: 1, limit: 0 }.is_out_of_range());
        assert!(VmError::OffsetOutOfRange { offset: 4, len: 4 }.is_out_of_range());
        assert!(!VmError::InvalidConfig("x").is_out_of_range());
    }

    #[test]
    fn renders_addresses_in_hex() {
        let err = VmError::AddressOutOfRange { address: 0xCAFE, limit: 16 };
        assert_eq!(
            err.to_string(),
            "address 0xCAFE out of range (address space has 16 cells)"
        );
    }
}
