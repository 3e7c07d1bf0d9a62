//! SwapFileStore - a `BackingStore` that keeps every page in a file.
//!
//! The file is a fixed header followed by the pages laid out densely, in
//! page order, one little-endian `i32` per cell:
//!
//! | description        | size                            |
//! |--------------------|---------------------------------|
//! | number of pages    | 8 bytes                         |
//! | cells per page     | 8 bytes                         |
//! | page 0             | page_size * 4 bytes             |
//! | ...                | ...                             |
//! | page N-1           | page_size * 4 bytes             |
//!
//! Opening an existing file checks the header against the expected geometry.

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};

use log::debug;
use vm::{
    backing_store::{check_bounds, BackingStore},
    Cell, Result, VmError,
};

const HEADER_LEN: u64 = 16;
const CELL_LEN: u64 = std::mem::size_of::<Cell>() as u64;

#[derive(Debug)]
pub struct SwapFileStore {
    file: File,
    num_pages: usize,
    page_size: usize,
}

impl SwapFileStore {
    fn encode_header(num_pages: usize, page_size: usize) -> [u8; HEADER_LEN as usize] {
        let mut header = [0u8; HEADER_LEN as usize];
        header[..8].copy_from_slice(&(num_pages as u64).to_le_bytes());
        header[8..].copy_from_slice(&(page_size as u64).to_le_bytes());
        header
    }

    /// Creates (or truncates) `path` as an all-zero store.
    pub fn create<P: AsRef<Path>>(path: P, num_pages: usize, page_size: usize) -> Result<Self> {
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let header = Self::encode_header(num_pages, page_size);
        debug!("swap_file: writing header {}", hex::encode(header));

        file.write_all(&header)?;
        file.set_len(HEADER_LEN + (num_pages * page_size) as u64 * CELL_LEN)?;

        Ok(SwapFileStore {
            file,
            num_pages,
            page_size,
        })
    }

    /// Opens an existing store, which must have been created with the same
    /// geometry.
    pub fn open<P: AsRef<Path>>(path: P, num_pages: usize, page_size: usize) -> Result<Self> {
        let mut file = File::options().read(true).write(true).open(path)?;

        let mut header = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut header)?;
        debug!("swap_file: read header {}", hex::encode(header));

        if header != Self::encode_header(num_pages, page_size) {
            return Err(VmError::InvalidConfig(
                "swap file geometry does not match the configuration",
            ));
        }

        let expected_len = HEADER_LEN + (num_pages * page_size) as u64 * CELL_LEN;
        if file.metadata()?.len() < expected_len {
            return Err(VmError::InvalidConfig("swap file is truncated"));
        }

        Ok(SwapFileStore {
            file,
            num_pages,
            page_size,
        })
    }

    /// Opens `path` if it exists, creates it otherwise.
    pub fn open_or_create<P: AsRef<Path>>(path: P, num_pages: usize, page_size: usize) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path, num_pages, page_size)
        } else {
            Self::create(path, num_pages, page_size)
        }
    }

    fn seek_to(&mut self, page: usize, offset: usize) -> Result<()> {
        let cell = (page * self.page_size + offset) as u64;
        self.file.seek(SeekFrom::Start(HEADER_LEN + cell * CELL_LEN))?;
        Ok(())
    }

    fn check_page_buffer(&self, page: usize, len: usize) -> Result<()> {
        if len != self.page_size {
            return Err(VmError::OffsetOutOfRange {
                offset: len.max(1) - 1,
                len: self.page_size,
            });
        }
        check_bounds(page, 0, self.num_pages, self.page_size)
    }
}

impl BackingStore for SwapFileStore {
    fn num_pages(&self) -> usize {
        self.num_pages
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn read(&mut self, page: usize, offset: usize) -> Result<Cell> {
        check_bounds(page, offset, self.num_pages, self.page_size)?;
        self.seek_to(page, offset)?;

        let mut buf = [0u8; CELL_LEN as usize];
        self.file.read_exact(&mut buf)?;

        Ok(Cell::from_le_bytes(buf))
    }

    fn write(&mut self, page: usize, offset: usize, value: Cell) -> Result<()> {
        check_bounds(page, offset, self.num_pages, self.page_size)?;
        self.seek_to(page, offset)?;

        self.file.write_all(&value.to_le_bytes())?;

        Ok(())
    }

    // Whole pages move in one read/write instead of one per cell.
    fn load_page_into(&mut self, page: usize, target: &mut [Cell]) -> Result<()> {
        self.check_page_buffer(page, target.len())?;
        self.seek_to(page, 0)?;

        let mut buf = vec![0u8; target.len() * CELL_LEN as usize];
        self.file.read_exact(&mut buf)?;

        for (cell, chunk) in target.iter_mut().zip(buf.chunks_exact(CELL_LEN as usize)) {
            let mut bytes = [0u8; CELL_LEN as usize];
            bytes.copy_from_slice(chunk);
            *cell = Cell::from_le_bytes(bytes);
        }

        Ok(())
    }

    fn flush_page(&mut self, page: usize, buffer: &[Cell]) -> Result<()> {
        self.check_page_buffer(page, buffer.len())?;
        self.seek_to(page, 0)?;

        let bytes: Vec<u8> = buffer.iter().flat_map(|cell| cell.to_le_bytes()).collect();
        self.file.write_all(&bytes)?;

        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }
}
