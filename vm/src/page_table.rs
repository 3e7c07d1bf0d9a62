use std::fmt;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct PageTableEntry {
    /// Frame the page was last bound to. Meaningful only while `valid`.
    pub frame_index: Option<usize>,
    pub valid: bool,
}

/// Maps logical pages to frames; the single source of truth for residency.
///
/// The table does not enforce "one valid page per frame" by itself: the
/// frame table invalidates the victim before binding the new page.
pub struct PageTable {
    table: Vec<PageTableEntry>,
}

impl PageTable {
    pub fn new(num_pages: usize) -> Self {
        PageTable {
            table: vec![PageTableEntry::default(); num_pages],
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn entry(&self, page_number: usize) -> Option<PageTableEntry> {
        self.table.get(page_number).copied()
    }

    /// Frame holding `page_number`, or `None` on a miss (including pages
    /// outside the table).
    pub fn lookup(&self, page_number: usize) -> Option<usize> {
        match self.table.get(page_number) {
            Some(PageTableEntry {
                frame_index: Some(frame_index),
                valid: true,
            }) => Some(*frame_index),
            _ => None,
        }
    }

    /// Page currently bound to `frame_index`, if any. Linear scan.
    pub fn reverse_lookup(&self, frame_index: usize) -> Option<usize> {
        self.table
            .iter()
            .position(|entry| entry.valid && entry.frame_index == Some(frame_index))
    }

    pub fn invalidate(&mut self, page_number: usize) {
        if let Some(entry) = self.table.get_mut(page_number) {
            entry.valid = false;
        }
    }

    pub fn bind(&mut self, page_number: usize, frame_index: usize) {
        if let Some(entry) = self.table.get_mut(page_number) {
            *entry = PageTableEntry {
                frame_index: Some(frame_index),
                valid: true,
            };
        }
    }

    /// Resident pages in page order, as `(page, frame)` pairs.
    pub fn resident(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.table
            .iter()
            .enumerate()
            .filter_map(|(page, _)| self.lookup(page).map(|frame| (page, frame)))
    }
}

impl fmt::Display for PageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (page, entry) in self.table.iter().enumerate() {
            match entry.frame_index {
                Some(frame) => writeln!(f, "page {} -> frame {} valid={}", page, frame, entry.valid)?,
                None => writeln!(f, "page {} -> none", page)?,
            }
        }

        Ok(())
    }
}
