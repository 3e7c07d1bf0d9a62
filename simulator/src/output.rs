//! Reporting sink that writes one line per memory access to a text file.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use log::warn;
use vm::{AccessKind, AccessRecord, AccessRecorder};

pub struct FileRecorder<W: Write = BufWriter<File>> {
    writer: W,
    reads_only: bool,
    lines: usize,
    error: Option<io::Error>,
}

impl FileRecorder {
    pub fn create<P: AsRef<Path>>(path: P, reads_only: bool) -> io::Result<Self> {
        Ok(FileRecorder::new(BufWriter::new(File::create(path)?), reads_only))
    }
}

impl<W: Write> FileRecorder<W> {
    pub fn new(writer: W, reads_only: bool) -> Self {
        FileRecorder {
            writer,
            reads_only,
            lines: 0,
            error: None,
        }
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flushes the writer, surfacing the first write error seen, if any.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        self.writer.flush()?;

        Ok(self.writer)
    }
}

impl<W: Write> AccessRecorder for FileRecorder<W> {
    fn record(&mut self, access: &AccessRecord) {
        if self.error.is_some() || (self.reads_only && access.kind != AccessKind::Read) {
            return;
        }

        match writeln!(self.writer, "{}", access) {
            Ok(()) => self.lines += 1,
            Err(err) => {
                warn!("output: dropping access log after write error: {}", err);
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(kind: AccessKind, address: usize) -> AccessRecord {
        AccessRecord {
            kind,
            address,
            page: 0,
            offset: address,
            frame: 0,
            value: address as i32,
            faulted: false,
        }
    }

    #[test]
    fn writes_one_line_per_access() {
        let mut recorder = FileRecorder::new(Vec::<u8>::new(), false);
        recorder.record(&access(AccessKind::Write, 1));
        recorder.record(&access(AccessKind::Read, 1));
        assert_eq!(recorder.lines(), 2);

        let text = String::from_utf8(recorder.finish().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("Value at address 1: 1"));
    }

    #[test]
    fn reads_only_skips_writes() {
        let mut recorder = FileRecorder::new(Vec::<u8>::new(), true);
        recorder.record(&access(AccessKind::Write, 1));
        recorder.record(&access(AccessKind::Read, 2));

        let text = String::from_utf8(recorder.finish().unwrap()).unwrap();
        assert_eq!(text, "Value at address 2: 2 (page 0, offset 2, frame 0)\n");
    }
}
