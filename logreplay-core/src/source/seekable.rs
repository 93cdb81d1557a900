use crate::error::ReplayError;
use crate::source::trim_line;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A finite log file read line by line, with fraction-based seeking.
pub struct SeekableLog {
    path: PathBuf,
    reader: BufReader<File>,
    size: u64,

    /// Byte offset of the next unread record.
    offset: u64,
    eof: bool,
}

impl SeekableLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReplayError::source_unavailable(path, e))?;
        let size = file
            .metadata()
            .map_err(|e| ReplayError::source_unavailable(path, e))?
            .len();

        tracing::debug!(path = %path.display(), size, "opened log file");

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            size,
            offset: 0,
            eof: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn next_line(&mut self) -> Option<String> {
        let mut buf = Vec::new();

        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.eof = true;
                None
            }
            Ok(n) => {
                self.offset += n as u64;
                Some(trim_line(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "log read failed");
                self.eof = true;
                None
            }
        }
    }

    /// Read position as a fraction of the file size.
    pub fn fraction(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        (self.offset as f64 / self.size as f64).min(1.0)
    }

    /// Move to the first record starting at or after `fraction` of the file.
    pub fn seek_to(&mut self, fraction: f64) -> io::Result<()> {
        let fraction = fraction.clamp(0.0, 1.0);
        let target = ((self.size as f64 * fraction).ceil() as u64).min(self.size);

        self.eof = false;

        if target == 0 {
            self.reader.seek(SeekFrom::Start(0))?;
            self.offset = 0;
            return Ok(());
        }

        // Land one byte early so a record starting exactly at `target` is kept.
        self.reader.seek(SeekFrom::Start(target - 1))?;
        self.offset = target - 1;

        let mut skipped = Vec::new();
        let n = self.reader.read_until(b'\n', &mut skipped)?;
        self.offset += n as u64;

        Ok(())
    }

    /// The record at `fraction`, without moving the read cursor.
    pub fn line_at(&mut self, fraction: f64) -> Option<String> {
        let saved_offset = self.offset;
        let saved_eof = self.eof;

        let line = match self.seek_to(fraction) {
            Ok(()) => self.next_line(),
            Err(e) => {
                tracing::debug!(error = %e, fraction, "peek seek failed");
                None
            }
        };

        if let Err(e) = self.reader.seek(SeekFrom::Start(saved_offset)) {
            tracing::warn!(error = %e, "failed to restore read position");
            self.eof = true;
            return line;
        }
        self.offset = saved_offset;
        self.eof = saved_eof;

        line
    }
}
