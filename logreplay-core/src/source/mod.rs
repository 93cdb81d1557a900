//! Raw line sources.
//!
//! A replay reads from exactly one of two kinds of input:
//!
//! - **Seekable**: a finite log file. Supports jumping to a fraction of the
//!   file and reports the read position as a fraction for progress display.
//! - **Streaming**: an unbounded feed (usually stdin) filled by a background
//!   reader thread. Reads never block; an empty buffer just means "nothing
//!   yet".

mod seekable;
mod stream;


pub use seekable::SeekableLog;
pub use stream::StreamLog;

pub enum LogSource {
    Seekable(SeekableLog),
    Streaming(StreamLog),
}

impl LogSource {
    /// Next raw line with trailing whitespace removed, or `None` when no data
    /// is available right now.
    pub fn next_line(&mut self) -> Option<String> {
        match self {
            LogSource::Seekable(log) => log.next_line(),
            LogSource::Streaming(log) => log.next_line(),
        }
    }

    /// Current read position, for finite sources only.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            LogSource::Seekable(log) => Some(log.fraction()),
            LogSource::Streaming(_) => None,
        }
    }

    pub fn is_seekable(&self) -> bool {
        matches!(self, LogSource::Seekable(_))
    }

    /// A finite source that has been read to the end. Streams are never
    /// exhausted.
    pub fn is_exhausted(&self) -> bool {
        match self {
            LogSource::Seekable(log) => log.is_eof(),
            LogSource::Streaming(_) => false,
        }
    }
}

impl From<SeekableLog> for LogSource {
    fn from(log: SeekableLog) -> Self {
        LogSource::Seekable(log)
    }
}

impl From<StreamLog> for LogSource {
    fn from(log: StreamLog) -> Self {
        LogSource::Streaming(log)
    }
}

pub(crate) fn trim_line(mut line: String) -> String {
    let end = line.trim_end().len();
    line.truncate(end);
    line
}
