//! Turning raw lines into [`LogEntry`] records.
//!
//! Several [`LogFormat`] strategies are tried in priority order on the first
//! line that any of them accepts. The winner is locked in for the rest of the
//! session; from then on a line the locked format rejects is just a bad line,
//! it never triggers detection again.

mod entry;
mod format;
pub mod formats;

#[cfg(test)]
mod tests;

pub use entry::LogEntry;
pub use format::LogFormat;

use crate::error::ParseError;
use formats::{CombinedLogFormat, CustomLogFormat};

pub struct EntryParser {
    formats: Vec<Box<dyn LogFormat>>,
    locked: Option<usize>,
}

impl Default for EntryParser {
    fn default() -> Self {
        Self::with_formats(vec![
            Box::new(CombinedLogFormat),
            Box::new(CustomLogFormat),
        ])
    }
}

impl EntryParser {
    pub fn with_formats(formats: Vec<Box<dyn LogFormat>>) -> Self {
        Self {
            formats,
            locked: None,
        }
    }

    pub fn parse(&mut self, line: &str) -> Result<LogEntry, ParseError> {
        if let Some(idx) = self.locked {
            return self.formats[idx].parse_line(line);
        }

        for (idx, format) in self.formats.iter().enumerate() {
            if let Ok(entry) = format.parse_line(line) {
                tracing::info!(format = format.name(), "detected log format");
                self.locked = Some(idx);
                return Ok(entry);
            }
        }

        Err(ParseError::Unrecognised)
    }

    /// Parse with the locked format without affecting detection.
    pub fn peek(&self, line: &str) -> Option<LogEntry> {
        let idx = self.locked?;
        self.formats[idx].parse_line(line).ok()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    pub fn format_name(&self) -> Option<&'static str> {
        self.locked.map(|idx| self.formats[idx].name())
    }
}
