//! Virtual-clock playback.
//!
//! [`Playback`] turns an ordered stream of log entries into a spawn schedule:
//!
//! source -> EntryParser -> pending buffer -> (clock reaches timestamp) -> Spawn
//!
//! The clock runs at `speed` simulated seconds per real second. Once per
//! simulated second the spawn interval is recomputed from how many buffered
//! entries are already due, so a second's worth of requests is spread across
//! that second instead of appearing in one burst.

mod session;

#[cfg(test)]
mod tests;

pub use session::*;

use crate::error::ReplayError;
use crate::parse::{EntryParser, LogEntry};
use crate::source::LogSource;
use std::collections::VecDeque;

/// Look-ahead for finite sources: strict in-order single steps.
pub const SEEKABLE_BUFFER_ROWS: usize = 1;

/// Look-ahead for streams, to absorb bursts.
pub const STREAM_BUFFER_ROWS: usize = 500;

/// Spawn interval (simulated seconds) when at most one entry is due.
pub const IDLE_SPAWN_INTERVAL: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub buffer_rows: Option<usize>,
    pub stop_position: f64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            buffer_rows: None,
            stop_position: 1.0,
        }
    }
}

/// An entry whose time has come.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawn {
    pub entry: LogEntry,

    /// Real seconds the spawn is late by; the entity starts this far along.
    pub head_start: f64,
}

pub struct Playback {
    source: LogSource,
    parser: EntryParser,

    pending: VecDeque<LogEntry>,
    buffer_rows: usize,
    stop_position: f64,

    start_time: Option<i64>,
    elapsed: f64,
    current_time: i64,
    last_time: Option<i64>,

    spawn_interval: f64,
    spawn_delay: f64,

    total_entries: u64,
    finished: bool,
}

impl Playback {
    pub fn new(source: LogSource, options: PlaybackOptions) -> Self {
        let default_rows = if source.is_seekable() {
            SEEKABLE_BUFFER_ROWS
        } else {
            STREAM_BUFFER_ROWS
        };

        Self {
            source,
            parser: EntryParser::default(),
            pending: VecDeque::new(),
            buffer_rows: options.buffer_rows.unwrap_or(default_rows).max(1),
            stop_position: options.stop_position,
            start_time: None,
            elapsed: 0.0,
            current_time: 0,
            last_time: None,
            spawn_interval: IDLE_SPAWN_INTERVAL,
            spawn_delay: 0.0,
            total_entries: 0,
            finished: false,
        }
    }

    pub fn with_parser(mut self, parser: EntryParser) -> Self {
        self.parser = parser;
        self
    }

    //-------------------------------------------------------------------------
    // Reading
    //-------------------------------------------------------------------------

    /// Pull up to `buffer_rows` lines from the source into the pending buffer.
    pub fn refill(&mut self) -> Result<(), ReplayError> {
        let mut rows = 0;

        while let Some(line) = self.source.next_line() {
            rows += 1;

            if !line.is_empty() {
                match self.parser.parse(&line) {
                    Ok(entry) => {
                        self.pending.push_back(entry);
                        self.total_entries += 1;
                    }
                    Err(e) if self.parser.is_locked() => {
                        tracing::warn!(error = %e, line = %line, "skipping unparsable line");
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "line matched no known format");
                    }
                }
            }

            if rows >= self.buffer_rows {
                break;
            }
        }

        if self.pending.is_empty() && self.source.is_exhausted() {
            if !self.parser.is_locked() {
                return Err(ReplayError::NoFormatDetected);
            }
            self.finish("end of log");
            return Ok(());
        }

        if let Some(fraction) = self.source.fraction()
            && self.stop_position < 1.0
            && fraction >= self.stop_position
        {
            self.finish("reached stop position");
            return Ok(());
        }

        if self.start_time.is_none()
            && let Some(front) = self.pending.front()
        {
            self.start_time = Some(front.timestamp);
            self.current_time = front.timestamp;
            self.elapsed = 0.0;
            self.last_time = None;
        }

        Ok(())
    }

    fn finish(&mut self, reason: &'static str) {
        if !self.finished {
            tracing::info!(reason, entries = self.total_entries, "playback finished");
        }
        self.finished = true;
        self.pending.clear();
    }

    //-------------------------------------------------------------------------
    // Clock
    //-------------------------------------------------------------------------

    /// Advance the clock by `dt` real seconds and release every entry whose
    /// spawn slot has passed, each back-dated by its own lateness.
    pub fn tick(
        &mut self,
        dt: f64,
        session: &mut SessionState,
    ) -> Result<Vec<Spawn>, ReplayError> {
        let mut spawns = Vec::new();

        if self.finished {
            return Ok(spawns);
        }

        let speed = session.speed;
        let sdt = dt * speed;

        self.elapsed += sdt;
        self.spawn_delay -= sdt;
        self.current_time = self.start_time.unwrap_or(0) + self.elapsed.floor() as i64;

        if session.fast_forward || session.resync {
            if let Some(front) = self.pending.front() {
                if front.timestamp > self.current_time {
                    self.elapsed = (front.timestamp - self.start_time.unwrap_or(0)) as f64;
                    self.current_time = front.timestamp;
                    tracing::debug!(time = self.current_time, "fast-forwarded to next entry");
                }
                session.resync = false;
            }
            session.fast_forward = false;
        }

        if self.last_time != Some(self.current_time) {
            self.recompute_spawn_rate(speed);
        }
        self.last_time = Some(self.current_time);

        loop {
            while self.spawn_delay <= 0.0
                && self
                    .pending
                    .front()
                    .is_some_and(|front| front.timestamp <= self.current_time)
                && let Some(entry) = self.pending.pop_front()
            {
                spawns.push(Spawn {
                    entry,
                    head_start: -self.spawn_delay / speed,
                });
                self.spawn_delay += self.spawn_interval;
            }

            if !self.pending.is_empty() {
                break;
            }

            let read = self.total_entries;
            self.refill()?;
            if self.finished || self.total_entries == read {
                break;
            }
        }

        Ok(spawns)
    }

    fn recompute_spawn_rate(&mut self, speed: f64) {
        let due = self
            .pending
            .iter()
            .take_while(|e| e.timestamp <= self.current_time)
            .count();

        self.spawn_interval = if due >= 2 {
            (1.0 / due as f64) / speed
        } else {
            IDLE_SPAWN_INTERVAL / speed
        };

        // slots are laid out from the start of the second, not from this tick
        self.spawn_delay = -self.elapsed.fract();

        tracing::trace!(due, interval = self.spawn_interval, "spawn rate");
    }

    fn reset_clock(&mut self) {
        self.start_time = None;
        self.elapsed = 0.0;
        self.current_time = 0;
        self.last_time = None;
        self.spawn_interval = IDLE_SPAWN_INTERVAL;
        self.spawn_delay = 0.0;
    }

    //-------------------------------------------------------------------------
    // Navigation
    //-------------------------------------------------------------------------

    /// Restart playback from `fraction` of a finite source. Returns false for
    /// streams, which cannot seek.
    pub fn seek_to(&mut self, fraction: f64) -> Result<bool, ReplayError> {
        let LogSource::Seekable(log) = &mut self.source else {
            return Ok(false);
        };

        if let Err(e) = log.seek_to(fraction) {
            tracing::warn!(error = %e, fraction, "seek failed");
        }
        tracing::info!(fraction, "seeking");

        self.pending.clear();
        self.finished = false;
        self.reset_clock();
        self.refill()?;

        Ok(true)
    }

    /// Drop the stream backlog and continue from whatever arrives next,
    /// timed against the wall clock.
    pub fn resync_to_live(&mut self) -> bool {
        let LogSource::Streaming(log) = &mut self.source else {
            return false;
        };

        let dropped = log.drain_backlog() + self.pending.len();
        self.pending.clear();
        self.reset_clock();
        self.start_time = Some(chrono::Utc::now().timestamp());
        self.current_time = self.start_time.unwrap_or(0);

        tracing::info!(dropped, "resynced to live stream");
        true
    }

    /// Timestamp of the record at `fraction`, without consuming anything.
    pub fn date_at(&mut self, fraction: f64) -> Option<i64> {
        if fraction >= 1.0 {
            return None;
        }

        let LogSource::Seekable(log) = &mut self.source else {
            return None;
        };

        let line = log.line_at(fraction)?;
        self.parser.peek(&line).map(|e| e.timestamp)
    }

    //-------------------------------------------------------------------------
    // Accessors
    //-------------------------------------------------------------------------

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_seekable(&self) -> bool {
        self.source.is_seekable()
    }

    /// A stream whose producer has gone away.
    pub fn is_stream_closed(&self) -> bool {
        matches!(&self.source, LogSource::Streaming(log) if log.is_closed())
    }

    pub fn fraction(&self) -> Option<f64> {
        self.source.fraction()
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    pub fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn spawn_interval(&self) -> f64 {
        self.spawn_interval
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    pub fn format_name(&self) -> Option<&'static str> {
        self.parser.format_name()
    }
}
