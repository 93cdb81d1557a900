mod playback_tests;
mod session_tests;

use crate::playback::{Playback, PlaybackOptions};
use crate::source::{LogSource, SeekableLog};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Custom-format line; fixed width for the same number of digits.
pub(super) fn line(ts: i64, i: usize) -> String {
    format!("{ts}|10.0.0.{i}|/p{i}|200|100")
}

pub(super) fn write_log(lines: &[String]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(&path, body).unwrap();
    (dir, path)
}

pub(super) fn playback(path: &PathBuf, options: PlaybackOptions) -> Playback {
    let source = LogSource::from(SeekableLog::open(path).unwrap());
    Playback::new(source, options)
}
