use crate::source::trim_line;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

/// An unbounded line feed.
///
/// A reader thread pushes lines into a channel as they arrive; the replay
/// drains it with `try_recv` so a tick never waits on I/O.
pub struct StreamLog {
    rx: Receiver<String>,
    closed: bool,
    _reader: JoinHandle<()>,
}

impl StreamLog {
    pub fn stdin() -> Self {
        Self::from_reader(io::stdin())
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        // Channel from reader thread -> replay loop.
        let (tx, rx) = mpsc::channel::<String>();

        let handle = thread::spawn(move || {
            let reader = BufReader::new(reader);

            for line in reader.split(b'\n') {
                let line = match line {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => {
                        tracing::warn!(error = %e, "log stream read failed");
                        break;
                    }
                };

                // If receiver is gone, stop early.
                if tx.send(line).is_err() {
                    break;
                }
            }
            // tx is dropped here, which will disconnect rx.
        });

        Self {
            rx,
            closed: false,
            _reader: handle,
        }
    }

    pub fn next_line(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(trim_line(line)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    tracing::info!("log stream closed");
                }
                self.closed = true;
                None
            }
        }
    }

    /// Discard everything buffered but not yet read. Returns the number of
    /// lines dropped.
    pub fn drain_backlog(&mut self) -> usize {
        let mut dropped = 0;
        while self.next_line().is_some() {
            dropped += 1;
        }
        dropped
    }

    /// The feeder reached end of input and every line has been consumed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
