use logreplay_core::conf::ReplayConfig;
use logreplay_core::sim::{Counters, Simulation};
use logreplay_core::source::{LogSource, SeekableLog};
use logreplay_core::ReplayError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DT: f64 = 1.0 / 60.0;

/// An access log written to a temporary directory.
pub struct LogFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl LogFixture {
    pub fn new(lines: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("access.log");

        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(&path, body).expect("failed to write log fixture");

        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> LogSource {
        SeekableLog::open(&self.path)
            .expect("failed to open log fixture")
            .into()
    }

    pub fn simulation(&self, config: &ReplayConfig) -> Result<Simulation, ReplayError> {
        Simulation::new(config, self.source())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub spawned: usize,
    pub retired: usize,
    pub max_paddles: usize,
    pub seconds: f64,
    pub counters: Counters,
}

/// Tick at 60Hz until the simulation finishes or `max_seconds` of real time
/// have been simulated.
pub fn run_to_completion(
    sim: &mut Simulation,
    max_seconds: f64,
) -> Result<RunReport, ReplayError> {
    let mut report = RunReport::default();

    while report.seconds < max_seconds {
        let outcome = sim.tick(DT)?;
        report.seconds += DT;

        report.spawned += outcome.spawned.len();
        report.retired += outcome.retired;
        report.max_paddles = report.max_paddles.max(sim.paddles().len());

        if outcome.finished {
            break;
        }
    }

    report.counters = sim.counters();
    Ok(report)
}
