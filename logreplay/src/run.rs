use crate::cli::Cli;
use crate::render::{redraw, render_dashboard};
use anyhow::{Context, Result};
use logreplay_core::conf::ReplayConfig;
use logreplay_core::sim::Simulation;
use logreplay_core::source::{LogSource, SeekableLog, StreamLog};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

pub fn run_replay(cli: &Cli, config: &ReplayConfig) -> Result<()> {
    let source = if cli.is_stdin() {
        LogSource::from(StreamLog::stdin())
    } else {
        LogSource::from(SeekableLog::open(&cli.file)?)
    };

    let mut sim = Simulation::new(config, source).context("failed to start replay")?;

    let fps = cli.fps.max(1);
    let dt = 1.0 / fps as f64;
    let frame = Duration::from_secs_f64(dt);

    // Streams are always paced: running ahead of the producer only idles.
    let paced = cli.realtime || cli.is_stdin();
    let dashboard = !cli.json;

    if dashboard {
        // Hide cursor while the dashboard runs.
        print!("\x1b[?25l");
        let _ = io::stdout().flush();
    }

    let mut last_second = None;

    let result = loop {
        let started = Instant::now();

        let outcome = match sim.tick(dt) {
            Ok(outcome) => outcome,
            Err(e) => break Err(anyhow::Error::from(e)),
        };

        // Redraw once per simulated second.
        let second = sim.playback().current_time();
        if last_second != Some(second) {
            last_second = Some(second);
            if let Err(e) = emit(&sim, dashboard) {
                break Err(e);
            }
        }

        if outcome.finished {
            break Ok(());
        }

        if sim.playback().is_stream_closed() && sim.balls().is_empty() {
            tracing::info!("input closed");
            break Ok(());
        }

        if paced {
            thread::sleep(frame.saturating_sub(started.elapsed()));
        }
    };

    if dashboard {
        let _ = emit(&sim, dashboard);
        // Restore cursor
        print!("\x1b[?25h");
        let _ = io::stdout().flush();
    }

    let counters = sim.counters();
    tracing::info!(
        requests = counters.highscore,
        paddles = counters.paddles_created,
        entries = sim.playback().total_entries(),
        "replay complete"
    );

    result
}

fn emit(sim: &Simulation, dashboard: bool) -> Result<()> {
    let snapshot = sim.snapshot();

    if dashboard {
        redraw(&render_dashboard(&snapshot));
    } else {
        let line = serde_json::to_string(&snapshot).context("failed to serialize snapshot")?;
        println!("{line}");
    }

    Ok(())
}
