use super::{line, playback, write_log};
use crate::error::ReplayError;
use crate::playback::{Playback, PlaybackOptions, SessionState, Spawn};
use crate::source::{LogSource, StreamLog};
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// Tick at a fixed `dt`, recording the tick index of every spawn.
fn run(p: &mut Playback, session: &mut SessionState, dt: f64, ticks: usize) -> Vec<(usize, Spawn)> {
    let mut out = Vec::new();
    for i in 0..ticks {
        for spawn in p.tick(dt, session).unwrap() {
            out.push((i, spawn));
        }
    }
    out
}

fn timestamps(spawns: &[Spawn]) -> Vec<i64> {
    spawns.iter().map(|s| s.entry.timestamp).collect()
}

#[test]
fn entries_in_one_second_are_spread_across_it() {
    let lines: Vec<_> = (0..4).map(|i| line(100, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(
        &path,
        PlaybackOptions {
            buffer_rows: Some(4),
            ..Default::default()
        },
    );
    p.refill().unwrap();
    let mut session = SessionState::default();

    let spawns = run(&mut p, &mut session, 0.01, 99);

    assert_eq!(spawns.len(), 4);
    assert_eq!(p.current_time(), 100);
    assert_eq!(spawns[0].0, 0);

    for pair in spawns.windows(2) {
        let gap = pair[1].0 - pair[0].0;
        assert!((24..=27).contains(&gap), "gap was {gap} ticks");
    }
}

#[test]
fn burst_above_tick_rate_is_released_within_its_second() {
    let lines: Vec<_> = (0..120).map(|i| line(100, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(
        &path,
        PlaybackOptions {
            buffer_rows: Some(500),
            ..Default::default()
        },
    );
    p.refill().unwrap();
    let mut session = SessionState::default();
    let dt = 1.0 / 60.0;

    let mut per_tick = Vec::new();
    for _ in 0..120 {
        let spawns = p.tick(dt, &mut session).unwrap();
        for spawn in &spawns {
            assert!(spawn.head_start < dt + 1e-9, "late by {}", spawn.head_start);
        }
        per_tick.push(spawns.len());
        if p.current_time() != 100 {
            break;
        }
    }

    assert_eq!(per_tick.iter().sum::<usize>(), 120);
    assert_eq!(per_tick.len(), 60);
    assert_eq!(p.pending_len(), 0);
    assert!(per_tick.iter().all(|&n| n <= 3));
}

#[test]
fn one_row_buffer_spreads_a_second_at_the_idle_interval() {
    let mut lines: Vec<_> = (0..8).map(|i| line(100, i)).collect();
    lines.push(line(101, 8));
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());
    p.refill().unwrap();
    let mut session = SessionState::default();

    let spawns = run(&mut p, &mut session, 1.0 / 60.0, 120);

    let (same_second, later): (Vec<_>, Vec<_>) =
        spawns.iter().partition(|(_, s)| s.entry.timestamp == 100);
    assert_eq!(same_second.len(), 8);
    assert_eq!(later.len(), 1);

    // idle floor of 0.1s is six ticks at 60Hz
    assert!(same_second.iter().all(|(tick, _)| *tick < 59));
    for pair in same_second.windows(2) {
        let gap = pair[1].0 - pair[0].0;
        assert!((5..=7).contains(&gap), "gap was {gap} ticks");
    }
}

#[test]
fn spawn_interval_scales_with_speed() {
    let lines: Vec<_> = (0..4).map(|i| line(100, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(
        &path,
        PlaybackOptions {
            buffer_rows: Some(4),
            ..Default::default()
        },
    );
    p.refill().unwrap();
    let mut session = SessionState::new(2.0);

    p.tick(0.001, &mut session).unwrap();

    assert_eq!(p.spawn_interval(), 0.125);
}

#[test]
fn late_spawns_carry_a_head_start() {
    let lines: Vec<_> = (0..2).map(|i| line(100, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(
        &path,
        PlaybackOptions {
            buffer_rows: Some(4),
            ..Default::default()
        },
    );
    p.refill().unwrap();
    let mut session = SessionState::default();

    // two due entries -> slots at 0.0 and 0.5; ticks land at 0.3 and 0.6
    let spawns = run(&mut p, &mut session, 0.3, 3);

    assert_eq!(spawns.len(), 2);
    assert!((spawns[0].1.head_start - 0.3).abs() < 1e-9);
    assert!((spawns[1].1.head_start - 0.1).abs() < 1e-9);
}

#[test]
fn finite_log_finishes_without_repeating_entries() {
    let lines = vec![line(10, 1), line(10, 2), line(11, 3)];
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());
    p.refill().unwrap();
    let mut session = SessionState::default();

    let spawns = run(&mut p, &mut session, 1.0 / 60.0, 600);

    let hosts: Vec<_> = spawns.iter().map(|(_, s)| s.entry.hostname.clone()).collect();
    assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    assert!(p.is_finished());
    assert_eq!(p.total_entries(), 3);

    // finished is terminal
    assert!(p.tick(1.0, &mut session).unwrap().is_empty());
}

#[test]
fn unparsable_lines_are_skipped() {
    let lines = vec![
        line(10, 1),
        "garbage in the middle".to_string(),
        line(10, 2),
    ];
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());
    p.refill().unwrap();
    let mut session = SessionState::default();

    let spawns = run(&mut p, &mut session, 1.0 / 60.0, 600);

    assert_eq!(spawns.len(), 2);
    assert!(p.is_finished());
}

#[test]
fn log_without_any_known_format_is_fatal() {
    let lines = vec!["nothing".to_string(), "to see".to_string(), "here".to_string()];
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());

    let mut result = Ok(());
    for _ in 0..10 {
        result = p.refill();
        if result.is_err() {
            break;
        }
    }

    assert!(matches!(result, Err(ReplayError::NoFormatDetected)));
}

#[test]
fn fast_forward_jumps_to_next_entry() {
    let lines = vec![line(100, 1), line(200, 2)];
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());
    p.refill().unwrap();
    let mut session = SessionState::default();

    let first = p.tick(0.01, &mut session).unwrap();
    assert_eq!(timestamps(&first), vec![100]);

    // idle for a while: the next entry is 100 simulated seconds away
    assert!(run(&mut p, &mut session, 0.01, 20).is_empty());

    session.fast_forward = true;
    let next = p.tick(0.01, &mut session).unwrap();

    assert_eq!(timestamps(&next), vec![200]);
    assert_eq!(p.current_time(), 200);
    assert!(!session.fast_forward);
}

#[test]
fn stop_position_ends_playback_early() {
    let lines: Vec<_> = (0..10).map(|i| line(1000, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(
        &path,
        PlaybackOptions {
            stop_position: 0.5,
            ..Default::default()
        },
    );
    p.refill().unwrap();
    let mut session = SessionState::default();

    let spawns = run(&mut p, &mut session, 0.05, 200);

    assert_eq!(spawns.len(), 4);
    assert!(p.is_finished());
}

#[test]
fn seek_restarts_from_fraction() {
    let lines: Vec<_> = (0..10).map(|i| line(1000 + i as i64, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());
    p.refill().unwrap();
    let mut session = SessionState::default();
    run(&mut p, &mut session, 0.5, 4);

    assert!(p.seek_to(0.5).unwrap());

    assert_eq!(p.start_time(), Some(1005));
    assert!(p.fraction().unwrap() >= 0.5);

    let spawns = p.tick(0.01, &mut session).unwrap();
    assert_eq!(timestamps(&spawns), vec![1005]);
}

#[test]
fn date_at_previews_without_consuming() {
    let lines: Vec<_> = (0..10).map(|i| line(1000 + i as i64, i)).collect();
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default());
    p.refill().unwrap();

    assert_eq!(p.date_at(0.5), Some(1005));
    assert_eq!(p.date_at(1.0), None);

    let mut session = SessionState::default();
    let spawns = p.tick(0.01, &mut session).unwrap();
    assert_eq!(timestamps(&spawns), vec![1000]);
}

#[test]
fn empty_stream_idles_instead_of_finishing() {
    let source = LogSource::from(StreamLog::from_reader(Cursor::new("")));
    let mut p = Playback::new(source, PlaybackOptions::default());
    let mut session = SessionState::default();

    for _ in 0..50 {
        assert!(p.tick(0.1, &mut session).unwrap().is_empty());
    }

    assert!(!p.is_finished());
    assert!(!p.seek_to(0.5).unwrap());
    assert!(p.resync_to_live());
}

#[test]
fn custom_parser_set_limits_detection() {
    use crate::parse::EntryParser;
    use crate::parse::formats::CustomLogFormat;

    let lines = vec![
        r#"10.0.0.1 - - [10/Oct/2000:13:55:36 -0700] "GET / HTTP/1.0" 200 2326"#.to_string(),
    ];
    let (_dir, path) = write_log(&lines);
    let mut p = playback(&path, PlaybackOptions::default())
        .with_parser(EntryParser::with_formats(vec![Box::new(CustomLogFormat)]));

    p.refill().unwrap();

    assert!(matches!(p.refill(), Err(ReplayError::NoFormatDetected)));
}
