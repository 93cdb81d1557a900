use logreplay_core::sim::{FrameSnapshot, SummaryRef, SummaryView};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Lanes listed per summary.
const TOP_LANES: usize = 5;

const PROGRESS_WIDTH: usize = 30;

pub fn render_dashboard(snapshot: &FrameSnapshot) -> String {
    let mut out = String::new();

    let mut status = format!("speed {}x", snapshot.speed);
    if snapshot.time_scale != 1.0 {
        status.push_str(&format!(" | time scale {}", snapshot.time_scale));
    }
    if snapshot.paused {
        status.push_str(" | paused");
    }

    out.push_str(&format!(
        "{}  {}\n\
         ==============================\n{}\n",
        "logreplay".bold(),
        snapshot.date,
        status.dimmed()
    ));

    if let Some(fraction) = snapshot.progress {
        let filled = ((fraction * PROGRESS_WIDTH as f64).round() as usize).min(PROGRESS_WIDTH);
        out.push_str(&format!(
            "[{}{}] {:>5.1}%\n",
            "#".repeat(filled),
            ".".repeat(PROGRESS_WIDTH - filled),
            fraction * 100.0
        ));
    }

    let counters = &snapshot.counters;
    let failed = snapshot.balls.iter().filter(|b| !b.successful).count();
    out.push_str(&format!(
        "\nBalls {:03} ({} failed) | Paddles {:03} | {:08}\n\n",
        counters.balls,
        failed,
        counters.paddles,
        counters.highscore.bold()
    ));

    for summary in &snapshot.summaries {
        render_summary(&mut out, summary);
    }

    out
}

fn render_summary(out: &mut String, summary: &SummaryView) {
    let title = match summary.summary {
        SummaryRef::Hosts => "Hosts",
        SummaryRef::Group(_) if summary.title.is_empty() => "Requests",
        SummaryRef::Group(_) => summary.title.as_str(),
    };

    match summary.colour {
        Some(c) => out.push_str(&format!("{}\n", title.truecolor(c.r, c.g, c.b).bold())),
        None => out.push_str(&format!("{}\n", title.bold())),
    }

    if summary.lanes.is_empty() {
        out.push_str(&format!("  {}\n", "<quiet>".dimmed()));
        return;
    }

    // busiest first
    let mut lanes: Vec<_> = summary.lanes.iter().collect();
    lanes.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.key.cmp(&b.key)));

    for lane in lanes.into_iter().take(TOP_LANES) {
        out.push_str(&format!(
            "  {:<40} {:>4} {:>6.1}\n",
            truncate(&lane.key, 40),
            lane.refs,
            lane.score
        ));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max - 1).collect();
    t.push('~');
    t
}

pub fn redraw(output: &str) {
    print!("\x1b[2J\x1b[H");
    println!("{output}");
    let _ = io::stdout().flush();
}
