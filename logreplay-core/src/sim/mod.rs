//! The replay simulation.
//!
//! [`Simulation`] owns the playback, the live balls, the paddles and the
//! summaries. Every tick:
//!
//! playback spawn -> ball registered with host + group lanes and a paddle
//!   -> paddles re-target -> balls move -> finished balls deregistered
//!
//! Paddles refer to balls by [`BallId`] only; a paddle whose target has gone
//! simply finds a new one.

mod ball;
mod paddle;
mod snapshot;
mod targeting;

#[cfg(test)]
mod tests;

pub use ball::*;
pub use paddle::*;
pub use snapshot::*;
pub use targeting::*;

use crate::conf::{PaddleMode, ReplayConfig, Viewport};
use crate::error::ReplayError;
use crate::playback::{Playback, PlaybackOptions, SessionState, Spawn};
use crate::source::LogSource;
use crate::summary::{Band, Summarizer, SummaryGroups, display_path};
use kurbo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::iter;

/// Host lanes start below the clock.
const HOST_TOP: f64 = 40.0;
const HOST_X: f64 = 2.0;
const HOST_UPDATE_RATE: f64 = 2.0;

/// Width of the hoverable area of a summary lane.
const LANE_HIT_WIDTH: f64 = 200.0;

const DATE_FORMAT: &str = "%H:%M:%S %B %d, %Y";

/// Discrete user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Restart from a fraction of a finite log.
    Seek(f64),
    TogglePause,
    SpeedUp,
    SpeedDown,
    TimeScaleUp,
    TimeScaleDown,
    /// Skip idle time up to the next entry.
    Next,
    /// Jump to live on a stream; on a file, behaves like `Next` once data is
    /// available.
    Sync,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub spawned: Vec<BallId>,
    pub retired: usize,
    pub finished: bool,
}

pub struct Simulation {
    mode: PaddleMode,
    viewport: Viewport,
    line_height: f64,
    show_progress: bool,

    playback: Playback,
    session: SessionState,

    hosts: Summarizer,
    groups: SummaryGroups,

    balls: Vec<RequestBall>,
    paddles: BTreeMap<String, Paddle>,

    rng: StdRng,
    next_ball: u64,
    highscore: u64,
    paddles_created: u64,

    hover: Option<Inspection>,
}

fn host_band(viewport: Viewport) -> Band {
    Band::new(HOST_TOP, viewport.height as f64)
}

fn format_date(timestamp: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(timestamp, 0).map(|d| d.format(DATE_FORMAT).to_string())
}

impl Simulation {
    pub fn new(config: &ReplayConfig, source: LogSource) -> Result<Self, ReplayError> {
        config.validate()?;

        let playback = Playback::new(
            source,
            PlaybackOptions {
                buffer_rows: config.buffer_rows,
                stop_position: config.stop_position,
            },
        );

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let hosts = Summarizer::new(
            "",
            HOST_X,
            host_band(config.viewport),
            config.line_height,
            HOST_UPDATE_RATE,
        );
        let groups = SummaryGroups::new(
            &config.groups,
            config.viewport,
            config.line_height,
            config.update_rate,
        );

        let mut sim = Self {
            mode: config.paddle_mode,
            viewport: config.viewport,
            line_height: config.line_height,
            show_progress: config.progress,
            playback,
            session: SessionState::new(config.speed),
            hosts,
            groups,
            balls: Vec::new(),
            paddles: BTreeMap::new(),
            rng,
            next_ball: 0,
            highscore: 0,
            paddles_created: 0,
            hover: None,
        };

        sim.reset();
        sim.playback.refill()?;

        if config.start_position > 0.0 && config.start_position < 1.0 {
            sim.seek(config.start_position)?;
        }

        if config.sync {
            sim.playback.resync_to_live();
        }

        tracing::info!(
            mode = ?sim.mode,
            groups = sim.groups.len(),
            seekable = sim.playback.is_seekable(),
            format = sim.playback.format_name().unwrap_or("undetected"),
            "simulation ready"
        );

        Ok(sim)
    }

    //-------------------------------------------------------------------------
    // Session
    //-------------------------------------------------------------------------

    /// Drop every ball and paddle and forget all lane activity.
    pub fn reset(&mut self) {
        self.balls.clear();
        self.paddles.clear();
        self.hover = None;
        self.highscore = 0;

        self.hosts.clear();
        self.groups.clear();

        if !self.mode.is_multi() {
            self.create_paddle("");
        }

        self.hosts
            .recalc_display(host_band(self.viewport), self.line_height);
        self.groups.recalc_display();
    }

    pub fn apply(&mut self, command: Command) -> Result<(), ReplayError> {
        tracing::debug!(?command, "command");

        match command {
            Command::Seek(fraction) => {
                self.seek(fraction)?;
            }
            Command::TogglePause => {
                self.session.paused = !self.session.paused;
                if !self.session.paused {
                    self.hover = None;
                }
            }
            Command::SpeedUp => self.session.speed_up(),
            Command::SpeedDown => self.session.speed_down(),
            Command::TimeScaleUp => self.session.time_scale_up(),
            Command::TimeScaleDown => self.session.time_scale_down(),
            Command::Next => self.session.fast_forward = true,
            Command::Sync => {
                if !self.playback.resync_to_live() {
                    self.session.resync = true;
                }
            }
        }

        Ok(())
    }

    fn seek(&mut self, fraction: f64) -> Result<bool, ReplayError> {
        if !self.playback.is_seekable() {
            tracing::debug!(fraction, "ignoring seek on a stream");
            return Ok(false);
        }

        self.reset();
        self.playback.seek_to(fraction)
    }

    /// Re-lay out every band for a new display size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;

        self.groups.relayout(viewport);
        self.hosts.recalc_display(host_band(viewport), self.line_height);

        let x = self.paddle_x();
        let centre = viewport.height as f64 / 2.0;
        for paddle in self.paddles.values_mut() {
            paddle.set_x(x);
            paddle.set_centre(centre);
        }

        tracing::info!(width = viewport.width, height = viewport.height, "viewport resized");
    }

    //-------------------------------------------------------------------------
    // Tick
    //-------------------------------------------------------------------------

    /// Advance by `dt` real seconds. While paused nothing moves.
    pub fn tick(&mut self, dt: f64) -> Result<TickOutcome, ReplayError> {
        if self.session.paused {
            return Ok(TickOutcome {
                finished: self.is_finished(),
                ..Default::default()
            });
        }

        self.hover = None;

        let dt = dt * self.session.time_scale;

        let spawned = self
            .playback
            .tick(dt, &mut self.session)?
            .into_iter()
            .filter_map(|spawn| self.add_ball(spawn))
            .collect();

        self.update_paddles(dt);
        let retired = self.update_balls(dt);

        self.hosts.logic(dt);
        self.groups.logic(dt);

        Ok(TickOutcome {
            spawned,
            retired,
            finished: self.is_finished(),
        })
    }

    /// Playback has run out and every ball has landed.
    pub fn is_finished(&self) -> bool {
        self.playback.is_finished() && self.balls.is_empty()
    }

    fn paddle_x(&self) -> f64 {
        let width = self.viewport.width as f64;
        width - (width / 3.0).floor()
    }

    fn create_paddle(&mut self, token: &str) {
        let height = self.viewport.height;
        let pos = Point::new(self.paddle_x(), self.rng.random_range(0..height.max(1)) as f64);
        let centre = height as f64 / 2.0;

        let paddle = match self.mode {
            PaddleMode::None => Paddle::hidden(token, pos, centre),
            mode => Paddle::new(token, pos, centre, mode.is_multi()),
        };

        tracing::debug!(token, x = pos.x, y = pos.y, "paddle created");

        self.paddles.insert(token.to_string(), paddle);
        self.paddles_created += 1;
    }

    fn paddle_token(&self, spawn: &Spawn) -> String {
        match self.mode {
            PaddleMode::Vhost => spawn.entry.vhost.clone(),
            PaddleMode::Pid => spawn.entry.pid.clone(),
            PaddleMode::None | PaddleMode::Single => String::new(),
        }
    }

    fn add_ball(&mut self, spawn: Spawn) -> Option<BallId> {
        let Some(group) = self.groups.route(&spawn.entry.path) else {
            tracing::debug!(path = %spawn.entry.path, "no summary group for path");
            return None;
        };

        let token = self.paddle_token(&spawn);
        if !self.paddles.contains_key(&token) {
            self.create_paddle(&token);
        }
        let paddle_x = self
            .paddles
            .get(&token)
            .map_or_else(|| self.paddle_x(), Paddle::x);

        let Spawn { entry, head_start } = spawn;
        let lane_key = display_path(&entry.path).to_string();

        let summary = self.groups.get_mut(group)?;
        let dest_y = summary.add_string(&lane_key);
        let colour = summary.colour();

        let src_y = self.hosts.add_string(&entry.hostname);
        let colour_key = self.hosts.get_best_match_str(&entry.hostname);

        let id = BallId(self.next_ball);
        self.next_ball += 1;
        self.highscore += 1;

        let mut ball = RequestBall::new(
            id,
            BallSpec {
                entry,
                group,
                token,
                lane_key,
                colour_key,
                colour,
                start: Point::new(1.0, src_y),
                dest: Point::new(paddle_x, dest_y),
                speed: BALL_SPEED * self.session.speed,
            },
        );
        ball.set_elapsed(head_start);

        tracing::trace!(id = id.0, host = %ball.entry().hostname, path = %ball.entry().path, "ball spawned");

        self.balls.push(ball);
        Some(id)
    }

    fn update_paddles(&mut self, dt: f64) {
        let recentre = std::mem::take(&mut self.session.recentre);
        let mode = self.mode;
        let mut inactive = Vec::new();

        for (token, paddle) in self.paddles.iter_mut() {
            if mode.is_multi() && !paddle.moving() && !paddle.visible() {
                let wanted = self.balls.iter().any(|b| token_matches(mode, b, token));
                if !wanted {
                    inactive.push(token.clone());
                    continue;
                }
            }

            // caught, bounced or gone
            if let Some(id) = paddle.target()
                && !self.balls.iter().any(|b| b.id() == id && b.in_flight())
            {
                paddle.clear_target();
            }

            if (recentre || !paddle.moving())
                && let Some((id, eta)) = find_nearest(&self.balls, paddle.x(), mode, token)
                && paddle.target() != Some(id)
                && let Some(ball) = self.balls.iter().find(|b| b.id() == id)
            {
                paddle.set_target(id, ball.dest().y, eta);
            }

            if !paddle.moving() {
                paddle.clear_target();
            }

            paddle.logic(dt);
        }

        for token in inactive {
            self.paddles.remove(&token);
            tracing::debug!(token = %token, "idle paddle removed");
        }
    }

    fn update_balls(&mut self, dt: f64) -> usize {
        for ball in &mut self.balls {
            ball.logic(dt);
        }

        let (finished, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.balls)
            .into_iter()
            .partition(RequestBall::finished);
        self.balls = live;

        for ball in &finished {
            self.release(ball);
        }

        finished.len()
    }

    /// Deregister a ball from the lanes it was counted in.
    fn release(&mut self, ball: &RequestBall) {
        if let Some(summary) = self.groups.get_mut(ball.group()) {
            summary.remove_string(ball.lane_key());
        }
        self.hosts.remove_string(&ball.entry().hostname);
    }

    //-------------------------------------------------------------------------
    // Queries
    //-------------------------------------------------------------------------

    /// What is drawn at `point`: paddles first, then balls, then lanes.
    pub fn inspect(&mut self, point: Point) -> Option<Inspection> {
        let found = self
            .paddles
            .values()
            .find(|p| p.visible() && p.contains(point))
            .map(|p| Inspection::Paddle {
                token: p.token().to_string(),
            })
            .or_else(|| {
                self.balls
                    .iter()
                    .find(|b| b.contains(point))
                    .map(|b| Inspection::Ball {
                        id: b.id(),
                        entry: b.entry().clone(),
                    })
            })
            .or_else(|| self.summaries().find_map(|(r, s)| lane_hit(r, s, point)));

        self.hover = found.clone();
        found
    }

    /// The most recent inspection result, until time moves on.
    pub fn hover(&self) -> Option<&Inspection> {
        self.hover.as_ref()
    }

    /// Formatted date of the record at `fraction` of a finite log.
    pub fn date_at(&mut self, fraction: f64) -> Option<String> {
        self.playback.date_at(fraction).and_then(format_date)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let time = self.playback.current_time();

        FrameSnapshot {
            time,
            date: format_date(time).unwrap_or_default(),
            paused: self.session.paused,
            speed: self.session.speed,
            time_scale: self.session.time_scale,
            progress: if self.show_progress {
                self.playback.fraction()
            } else {
                None
            },
            balls: self.balls.iter().map(BallView::from).collect(),
            paddles: self.paddles.values().map(PaddleView::from).collect(),
            summaries: self
                .summaries()
                .map(|(r, s)| SummaryView::new(r, s))
                .collect(),
            counters: self.counters(),
            finished: self.is_finished(),
        }
    }

    pub fn counters(&self) -> Counters {
        Counters {
            highscore: self.highscore,
            paddles_created: self.paddles_created,
            balls: self.balls.len(),
            paddles: self.paddles.len(),
        }
    }

    pub fn balls(&self) -> &[RequestBall] {
        &self.balls
    }

    pub fn paddles(&self) -> &BTreeMap<String, Paddle> {
        &self.paddles
    }

    /// Host column first, then the URL groups in routing order.
    fn summaries(&self) -> impl Iterator<Item = (SummaryRef, &Summarizer)> {
        iter::once((SummaryRef::Hosts, &self.hosts)).chain(
            self.groups
                .iter()
                .enumerate()
                .map(|(idx, g)| (SummaryRef::Group(idx), g)),
        )
    }

    pub fn hosts(&self) -> &Summarizer {
        &self.hosts
    }

    pub fn groups(&self) -> &SummaryGroups {
        &self.groups
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }
}

fn lane_hit(owner: SummaryRef, summary: &Summarizer, point: Point) -> Option<Inspection> {
    if point.x < summary.x() || point.x > summary.x() + LANE_HIT_WIDTH {
        return None;
    }

    summary.lane_at(point.y).map(|lane| Inspection::Lane {
        summary: owner,
        title: summary.title().to_string(),
        lane,
    })
}
