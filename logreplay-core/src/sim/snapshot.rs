use crate::conf::Rgb;
use crate::parse::LogEntry;
use crate::sim::{BallId, Paddle, RequestBall};
use crate::summary::{Lane, Summarizer};
use kurbo::Point;
use serde::Serialize;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    /// Simulated time, unix seconds.
    pub time: i64,
    pub date: String,

    pub paused: bool,
    pub speed: f64,
    pub time_scale: f64,

    /// Read position of a finite log, when progress display is enabled.
    pub progress: Option<f64>,

    pub balls: Vec<BallView>,
    pub paddles: Vec<PaddleView>,

    /// Host summary first, then the URL groups in priority order.
    pub summaries: Vec<SummaryView>,

    pub counters: Counters,
    pub finished: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub id: BallId,
    pub pos: Point,

    /// Fixed colour from the URL group, if it has one.
    pub colour: Option<Rgb>,

    /// Key a renderer hashes to a colour when `colour` is unset.
    pub colour_key: String,

    /// Per-request colour carried by the log line itself.
    pub response_colour: Option<Rgb>,

    pub bounced: bool,
    pub successful: bool,
    pub hostname: String,
    pub path: String,
    pub response_code: u16,
}

impl From<&RequestBall> for BallView {
    fn from(ball: &RequestBall) -> Self {
        let entry = ball.entry();
        Self {
            id: ball.id(),
            pos: ball.pos(),
            colour: ball.colour(),
            colour_key: ball.colour_key().to_string(),
            response_colour: entry.colour,
            bounced: ball.bounced(),
            successful: entry.successful,
            hostname: entry.hostname.clone(),
            path: entry.path.clone(),
            response_code: entry.response_code,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaddleView {
    pub token: String,
    pub pos: Point,
    pub visibility: f64,
    pub target: Option<BallId>,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            token: paddle.token().to_string(),
            pos: paddle.pos(),
            visibility: paddle.visibility(),
            target: paddle.target(),
        }
    }
}

/// Which summarizer a lane belongs to. Titles are not unique: an untitled
/// catch-all group has the same empty title as the host column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryRef {
    Hosts,
    Group(usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub summary: SummaryRef,
    pub title: String,
    pub x: f64,
    pub colour: Option<Rgb>,
    pub lanes: Vec<Lane>,
}

impl SummaryView {
    pub fn new(summary: SummaryRef, summarizer: &Summarizer) -> Self {
        Self {
            summary,
            title: summarizer.title().to_string(),
            x: summarizer.x(),
            colour: summarizer.colour(),
            lanes: summarizer.lanes(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Balls spawned since the session started.
    pub highscore: u64,
    pub paddles_created: u64,
    pub balls: usize,
    pub paddles: usize,
}

/// What the pointer is over while paused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inspection {
    Paddle { token: String },
    Ball { id: BallId, entry: LogEntry },
    Lane {
        summary: SummaryRef,
        title: String,
        lane: Lane,
    },
}
