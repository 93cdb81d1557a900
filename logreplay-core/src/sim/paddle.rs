use crate::sim::BallId;
use kurbo::Point;

pub const PADDLE_WIDTH: f64 = 10.0;
pub const PADDLE_HEIGHT: f64 = 50.0;

/// Vertical speed when drifting back to the centre with nothing to catch.
const DRIFT_SPEED: f64 = 100.0;

/// Visibility gained or lost per second in multi-paddle modes.
const FADE_RATE: f64 = 1.0;

/// A catcher on the right of the field. The paddle never owns the ball it
/// chases; `target` is only looked up in the live ball list.
#[derive(Debug, Clone)]
pub struct Paddle {
    token: String,
    pos: Point,

    target: Option<BallId>,
    target_y: f64,
    vertical_speed: f64,

    /// Rest position used when idle.
    centre_y: f64,

    /// 0 (hidden) ..= 1 (opaque).
    visibility: f64,
    fades: bool,
}

impl Paddle {
    /// `fades` paddles start hidden and fade in while chasing; the others are
    /// shown at full visibility from the start.
    pub fn new(token: impl Into<String>, pos: Point, centre_y: f64, fades: bool) -> Self {
        Self {
            token: token.into(),
            pos,
            target: None,
            target_y: pos.y,
            vertical_speed: 0.0,
            centre_y,
            visibility: if fades { 0.0 } else { 1.0 },
            fades,
        }
    }

    pub(crate) fn hidden(token: impl Into<String>, pos: Point, centre_y: f64) -> Self {
        let mut paddle = Self::new(token, pos, centre_y, false);
        paddle.visibility = 0.0;
        paddle
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub(crate) fn set_x(&mut self, x: f64) {
        self.pos.x = x;
    }

    pub(crate) fn set_centre(&mut self, centre_y: f64) {
        self.centre_y = centre_y;
    }

    pub fn target(&self) -> Option<BallId> {
        self.target
    }

    pub fn moving(&self) -> bool {
        self.target.is_some()
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    pub fn visible(&self) -> bool {
        self.visibility > 0.0
    }

    /// Chase `ball`, arriving at `y` in `eta` seconds.
    pub fn set_target(&mut self, ball: BallId, y: f64, eta: f64) {
        self.target = Some(ball);
        self.target_y = y;
        self.vertical_speed = if eta > 0.0 {
            (y - self.pos.y).abs() / eta
        } else {
            f64::INFINITY
        };
    }

    /// Stop chasing and drift back to the centre.
    pub fn clear_target(&mut self) {
        if self.target.take().is_some() {
            tracing::trace!(token = %self.token, "paddle target cleared");
        }
        self.target_y = self.centre_y;
        self.vertical_speed = DRIFT_SPEED;
    }

    pub fn logic(&mut self, dt: f64) {
        let dy = self.target_y - self.pos.y;
        // an instant chase speed times a zero dt would be NaN
        let step = if dt > 0.0 {
            self.vertical_speed * dt
        } else {
            0.0
        };
        self.pos.y = if dy.abs() <= step {
            self.target_y
        } else {
            self.pos.y + step.copysign(dy)
        };

        if self.fades {
            let fade = if self.moving() { FADE_RATE } else { -FADE_RATE };
            self.visibility = (self.visibility + fade * dt).clamp(0.0, 1.0);
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + PADDLE_WIDTH
            && (point.y - self.pos.y).abs() <= PADDLE_HEIGHT / 2.0
    }
}
