/// Interactive playback state, threaded through every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub paused: bool,

    /// Simulation speed multiplier, 1..=30.
    pub speed: f64,

    /// Scales real frame time before anything else sees it.
    pub time_scale: f64,

    /// Jump the clock to the next pending entry if it is in the future.
    pub fast_forward: bool,

    /// Like `fast_forward`, but stays armed until an entry is available.
    pub resync: bool,

    /// Ask every paddle to pick a new target on the next tick.
    pub recentre: bool,
}

pub const MIN_SPEED: f64 = 1.0;
pub const MAX_SPEED: f64 = 30.0;

const MIN_TIME_SCALE: f64 = 0.25;
const MAX_TIME_SCALE: f64 = 4.0;

impl SessionState {
    pub fn new(speed: f64) -> Self {
        Self {
            paused: false,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            time_scale: 1.0,
            fast_forward: false,
            resync: false,
            recentre: false,
        }
    }

    pub fn speed_up(&mut self) {
        if self.speed <= MAX_SPEED - 1.0 {
            self.speed += 1.0;
            self.recentre = true;
        }
    }

    pub fn speed_down(&mut self) {
        if self.speed >= MIN_SPEED + 1.0 {
            self.speed -= 1.0;
            self.recentre = true;
        }
    }

    /// 0.25 -> 0.5 -> 1 -> 2 -> 3 -> 4
    pub fn time_scale_up(&mut self) {
        self.time_scale = if self.time_scale >= 1.0 {
            (self.time_scale.floor() + 1.0).min(MAX_TIME_SCALE)
        } else {
            (self.time_scale * 2.0).min(1.0)
        };
    }

    pub fn time_scale_down(&mut self) {
        self.time_scale = if self.time_scale > 1.0 {
            (self.time_scale.floor() - 1.0).max(1.0)
        } else {
            (self.time_scale * 0.5).max(MIN_TIME_SCALE)
        };
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
