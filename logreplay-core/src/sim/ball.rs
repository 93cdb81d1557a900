use crate::conf::Rgb;
use crate::parse::LogEntry;
use kurbo::{Point, Vec2};
use serde::Serialize;

/// Horizontal speed of a ball at speed multiplier 1, in pixels per second.
pub const BALL_SPEED: f64 = 200.0;

/// Seconds a caught ball stays on the paddle.
pub const CATCH_LINGER: f64 = 0.5;

/// Seconds a bounced ball keeps travelling before it disappears.
pub const BOUNCE_DURATION: f64 = 1.0;

pub const BALL_RADIUS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BallId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Flying,
    Caught { remaining: f64 },
    Bounced { remaining: f64 },
    Done,
}

/// One request in flight from its source lane to a paddle.
#[derive(Debug, Clone)]
pub struct RequestBall {
    id: BallId,
    entry: LogEntry,

    /// Group and paddle the ball was registered with.
    group: usize,
    token: String,
    lane_key: String,

    colour_key: String,
    colour: Option<Rgb>,

    start: Point,
    dest: Point,
    pos: Point,
    vel: Vec2,

    /// Horizontal pixels per second.
    speed: f64,
    arrival: f64,
    elapsed: f64,

    phase: Phase,
}

pub(crate) struct BallSpec {
    pub entry: LogEntry,
    pub group: usize,
    pub token: String,
    pub lane_key: String,
    pub colour_key: String,
    pub colour: Option<Rgb>,
    pub start: Point,
    pub dest: Point,
    pub speed: f64,
}

impl RequestBall {
    pub(crate) fn new(id: BallId, spec: BallSpec) -> Self {
        let speed = spec.speed.max(f64::EPSILON);
        let arrival = ((spec.dest.x - spec.start.x) / speed).max(0.0);
        let vel = if arrival > 0.0 {
            (spec.dest - spec.start) / arrival
        } else {
            Vec2::new(speed, 0.0)
        };

        Self {
            id,
            entry: spec.entry,
            group: spec.group,
            token: spec.token,
            lane_key: spec.lane_key,
            colour_key: spec.colour_key,
            colour: spec.colour,
            start: spec.start,
            dest: spec.dest,
            pos: spec.start,
            vel,
            speed,
            arrival,
            elapsed: 0.0,
            phase: Phase::Flying,
        }
    }

    pub fn id(&self) -> BallId {
        self.id
    }

    /// The originating request. Never mutated after parse.
    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    pub fn successful(&self) -> bool {
        self.entry.successful
    }

    pub(crate) fn group(&self) -> usize {
        self.group
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn lane_key(&self) -> &str {
        &self.lane_key
    }

    pub fn colour_key(&self) -> &str {
        &self.colour_key
    }

    pub fn colour(&self) -> Option<Rgb> {
        self.colour
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn dest(&self) -> Point {
        self.dest
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Seconds until the ball reaches the paddle; zero once it has.
    pub fn time_to_arrival(&self) -> f64 {
        (self.arrival - self.elapsed).max(0.0)
    }

    pub fn in_flight(&self) -> bool {
        self.phase == Phase::Flying
    }

    pub fn bounced(&self) -> bool {
        matches!(self.phase, Phase::Bounced { .. })
    }

    pub fn finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Back-date the ball so it starts where it would have been had it
    /// spawned on time.
    pub fn set_elapsed(&mut self, elapsed: f64) {
        self.elapsed = 0.0;
        self.pos = self.start;
        self.logic(elapsed.max(0.0));
    }

    pub fn logic(&mut self, dt: f64) {
        match self.phase {
            Phase::Flying => {
                self.elapsed += dt;
                if self.elapsed < self.arrival {
                    self.pos = self.start + self.vel * self.elapsed;
                    return;
                }

                self.pos = self.dest;
                let overshoot = self.elapsed - self.arrival;

                self.phase = if self.entry.successful {
                    Phase::Caught {
                        remaining: CATCH_LINGER - overshoot,
                    }
                } else {
                    self.vel = Vec2::new(-self.vel.x, self.vel.y);
                    self.pos += self.vel * overshoot;
                    Phase::Bounced {
                        remaining: BOUNCE_DURATION - overshoot,
                    }
                };
                self.settle();
            }
            Phase::Caught { remaining } => {
                self.elapsed += dt;
                self.phase = Phase::Caught {
                    remaining: remaining - dt,
                };
                self.settle();
            }
            Phase::Bounced { remaining } => {
                self.elapsed += dt;
                self.pos += self.vel * dt;
                self.phase = Phase::Bounced {
                    remaining: remaining - dt,
                };
                self.settle();
            }
            Phase::Done => {}
        }
    }

    fn settle(&mut self) {
        if let Phase::Caught { remaining } | Phase::Bounced { remaining } = self.phase
            && remaining <= 0.0
        {
            self.phase = Phase::Done;
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.pos.distance(point) <= BALL_RADIUS
    }
}
