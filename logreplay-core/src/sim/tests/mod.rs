mod ball_tests;
mod paddle_tests;

use crate::parse::LogEntry;
use crate::sim::{BallId, BallSpec, RequestBall};
use kurbo::Point;

/// Paddle column used by the hand-built balls below.
pub(super) const PADDLE_X: f64 = 683.0;

pub(super) fn entry(successful: bool, vhost: &str) -> LogEntry {
    LogEntry {
        hostname: "10.0.0.1".to_string(),
        path: "/index.html".to_string(),
        vhost: vhost.to_string(),
        response_code: if successful { 200 } else { 404 },
        successful,
        ..Default::default()
    }
}

/// A ball currently at `x`, heading for the paddle column at 100 px/s.
pub(super) fn ball_at(id: u64, x: f64, entry: LogEntry) -> RequestBall {
    RequestBall::new(
        BallId(id),
        BallSpec {
            entry,
            group: 0,
            token: String::new(),
            lane_key: "/index.html".to_string(),
            colour_key: "10.0.0.1".to_string(),
            colour: None,
            start: Point::new(x, 100.0),
            dest: Point::new(PADDLE_X, 100.0),
            speed: 100.0,
        },
    )
}
