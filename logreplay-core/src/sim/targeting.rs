use crate::conf::PaddleMode;
use crate::sim::{BallId, RequestBall};

/// Whether `ball` is one the paddle for `token` should catch.
pub fn token_matches(mode: PaddleMode, ball: &RequestBall, token: &str) -> bool {
    match mode {
        PaddleMode::None | PaddleMode::Single => true,
        PaddleMode::Vhost => ball.entry().vhost == token,
        PaddleMode::Pid => ball.entry().pid == token,
    }
}

/// The catchable ball that will reach `paddle_x` soonest, with its time to
/// get there.
///
/// Only in-flight, successful balls on the paddle's token count; a ball that
/// has already passed the paddle is ignored. On equal times the first ball in
/// `balls` wins.
pub fn find_nearest<'a, I>(
    balls: I,
    paddle_x: f64,
    mode: PaddleMode,
    token: &str,
) -> Option<(BallId, f64)>
where
    I: IntoIterator<Item = &'a RequestBall>,
{
    let mut nearest: Option<(BallId, f64)> = None;

    for ball in balls {
        if !ball.successful() || !ball.in_flight() || ball.bounced() {
            continue;
        }
        if !token_matches(mode, ball, token) {
            continue;
        }

        let eta = (paddle_x - ball.pos().x) / ball.speed();
        if eta < 0.0 {
            continue;
        }

        if nearest.is_none_or(|(_, best)| eta < best) {
            nearest = Some((ball.id(), eta));
        }
    }

    nearest
}
