use super::entry;
use crate::sim::{BOUNCE_DURATION, BallId, BallSpec, CATCH_LINGER, RequestBall};
use kurbo::Point;

fn ball(successful: bool) -> RequestBall {
    RequestBall::new(
        BallId(1),
        BallSpec {
            entry: entry(successful, ""),
            group: 0,
            token: String::new(),
            lane_key: "/".to_string(),
            colour_key: "h".to_string(),
            colour: None,
            start: Point::new(0.0, 0.0),
            dest: Point::new(100.0, 50.0),
            speed: 100.0,
        },
    )
}

#[test]
fn moves_in_a_straight_line_to_the_paddle() {
    let mut b = ball(true);

    b.logic(0.5);
    assert_eq!(b.pos(), Point::new(50.0, 25.0));
    assert_eq!(b.time_to_arrival(), 0.5);
    assert!(b.in_flight());
}

#[test]
fn successful_ball_is_caught_then_finishes() {
    let mut b = ball(true);

    b.logic(1.0);
    assert!(!b.in_flight());
    assert!(!b.bounced());
    assert_eq!(b.pos(), Point::new(100.0, 50.0));
    assert!(!b.finished());

    b.logic(CATCH_LINGER);
    assert!(b.finished());
    assert!(b.successful());
}

#[test]
fn unsuccessful_ball_bounces_back() {
    let mut b = ball(false);

    b.logic(1.0);
    assert!(b.bounced());

    b.logic(0.5);
    assert!(b.pos().x < 100.0);
    assert!(!b.finished());

    b.logic(BOUNCE_DURATION);
    assert!(b.finished());
}

#[test]
fn success_flag_never_changes() {
    for successful in [true, false] {
        let mut b = ball(successful);
        for _ in 0..40 {
            assert_eq!(b.successful(), successful);
            assert_eq!(b.entry().successful, successful);
            b.logic(0.1);
        }
        assert!(b.finished());
    }
}

#[test]
fn head_start_moves_the_ball_along() {
    let mut b = ball(true);

    b.set_elapsed(0.25);

    assert_eq!(b.pos().x, 25.0);
    assert_eq!(b.time_to_arrival(), 0.75);
}

#[test]
fn head_start_past_arrival_lands_immediately() {
    let mut b = ball(true);

    b.set_elapsed(1.2);

    assert!(!b.in_flight());
    assert!(!b.finished());
}
