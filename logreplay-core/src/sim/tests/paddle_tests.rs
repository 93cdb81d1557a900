use crate::sim::{BallId, Paddle};
use kurbo::Point;

const DT: f64 = 1.0 / 60.0;

#[test]
fn reaches_target_height_on_time() {
    let mut paddle = Paddle::new("", Point::new(600.0, 100.0), 384.0, false);

    paddle.set_target(BallId(7), 300.0, 2.0);
    assert!(paddle.moving());

    paddle.logic(1.0);
    assert_eq!(paddle.pos().y, 200.0);

    paddle.logic(1.0);
    assert_eq!(paddle.pos().y, 300.0);

    // does not overshoot
    paddle.logic(1.0);
    assert_eq!(paddle.pos().y, 300.0);
}

#[test]
fn idle_paddle_drifts_to_centre() {
    let mut paddle = Paddle::new("", Point::new(600.0, 380.0), 384.0, false);

    paddle.clear_target();
    paddle.logic(1.0);

    assert!(!paddle.moving());
    assert_eq!(paddle.pos().y, 384.0);
}

#[test]
fn fading_paddle_appears_while_chasing() {
    let mut paddle = Paddle::new("a.example", Point::new(600.0, 100.0), 384.0, true);
    assert!(!paddle.visible());

    paddle.set_target(BallId(1), 100.0, 1.0);
    paddle.logic(0.5);
    assert_eq!(paddle.visibility(), 0.5);

    paddle.clear_target();
    paddle.logic(0.5);
    assert!(!paddle.visible());
}

#[test]
fn single_paddle_is_always_visible() {
    let mut paddle = Paddle::new("", Point::new(600.0, 100.0), 384.0, false);
    paddle.logic(5.0);
    assert_eq!(paddle.visibility(), 1.0);
}

#[test]
fn hit_test() {
    let paddle = Paddle::new("", Point::new(600.0, 100.0), 384.0, false);

    assert!(paddle.contains(Point::new(605.0, 120.0)));
    assert!(!paddle.contains(Point::new(595.0, 100.0)));
    assert!(!paddle.contains(Point::new(605.0, 130.0)));
}

#[test]
fn instant_chase_with_zero_dt_stays_put() {
    let mut paddle = Paddle::new("", Point::new(600.0, 100.0), 384.0, false);

    paddle.set_target(BallId(3), 250.0, 0.0);
    paddle.logic(0.0);
    assert_eq!(paddle.pos().y, 100.0);

    paddle.logic(DT);
    assert_eq!(paddle.pos().y, 250.0);
}
