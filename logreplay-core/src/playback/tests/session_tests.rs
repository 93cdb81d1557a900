use crate::playback::SessionState;

#[test]
fn speed_changes_are_clamped_and_request_recentre() {
    let mut session = SessionState::new(29.0);

    session.speed_up();
    assert_eq!(session.speed, 30.0);
    assert!(session.recentre);

    session.recentre = false;
    session.speed_up();
    assert_eq!(session.speed, 30.0);
    assert!(!session.recentre);

    let mut slow = SessionState::new(1.0);
    slow.speed_down();
    assert_eq!(slow.speed, 1.0);
}

#[test]
fn time_scale_steps() {
    let mut session = SessionState::default();

    let mut up = Vec::new();
    for _ in 0..4 {
        session.time_scale_up();
        up.push(session.time_scale);
    }
    assert_eq!(up, vec![2.0, 3.0, 4.0, 4.0]);

    let mut down = Vec::new();
    for _ in 0..6 {
        session.time_scale_down();
        down.push(session.time_scale);
    }
    assert_eq!(down, vec![3.0, 2.0, 1.0, 0.5, 0.25, 0.25]);

    session.time_scale_up();
    assert_eq!(session.time_scale, 0.5);
}
