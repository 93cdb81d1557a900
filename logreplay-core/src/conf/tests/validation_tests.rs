use crate::conf::{ConfigError, GroupConfig, ReplayConfig};

#[test]
fn default_config_is_valid() {
    assert!(ReplayConfig::default().validate().is_ok());
}

#[test]
fn speed_out_of_range_is_rejected() {
    let cfg = ReplayConfig {
        speed: 31.0,
        ..Default::default()
    };

    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidSpeed { .. })
    ));
}

#[test]
fn start_must_precede_stop() {
    let cfg = ReplayConfig {
        start_position: 0.6,
        stop_position: 0.4,
        ..Default::default()
    };

    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::PositionOrder { .. })
    ));
}

#[test]
fn position_outside_unit_range_is_rejected() {
    let cfg = ReplayConfig {
        stop_position: 1.5,
        ..Default::default()
    };

    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidPosition {
            name: "stop position",
            ..
        })
    ));
}

#[test]
fn invalid_group_pattern_fails_validation() {
    let cfg = ReplayConfig {
        groups: vec![GroupConfig::new("Bad", "[", 10)],
        ..Default::default()
    };

    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidGroupPattern { .. })
    ));
}
