use crate::conf::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How requests are assigned to paddles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddleMode {
    /// One paddle exists but is never shown.
    None,
    #[default]
    Single,
    /// One paddle per virtual host.
    Vhost,
    /// One paddle per process id.
    Pid,
}

impl PaddleMode {
    pub fn is_multi(self) -> bool {
        matches!(self, PaddleMode::Vhost | PaddleMode::Pid)
    }
}

impl FromStr for PaddleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(PaddleMode::None),
            "single" => Ok(PaddleMode::Single),
            "vhost" => Ok(PaddleMode::Vhost),
            "pid" => Ok(PaddleMode::Pid),
            _ => Err(ConfigError::InvalidPaddleMode {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Parses `RRGGBB`, with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || ConfigError::InvalidColour {
            value: s.to_string(),
        };

        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A destination group: URL paths matching `pattern` are summarised together
/// in a band taking `percent` of the available height.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub pattern: String,

    /// `0` claims whatever space is left.
    #[serde(default)]
    pub percent: i32,

    #[serde(default)]
    pub colour: Option<Rgb>,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, percent: i32) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            percent,
            colour: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Regex::new(&self.pattern).map_err(|source| ConfigError::InvalidGroupPattern {
            group: self.name.clone(),
            pattern: self.pattern.clone(),
            source,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Simulation speed multiplier.
    pub speed: f64,

    /// Seconds between summary lane refreshes.
    pub update_rate: f64,

    pub paddle_mode: PaddleMode,

    /// Fraction of a finite log to start from.
    pub start_position: f64,

    /// Fraction of a finite log at which playback stops.
    pub stop_position: f64,

    pub progress: bool,

    /// Begin with the next entry received (streams only).
    pub sync: bool,

    pub groups: Vec<GroupConfig>,

    pub viewport: Viewport,

    /// Vertical spacing of summary lanes, in pixels.
    pub line_height: f64,

    /// Look-ahead depth; defaults depend on the source kind.
    pub buffer_rows: Option<usize>,

    /// Seed for paddle placement.
    pub seed: Option<u64>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            update_rate: 5.0,
            paddle_mode: PaddleMode::Single,
            start_position: 0.0,
            stop_position: 1.0,
            progress: true,
            sync: false,
            groups: Vec::new(),
            viewport: Viewport::default(),
            line_height: 16.0,
            buffer_rows: None,
            seed: None,
        }
    }
}

impl ReplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1.0..=30.0).contains(&self.speed) {
            return Err(ConfigError::InvalidSpeed { speed: self.speed });
        }

        if self.update_rate <= 0.0 || !self.update_rate.is_finite() {
            return Err(ConfigError::InvalidUpdateRate {
                rate: self.update_rate,
            });
        }

        for (name, value) in [
            ("start position", self.start_position),
            ("stop position", self.stop_position),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidPosition { name, value });
            }
        }

        if self.start_position >= self.stop_position {
            return Err(ConfigError::PositionOrder {
                start: self.start_position,
                stop: self.stop_position,
            });
        }

        if self.viewport.width < 100 || self.viewport.height < 100 {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        if self.line_height <= 0.0 || !self.line_height.is_finite() {
            return Err(ConfigError::InvalidLineHeight {
                height: self.line_height,
            });
        }

        for group in &self.groups {
            group.validate()?;
        }

        Ok(())
    }
}
