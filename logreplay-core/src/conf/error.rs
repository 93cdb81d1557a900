use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {source}")]
    ParseStr {
        #[source]
        source: toml::de::Error,
    },

    //-------------------------------------------------------------------------
    // Playback
    //-------------------------------------------------------------------------
    #[error("simulation speed must be between 1 and 30, got {speed}")]
    InvalidSpeed { speed: f64 },

    #[error("update rate must be positive, got {rate}")]
    InvalidUpdateRate { rate: f64 },

    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidPosition { name: &'static str, value: f64 },

    #[error("start position {start} must be before stop position {stop}")]
    PositionOrder { start: f64, stop: f64 },

    #[error("viewport {width}x{height} is too small")]
    InvalidViewport { width: u32, height: u32 },

    #[error("line height must be positive, got {height}")]
    InvalidLineHeight { height: f64 },

    //-------------------------------------------------------------------------
    // Groups
    //-------------------------------------------------------------------------
    #[error("invalid group definition '{definition}': expected name,regex,percent[,colour]")]
    InvalidGroup { definition: String },

    #[error("invalid pattern '{pattern}' for group '{group}': {source}")]
    InvalidGroupPattern {
        group: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid percent '{value}' for group '{group}'")]
    InvalidGroupPercent { group: String, value: String },

    #[error("invalid colour '{value}': expected RRGGBB hex")]
    InvalidColour { value: String },

    #[error("unknown paddle mode '{value}'")]
    InvalidPaddleMode { value: String },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
