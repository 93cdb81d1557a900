use crate::conf::{ConfigError, GroupConfig, ReplayConfig, Rgb};
use std::fs;
use std::path::Path;
use std::str::FromStr;

impl ReplayConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let cfg: Self = toml::from_str(&s).map_err(|e| ConfigError::parse(path, e))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl FromStr for ReplayConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cfg: Self = toml::from_str(s).map_err(|source| ConfigError::ParseStr { source })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl FromStr for GroupConfig {
    type Err = ConfigError;

    /// Parses the compact `name,regex,percent[,colour]` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        if !(3..=4).contains(&fields.len()) || fields.iter().any(|f| f.is_empty()) {
            return Err(ConfigError::InvalidGroup {
                definition: s.to_string(),
            });
        }

        let name = fields[0].to_string();
        let percent =
            fields[2]
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidGroupPercent {
                    group: name.clone(),
                    value: fields[2].to_string(),
                })?;

        let colour = fields.get(3).map(|c| c.parse::<Rgb>()).transpose()?;

        let group = GroupConfig {
            name,
            pattern: fields[1].to_string(),
            percent,
            colour,
        };
        group.validate()?;

        Ok(group)
    }
}
