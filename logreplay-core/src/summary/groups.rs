use crate::conf::{GroupConfig, Viewport};
use crate::summary::{Band, Summarizer};
use once_cell::sync::Lazy;
use regex::Regex;

/// Space reserved above the summary bands.
const TOP_MARGIN: f64 = 40.0;

/// The catch-all group is only added if at least this much height is left.
const MIN_CATCH_ALL_SPACE: f64 = 50.0;

static URL_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^/]+(.+)$").expect("url host pattern is valid"));

/// Groups used when none are configured.
pub fn default_groups() -> Vec<GroupConfig> {
    vec![
        GroupConfig::new("CSS", r"\.css\b", 15),
        GroupConfig::new("Script", r"\.js\b", 15),
        GroupConfig::new("Images", r"/images/|\.(jpe?g|gif|bmp|tga|ico|png)\b", 20),
    ]
}

/// Strip a leading `http(s)://host` so absolute-form request targets share
/// lanes with their plain paths.
pub fn display_path(path: &str) -> &str {
    URL_HOST
        .captures(path)
        .and_then(|c| c.get(1))
        .map_or(path, |m| m.as_str())
}

/// Destination summarizers, tried in priority order.
pub struct SummaryGroups {
    groups: Vec<Summarizer>,

    /// Resolved percent for each accepted group, for re-layout.
    percents: Vec<i32>,

    viewport: Viewport,
    line_height: f64,
    update_rate: f64,

    total_space: f64,
    remaining_space: f64,
}

impl SummaryGroups {
    pub fn new(
        configs: &[GroupConfig],
        viewport: Viewport,
        line_height: f64,
        update_rate: f64,
    ) -> Self {
        let total_space = viewport.height as f64 - TOP_MARGIN;

        let mut groups = Self {
            groups: Vec::new(),
            percents: Vec::new(),
            viewport,
            line_height,
            update_rate,
            total_space,
            remaining_space: total_space - 2.0,
        };

        let defaults;
        let configs = if configs.is_empty() {
            defaults = default_groups();
            &defaults[..]
        } else {
            configs
        };

        for cfg in configs {
            groups.add_group(cfg);
        }

        // always fill remaining space with a catch-all, if there is some
        if groups.remaining_space > MIN_CATCH_ALL_SPACE {
            let title = if groups.groups.is_empty() { "" } else { "Misc" };
            groups.add_group(&GroupConfig::new(title, ".*", 0));
        }

        groups
    }

    fn x(&self) -> f64 {
        let width = self.viewport.width as f64;
        width - (width / 3.0).floor() + 20.0
    }

    fn remaining_percent(&self) -> i32 {
        ((self.remaining_space / self.total_space) * 100.0) as i32
    }

    /// Allocate the next slice of the band to `cfg`. Returns false if the
    /// group was rejected for lack of space or an invalid pattern.
    pub fn add_group(&mut self, cfg: &GroupConfig) -> bool {
        if cfg.percent < 0 {
            tracing::warn!(group = %cfg.name, percent = cfg.percent, "negative group percent ignored");
            return false;
        }

        let remaining_pc = self.remaining_percent();
        let percent = if cfg.percent == 0 {
            remaining_pc
        } else {
            cfg.percent
        };

        if remaining_pc < percent {
            tracing::warn!(
                group = %cfg.name,
                percent,
                remaining = remaining_pc,
                "not enough space left for group"
            );
            return false;
        }

        let filter = match Regex::new(&cfg.pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(group = %cfg.name, error = %e, "invalid group pattern");
                return false;
            }
        };

        let band = self.allocate(percent);

        tracing::debug!(
            group = %cfg.name,
            pattern = %cfg.pattern,
            percent,
            top = band.top,
            bottom = band.bottom,
            "added summary group"
        );

        let summarizer = Summarizer::new(
            cfg.name.clone(),
            self.x(),
            band,
            self.line_height,
            self.update_rate,
        )
        .with_filter(filter)
        .with_colour(cfg.colour);

        self.groups.push(summarizer);
        self.percents.push(percent);

        true
    }

    fn allocate(&mut self, percent: i32) -> Band {
        let space = ((percent as f64 / 100.0) * self.total_space).floor();
        let top = self.total_space - self.remaining_space;
        self.remaining_space -= space;
        Band::new(top, top + space)
    }

    /// Index of the first group claiming `path`.
    pub fn route(&self, path: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.supported_string(path))
    }

    pub fn get(&self, idx: usize) -> Option<&Summarizer> {
        self.groups.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Summarizer> {
        self.groups.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Summarizer> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn logic(&mut self, dt: f64) {
        for group in &mut self.groups {
            group.logic(dt);
        }
    }

    pub fn clear(&mut self) {
        for group in &mut self.groups {
            group.clear();
        }
    }

    /// Lay the accepted groups out again for a new viewport, keeping their
    /// percentages, and recalculate every lane grid.
    pub fn relayout(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.total_space = viewport.height as f64 - TOP_MARGIN;
        self.remaining_space = self.total_space - 2.0;

        let x = self.x();
        let line_height = self.line_height;
        let percents = self.percents.clone();

        for (idx, percent) in percents.into_iter().enumerate() {
            let band = self.allocate(percent);
            let group = &mut self.groups[idx];
            group.set_x(x);
            group.recalc_display(band, line_height);
        }
    }

    pub fn recalc_display(&mut self) {
        for group in &mut self.groups {
            let band = group.band();
            group.recalc_display(band, self.line_height);
        }
    }
}
