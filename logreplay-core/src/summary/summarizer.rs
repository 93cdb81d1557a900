use crate::conf::Rgb;
use ahash::AHashMap;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;

/// Scores are multiplied by this on every refresh.
const SCORE_DECAY: f64 = 0.5;

/// Unreferenced buckets whose score falls below this are forgotten.
const MIN_SCORE: f64 = 0.05;

/// Vertical pixel range `[top, bottom)` a summarizer may draw into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    pub fn centre(&self) -> f64 {
        self.top + self.height() / 2.0
    }
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    /// Live requests currently carrying this string.
    refs: u32,

    /// Recent activity, decayed on every refresh.
    score: f64,
}

impl Bucket {
    fn priority(&self) -> (f64, u32) {
        (self.score, self.refs)
    }
}

fn cmp_priority(a: (f64, u32), b: (f64, u32)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// A displayed lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub key: String,
    pub y: f64,
    pub score: f64,
    pub refs: u32,
}

pub struct Summarizer {
    title: String,
    filter: Option<Regex>,
    colour: Option<Rgb>,

    x: f64,
    band: Band,
    line_height: f64,

    update_rate: f64,
    since_refresh: f64,

    buckets: AHashMap<String, Bucket>,

    /// One entry per lane position; `slots[i]` is drawn at `slot_y(i)`.
    slots: Vec<Option<String>>,
}

impl Summarizer {
    pub fn new(
        title: impl Into<String>,
        x: f64,
        band: Band,
        line_height: f64,
        update_rate: f64,
    ) -> Self {
        let mut summarizer = Self {
            title: title.into(),
            filter: None,
            colour: None,
            x,
            band,
            line_height,
            update_rate,
            since_refresh: 0.0,
            buckets: AHashMap::new(),
            slots: Vec::new(),
        };
        summarizer.slots = vec![None; summarizer.capacity()];
        summarizer
    }

    pub fn with_filter(mut self, filter: Regex) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_colour(mut self, colour: Option<Rgb>) -> Self {
        self.colour = colour;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn colour(&self) -> Option<Rgb> {
        self.colour
    }

    pub fn is_coloured(&self) -> bool {
        self.colour.is_some()
    }

    /// Number of lanes that fit in the band.
    pub fn capacity(&self) -> usize {
        if self.line_height <= 0.0 {
            return 0;
        }
        (self.band.height() / self.line_height).floor() as usize
    }

    pub fn supported_string(&self, s: &str) -> bool {
        self.filter.as_ref().is_none_or(|re| re.is_match(s))
    }

    fn slot_y(&self, slot: usize) -> f64 {
        self.band.top + (slot as f64 + 0.5) * self.line_height
    }

    fn slot_of(&self, s: &str) -> Option<usize> {
        self.slots.iter().position(|k| k.as_deref() == Some(s))
    }

    fn priority(&self, s: &str) -> (f64, u32) {
        self.buckets
            .get(s)
            .map(Bucket::priority)
            .unwrap_or((0.0, 0))
    }

    /// Record one more live request for `s` and return the Y it should
    /// travel to.
    pub fn add_string(&mut self, s: &str) -> f64 {
        let bucket = self.buckets.entry(s.to_string()).or_default();
        bucket.refs += 1;
        bucket.score += 1.0;

        if let Some(slot) = self.slot_of(s) {
            return self.slot_y(slot);
        }

        if let Some(slot) = self.slots.iter().position(Option::is_none) {
            self.slots[slot] = Some(s.to_string());
            return self.slot_y(slot);
        }

        // Full: take over the weakest lane only if we outrank it.
        let weakest = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.as_deref().map(|k| (i, self.priority(k))))
            .min_by(|a, b| cmp_priority(a.1, b.1));

        if let Some((slot, weakest)) = weakest
            && cmp_priority(self.priority(s), weakest) == Ordering::Greater
        {
            self.slots[slot] = Some(s.to_string());
            return self.slot_y(slot);
        }

        match self.best_match_slot(s) {
            Some(slot) => self.slot_y(slot),
            None => self.band.centre(),
        }
    }

    /// Release one live request for `s`. The lane stays until the next
    /// refresh decides it has gone quiet.
    pub fn remove_string(&mut self, s: &str) {
        if let Some(bucket) = self.buckets.get_mut(s) {
            bucket.refs = bucket.refs.saturating_sub(1);
        }
    }

    /// Lane sharing the longest prefix with `s`.
    fn best_match_slot(&self, s: &str) -> Option<usize> {
        if let Some(slot) = self.slot_of(s) {
            return Some(slot);
        }

        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.as_deref().map(|k| (i, common_prefix_len(k, s))))
            .filter(|(_, len)| *len > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i)
    }

    /// The lane key that stands for `s`, used to derive a stable colour.
    pub fn get_best_match_str(&self, s: &str) -> String {
        self.best_match_slot(s)
            .and_then(|slot| self.slots[slot].clone())
            .unwrap_or_else(|| s.to_string())
    }

    pub fn logic(&mut self, dt: f64) {
        self.since_refresh += dt;
        if self.since_refresh >= self.update_rate {
            self.since_refresh = 0.0;
            self.refresh();
        }
    }

    /// Decay activity and re-rank the displayed lanes. Surviving lanes keep
    /// their positions; newcomers take the freed ones in rank order.
    pub fn refresh(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.score *= SCORE_DECAY;
        }
        self.buckets
            .retain(|_, b| b.refs > 0 || b.score >= MIN_SCORE);

        let top = self.ranked_keys(self.capacity());

        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|k| !top.contains(k)) {
                *slot = None;
            }
        }

        for key in top {
            if self.slot_of(&key).is_some() {
                continue;
            }
            if let Some(free) = self.slots.iter().position(Option::is_none) {
                self.slots[free] = Some(key);
            }
        }
    }

    /// Keys ordered by priority, highest first; ties broken by key so the
    /// layout is deterministic.
    fn ranked_keys(&self, limit: usize) -> Vec<String> {
        let mut keys: Vec<(&String, (f64, u32))> = self
            .buckets
            .iter()
            .map(|(k, b)| (k, b.priority()))
            .collect();

        keys.sort_by(|a, b| cmp_priority(b.1, a.1).then_with(|| a.0.cmp(b.0)));
        keys.into_iter()
            .take(limit)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Re-derive the lane grid for a new band or font size. Existing lanes
    /// keep their relative order; if fewer fit, the weakest are dropped.
    pub fn recalc_display(&mut self, band: Band, line_height: f64) {
        self.band = band;
        self.line_height = line_height;

        let capacity = self.capacity();
        let mut kept: Vec<String> = self.slots.drain(..).flatten().collect();

        if kept.len() > capacity {
            let survivors = {
                let mut ranked: Vec<&String> = kept.iter().collect();
                ranked.sort_by(|a, b| {
                    cmp_priority(self.priority(b), self.priority(a)).then_with(|| a.cmp(b))
                });
                ranked
                    .into_iter()
                    .take(capacity)
                    .cloned()
                    .collect::<Vec<_>>()
            };
            kept.retain(|k| survivors.contains(k));
        }

        self.slots = kept.into_iter().map(Some).collect();
        self.slots.resize(capacity, None);

        for key in self.ranked_keys(capacity) {
            if self.slot_of(&key).is_some() {
                continue;
            }
            if let Some(free) = self.slots.iter().position(Option::is_none) {
                self.slots[free] = Some(key);
            }
        }
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.slots = vec![None; self.capacity()];
        self.since_refresh = 0.0;
    }

    /// Displayed lanes, top to bottom.
    pub fn lanes(&self) -> Vec<Lane> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, k)| {
                let key = k.as_ref()?;
                let bucket = self.buckets.get(key).cloned().unwrap_or_default();
                Some(Lane {
                    key: key.clone(),
                    y: self.slot_y(i),
                    score: bucket.score,
                    refs: bucket.refs,
                })
            })
            .collect()
    }

    /// The lane drawn at pixel row `y`, if any.
    pub fn lane_at(&self, y: f64) -> Option<Lane> {
        if y < self.band.top || self.line_height <= 0.0 {
            return None;
        }
        let slot = ((y - self.band.top) / self.line_height).floor() as usize;
        let key = self.slots.get(slot)?.as_ref()?;

        self.lanes().into_iter().find(|lane| &lane.key == key)
    }

    /// Live request count for `s`.
    pub fn refs(&self, s: &str) -> u32 {
        self.buckets.get(s).map(|b| b.refs).unwrap_or(0)
    }

    pub fn total_refs(&self) -> u64 {
        self.buckets.values().map(|b| b.refs as u64).sum()
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
