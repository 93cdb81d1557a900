//! Ranked, band-limited string summaries.
//!
//! A [`Summarizer`] maps strings (hostnames, URL paths) onto a fixed number
//! of vertically stacked lanes inside a pixel band, keeping the most active
//! strings on screen. [`SummaryGroups`] splits the destination side into
//! several summarizers routed by regex.

mod groups;
mod summarizer;

#[cfg(test)]
mod tests;

pub use groups::*;
pub use summarizer::*;
