//! Two-dimensional cross-tabulation of two numeric fields.
//!
//! Each axis is cut by an explicit list of intervals. Every point lands in at
//! most one grid cell; per cell we keep the number of points and how many of
//! them satisfy a predicate (e.g. "confirmed"). Rates are derived on demand
//! and never stored.

use serde::{Deserialize, Serialize};

use crate::data::model::{Category, Dataset, Prediction, align_predictions};

// ---------------------------------------------------------------------------
// Axis intervals
// ---------------------------------------------------------------------------

/// `[lower, upper)` on one axis; the last interval of an axis also holds `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Interval { lower, upper }
    }
}

/// Consecutive intervals between sorted edges: `[e0,e1), [e1,e2), ...`.
pub fn intervals_from_edges(edges: &[f64]) -> Vec<Interval> {
    edges
        .windows(2)
        .map(|pair| Interval::new(pair[0], pair[1]))
        .collect()
}

fn locate(intervals: &[Interval], value: f64) -> Option<usize> {
    let last = intervals.len().checked_sub(1)?;
    intervals.iter().enumerate().position(|(i, iv)| {
        value >= iv.lower && (value < iv.upper || (i == last && value <= iv.upper))
    })
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeatCell {
    pub count: usize,
    pub match_count: usize,
}

impl HeatCell {
    /// `match_count / count`, or 0 for an empty cell.
    pub fn match_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.match_count as f64 / self.count as f64
        }
    }

    pub fn tier(&self, thresholds: &RateThresholds) -> RateTier {
        if self.count == 0 {
            return RateTier::Empty;
        }
        let rate = self.match_rate();
        if rate > thresholds.high {
            RateTier::High
        } else if rate > thresholds.medium {
            RateTier::Medium
        } else {
            RateTier::Low
        }
    }
}

/// Coarse classification of a cell's match rate, used to colour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTier {
    Empty,
    Low,
    Medium,
    High,
}

/// Rate cut-offs: above `high` is High, above `medium` is Medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RateThresholds {
    fn default() -> Self {
        RateThresholds {
            high: 0.7,
            medium: 0.3,
        }
    }
}

/// Counts laid out as `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub x_buckets: Vec<Interval>,
    pub y_buckets: Vec<Interval>,
    pub cells: Vec<Vec<HeatCell>>,
    /// Points that fell outside every interval on at least one axis.
    pub dropped: usize,
}

impl HeatmapGrid {
    pub fn cell(&self, x: usize, y: usize) -> Option<&HeatCell> {
        self.cells.get(y)?.get(x)
    }

    pub fn max_count(&self) -> usize {
        self.cells.iter().flatten().map(|c| c.count).max().unwrap_or(0)
    }

    pub fn total_count(&self) -> usize {
        self.cells.iter().flatten().map(|c| c.count).sum()
    }
}

/// Cross-tabulate `(x, y, matches)` points against the given intervals.
///
/// Points outside the intervals on either axis (including NaN) are counted
/// in [`HeatmapGrid::dropped`] and nowhere else.
pub fn bin_2d<I>(points: I, x_buckets: &[Interval], y_buckets: &[Interval]) -> HeatmapGrid
where
    I: IntoIterator<Item = (f64, f64, bool)>,
{
    let mut cells = vec![vec![HeatCell::default(); x_buckets.len()]; y_buckets.len()];
    let mut dropped = 0;

    for (x, y, matched) in points {
        match (locate(x_buckets, x), locate(y_buckets, y)) {
            (Some(xi), Some(yi)) => {
                let cell = &mut cells[yi][xi];
                cell.count += 1;
                if matched {
                    cell.match_count += 1;
                }
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("Heatmap dropped {dropped} out-of-range points");
    }

    HeatmapGrid {
        x_buckets: x_buckets.to_vec(),
        y_buckets: y_buckets.to_vec(),
        cells,
        dropped,
    }
}

// ---------------------------------------------------------------------------
// Dataset heatmap
// ---------------------------------------------------------------------------

/// Which fields to cross and where to cut them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapSpec {
    pub x_field: String,
    pub x_edges: Vec<f64>,
    pub y_field: String,
    pub y_edges: Vec<f64>,
    /// Row field holding a catalogue disposition. A row whose disposition
    /// equals the positive label matches even without a prediction.
    pub disposition_field: Option<String>,
}

impl Default for HeatmapSpec {
    fn default() -> Self {
        HeatmapSpec {
            x_field: "koi_period".to_string(),
            x_edges: vec![0.0, 10.0, 50.0, 100.0, 300.0, 1000.0, 5000.0],
            y_field: "koi_prad".to_string(),
            y_edges: vec![0.0, 0.5, 1.0, 2.0, 4.0, 8.0, 20.0],
            disposition_field: Some("koi_disposition".to_string()),
        }
    }
}

/// Cross two dataset fields, matching rows labelled `positive`.
///
/// Rows where either field is not numeric are skipped entirely.
pub fn heatmap(
    dataset: &Dataset,
    predictions: Option<&[Prediction]>,
    spec: &HeatmapSpec,
    positive: Category,
) -> HeatmapGrid {
    let predictions = align_predictions(dataset, predictions);
    let points = dataset.rows().iter().enumerate().filter_map(|(i, row)| {
        let x = row.get(&spec.x_field).as_f64()?;
        let y = row.get(&spec.y_field).as_f64()?;
        let predicted = predictions.is_some_and(|preds| preds[i].label == positive);
        let catalogued = spec.disposition_field.as_deref().is_some_and(|field| {
            row.get(field)
                .text_form()
                .parse::<Category>()
                .is_ok_and(|c| c == positive)
        });
        Some((x, y, predicted || catalogued))
    });

    bin_2d(
        points,
        &intervals_from_edges(&spec.x_edges),
        &intervals_from_edges(&spec.y_edges),
    )
}
