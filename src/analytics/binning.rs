//! Equal-width binning of a numeric field.
//!
//! Values are bucketed over `[min, max]` into `bucket_count` intervals that
//! are half-open except for the last one, which also holds `max`. Each bucket
//! keeps a total count plus a count per category label, which is what the
//! confidence-distribution and per-label breakdown charts stack.
//!
//! # Examples
//!
//! ```
//! use rusty_koi::analytics::binning::bin_1d;
//!
//! let values = [0.05, 0.15, 0.95, 0.97].map(|v| (Some(v), None::<&str>));
//! let buckets = bin_1d(values, 10, Some(0.0), Some(1.0)).unwrap();
//! assert_eq!(buckets.len(), 10);
//! assert_eq!(buckets[9].count, 2);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Category, Dataset, Prediction, align_predictions};
use crate::error::{Error, Result};

/// A numeric interval with its occurrence counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<K: Ord> {
    /// Inclusive lower bound.
    pub lower_bound: f64,
    /// Exclusive upper bound, unless `upper_inclusive` is set.
    pub upper_bound: f64,
    /// Set on the last bucket of a range, which is closed at the top.
    pub upper_inclusive: bool,
    pub count: usize,
    pub sub_counts: BTreeMap<K, usize>,
}

impl<K: Ord> Bucket<K> {
    fn new(lower_bound: f64, upper_bound: f64, upper_inclusive: bool) -> Self {
        Bucket {
            lower_bound,
            upper_bound,
            upper_inclusive,
            count: 0,
            sub_counts: BTreeMap::new(),
        }
    }

    fn record(&mut self, category: Option<K>) {
        self.count += 1;
        if let Some(category) = category {
            *self.sub_counts.entry(category).or_insert(0) += 1;
        }
    }

    /// Whether `value` falls inside this bucket's interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound
            && (value < self.upper_bound || (self.upper_inclusive && value <= self.upper_bound))
    }

    pub fn sub_count(&self, category: &K) -> usize {
        self.sub_counts.get(category).copied().unwrap_or(0)
    }
}

/// Bin numeric values, optionally tagged with a category.
///
/// Entries whose value is `None` or non-finite are skipped. `min`/`max`
/// default to the observed range. Values outside explicit bounds are clamped
/// into the first or last bucket, so bucket counts always add up to the
/// number of numeric inputs.
///
/// With no numeric input, or an empty range (`max <= min`), the result is a
/// single bucket `[min, min]` holding every value.
///
/// # Errors
///
/// [`Error::InvalidBucketCount`] when `bucket_count` is zero.
pub fn bin_1d<K, I>(
    values: I,
    bucket_count: usize,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<Vec<Bucket<K>>>
where
    K: Ord,
    I: IntoIterator<Item = (Option<f64>, Option<K>)>,
{
    if bucket_count == 0 {
        return Err(Error::InvalidBucketCount(bucket_count));
    }

    let points: Vec<(f64, Option<K>)> = values
        .into_iter()
        .filter_map(|(value, category)| value.filter(|v| v.is_finite()).map(|v| (v, category)))
        .collect();

    let lo = min.unwrap_or_else(|| points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min));
    let hi = max.unwrap_or_else(|| {
        points
            .iter()
            .map(|p| p.0)
            .fold(f64::NEG_INFINITY, f64::max)
    });

    if points.is_empty() || !lo.is_finite() || !hi.is_finite() || hi <= lo {
        let at = if lo.is_finite() { lo } else { 0.0 };
        let mut bucket = Bucket::new(at, at, true);
        for (_, category) in points {
            bucket.record(category);
        }
        return Ok(vec![bucket]);
    }

    // A range wider than f64::MAX is measured in halves.
    let halved = !(hi - lo).is_finite();
    let scale = if halved { 0.5 } else { 1.0 };
    let width = hi * scale - lo * scale;
    let n = bucket_count as f64;

    // Bounds are recomputed from the index to avoid accumulating error.
    let boundary = |i: usize| {
        let offset = width * (i as f64 / n);
        let bound = if halved { lo + offset + offset } else { lo + offset };
        bound.min(hi)
    };
    let mut buckets: Vec<Bucket<K>> = (0..bucket_count)
        .map(|i| {
            let last = i + 1 == bucket_count;
            let lower = if i == 0 { lo } else { boundary(i) };
            let upper = if last { hi } else { boundary(i + 1) };
            Bucket::new(lower, upper, last)
        })
        .collect();

    for (value, category) in points {
        let position = ((value * scale - lo * scale) / width * n).floor();
        let idx = if position <= 0.0 {
            0
        } else {
            (position as usize).min(bucket_count - 1)
        };
        buckets[idx].record(category);
    }

    log::debug!("Binned into {bucket_count} buckets over [{lo}, {hi}]");
    Ok(buckets)
}

/// Histogram of a dataset field, sub-counted by predicted label when
/// predictions line up with the rows.
///
/// A field outside the schema yields no buckets.
pub fn histogram(
    dataset: &Dataset,
    field: &str,
    predictions: Option<&[Prediction]>,
    bucket_count: usize,
) -> Result<Vec<Bucket<Category>>> {
    if bucket_count == 0 {
        return Err(Error::InvalidBucketCount(bucket_count));
    }
    if !dataset.has_field(field) {
        log::debug!("Histogram field {field:?} not in schema");
        return Ok(Vec::new());
    }
    let predictions = align_predictions(dataset, predictions);
    let values = dataset.rows().iter().enumerate().map(|(i, row)| {
        (
            row.get(field).as_f64(),
            predictions.map(|preds| preds[i].label),
        )
    });
    bin_1d(values, bucket_count, None, None)
}

/// Distribution of prediction confidences over `[0, 1]`, by label.
pub fn confidence_distribution(
    predictions: &[Prediction],
    bucket_count: usize,
) -> Result<Vec<Bucket<Category>>> {
    bin_1d(
        predictions.iter().map(|p| (Some(p.confidence), Some(p.label))),
        bucket_count,
        Some(0.0),
        Some(1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn plain(values: &[f64]) -> Vec<(Option<f64>, Option<()>)> {
        values.iter().map(|&v| (Some(v), None)).collect()
    }

    #[test]
    fn confidence_buckets() {
        let buckets = bin_1d(plain(&[0.05, 0.15, 0.95, 0.97]), 10, Some(0.0), Some(1.0)).unwrap();
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 1, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert!((buckets[1].lower_bound - 0.1).abs() < 1e-12);
        assert!(buckets[9].upper_inclusive);
        assert_eq!(buckets[9].upper_bound, 1.0);
    }

    #[test]
    fn max_lands_in_last_bucket() {
        let buckets = bin_1d(plain(&[0.0, 1.0]), 4, None, None).unwrap();
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[3].count, 1);
        assert!(buckets[3].contains(1.0));
        assert!(!buckets[2].contains(1.0));
    }

    #[test]
    fn exact_boundaries_go_up() {
        let buckets = bin_1d(plain(&[0.3, 0.7]), 10, Some(0.0), Some(1.0)).unwrap();
        assert_eq!(buckets[3].count, 1);
        assert_eq!(buckets[7].count, 1);
    }

    #[test]
    fn counts_sum_to_numeric_inputs() {
        let values = vec![
            (Some(3.0), None),
            (None, None),
            (Some(f64::NAN), None),
            (Some(-7.5), None),
            (Some(12.0), None),
            (Some(100.0), None::<()>),
        ];
        for bucket_count in 1..=12 {
            let buckets = bin_1d(values.clone(), bucket_count, Some(0.0), Some(10.0)).unwrap();
            let total: usize = buckets.iter().map(|b| b.count).sum();
            assert_eq!(total, 4, "bucket_count = {bucket_count}");
        }
    }

    #[test]
    fn sub_counts_follow_categories() {
        let values = vec![
            (Some(0.95), Some(Category::Confirmed)),
            (Some(0.91), Some(Category::Confirmed)),
            (Some(0.93), Some(Category::FalsePositive)),
            (Some(0.12), None),
        ];
        let buckets = bin_1d(values, 10, Some(0.0), Some(1.0)).unwrap();
        assert_eq!(buckets[9].count, 3);
        assert_eq!(buckets[9].sub_count(&Category::Confirmed), 2);
        assert_eq!(buckets[9].sub_count(&Category::FalsePositive), 1);
        assert_eq!(buckets[1].count, 1);
        assert!(buckets[1].sub_counts.is_empty());
    }

    #[test]
    fn degenerate_range_is_one_bucket() {
        let buckets = bin_1d(plain(&[5.0, 5.0, 5.0]), 10, None, None).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].lower_bound, 5.0);
        assert_eq!(buckets[0].upper_bound, 5.0);
        assert_eq!(buckets[0].count, 3);

        let empty = bin_1d(plain(&[]), 10, None, None).unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].count, 0);
    }

    #[test]
    fn widest_finite_range_stays_finite() {
        let buckets = bin_1d(plain(&[-1e308, 0.0, 1e308]), 4, None, None).unwrap();
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 0, 1, 1]);
        assert_eq!(buckets[0].lower_bound, -1e308);
        assert_eq!(buckets[3].upper_bound, 1e308);
        assert_eq!(buckets[2].lower_bound, 0.0);
        for pair in buckets.windows(2) {
            assert!(pair[0].lower_bound.is_finite());
            assert!(pair[0].upper_bound <= pair[1].lower_bound);
        }

        let extreme = bin_1d(plain(&[f64::MIN, f64::MAX]), 3, None, None).unwrap();
        assert_eq!(extreme[0].count, 1);
        assert_eq!(extreme[2].count, 1);
        assert!(extreme.iter().all(|b| b.upper_bound.is_finite()));

        let (a, b) = (f64::from_bits(3), f64::from_bits(4));
        let tiny = bin_1d(plain(&[a, b]), 2, None, None).unwrap();
        assert_eq!(tiny.len(), 2);
        assert_eq!(tiny[0].count, 1);
        assert!(tiny[1].contains(b));
    }

    #[test]
    fn zero_buckets_is_an_error() {
        assert_eq!(
            bin_1d(plain(&[1.0]), 0, None, None).unwrap_err(),
            Error::InvalidBucketCount(0)
        );
    }

    #[test]
    fn histogram_of_unknown_field_is_empty() {
        let ds = Dataset::from_rows(vec![Row::new().with("a", 1.0)]);
        assert!(histogram(&ds, "b", None, 5).unwrap().is_empty());
    }

    #[test]
    fn histogram_skips_non_numeric_cells() {
        let ds = Dataset::from_rows(vec![
            Row::new().with("a", "1"),
            Row::new().with("a", "n/a"),
            Row::new().with("a", 3.0),
        ]);
        let preds = vec![
            Prediction::new(Category::Confirmed, 0.9),
            Prediction::new(Category::Candidate, 0.5),
            Prediction::new(Category::Candidate, 0.6),
        ];
        let buckets = histogram(&ds, "a", Some(preds.as_slice()), 2).unwrap();
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[0].sub_count(&Category::Confirmed), 1);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[1].sub_count(&Category::Candidate), 1);
    }
}
