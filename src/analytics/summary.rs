//! Headline metrics over a dataset and its predictions.
//!
//! Everything here is recomputed from scratch on every call. Ratios with an
//! empty denominator report 0 rather than NaN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::model::{Category, Dataset, Prediction, align_predictions};
use crate::data::value::Value;

/// Which labels and fields the summary is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Label counted as a discovery.
    pub positive: Category,
    /// Label that competes with `positive` in the reliability rate.
    pub ambiguous: Category,
    /// Confidence strictly above this counts as high confidence.
    pub high_confidence_threshold: f64,
    /// A row is complete when none of these fields is missing.
    pub required_fields: Vec<String>,
    /// Numeric fields to average.
    pub average_fields: Vec<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            positive: Category::Confirmed,
            ambiguous: Category::Candidate,
            high_confidence_threshold: 0.8,
            required_fields: vec!["koi_period".to_string(), "koi_prad".to_string()],
            average_fields: vec!["koi_teq".to_string(), "koi_period".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub category_counts: BTreeMap<Category, usize>,
    pub average_confidence: f64,
    pub high_confidence_rate: f64,
    pub discovery_rate: f64,
    pub reliability_rate: f64,
    pub completeness_rate: f64,
    /// `None` when no row holds a numeric value for the field.
    pub field_averages: BTreeMap<String, Option<f64>>,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Compute the summary record.
///
/// Predictions that do not line up with the rows are ignored, in which case
/// every prediction-derived metric is 0 and `category_counts` is empty.
pub fn summarize(
    dataset: &Dataset,
    predictions: Option<&[Prediction]>,
    options: &SummaryOptions,
) -> Summary {
    let total_count = dataset.len();
    let predictions = align_predictions(dataset, predictions).unwrap_or_default();

    let mut category_counts: BTreeMap<Category, usize> = BTreeMap::new();
    for p in predictions {
        *category_counts.entry(p.label).or_insert(0) += 1;
    }
    let count_of = |c: Category| category_counts.get(&c).copied().unwrap_or(0);
    let positive = count_of(options.positive);
    let ambiguous = count_of(options.ambiguous);

    let high_confidence = predictions
        .iter()
        .filter(|p| p.confidence > options.high_confidence_threshold)
        .count();

    let complete = dataset
        .rows()
        .iter()
        .filter(|row| {
            options
                .required_fields
                .iter()
                .all(|field| !row.get(field).is_missing())
        })
        .count();

    let field_averages = options
        .average_fields
        .iter()
        .map(|field| {
            let avg = mean(dataset.rows().iter().filter_map(|row| row.get(field).as_f64()));
            (field.clone(), avg)
        })
        .collect();

    let summary = Summary {
        total_count,
        average_confidence: mean(predictions.iter().map(|p| p.confidence)).unwrap_or(0.0),
        high_confidence_rate: ratio(high_confidence, predictions.len()),
        discovery_rate: if predictions.is_empty() {
            0.0
        } else {
            ratio(positive, total_count)
        },
        reliability_rate: ratio(positive, positive + ambiguous),
        completeness_rate: ratio(complete, total_count),
        category_counts,
        field_averages,
    };
    log::debug!(
        "Summary over {total_count} rows: discovery {:.3}, reliability {:.3}",
        summary.discovery_rate,
        summary.reliability_rate
    );
    summary
}

// ---------------------------------------------------------------------------
// Per-category breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub count: usize,
    /// Fraction of all predictions carrying this label.
    pub share: f64,
    pub average_confidence: f64,
}

/// Count, share and mean confidence for each label that occurs.
pub fn category_breakdown(predictions: &[Prediction]) -> Vec<CategoryStats> {
    let mut grouped: BTreeMap<Category, (usize, f64)> = BTreeMap::new();
    for p in predictions {
        let entry = grouped.entry(p.label).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += p.confidence;
    }
    grouped
        .into_iter()
        .map(|(category, (count, confidence_sum))| CategoryStats {
            category,
            count,
            share: ratio(count, predictions.len()),
            average_confidence: confidence_sum / count as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProfile {
    pub field: String,
    pub numeric_count: usize,
    pub text_count: usize,
    pub missing_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Describe one field's contents. `None` if the field is not in the schema.
pub fn field_profile(dataset: &Dataset, field: &str) -> Option<FieldProfile> {
    if !dataset.has_field(field) {
        return None;
    }
    let mut profile = FieldProfile {
        field: field.to_string(),
        numeric_count: 0,
        text_count: 0,
        missing_count: 0,
        min: None,
        max: None,
        mean: None,
    };
    let mut sum = 0.0;
    for row in dataset.rows() {
        match row.get(field).normalize() {
            Value::Numeric(n) => {
                profile.numeric_count += 1;
                sum += n;
                profile.min = Some(profile.min.map_or(n, |m| m.min(n)));
                profile.max = Some(profile.max.map_or(n, |m| m.max(n)));
            }
            Value::Text(_) => profile.text_count += 1,
            Value::Missing => profile.missing_count += 1,
        }
    }
    if profile.numeric_count > 0 {
        profile.mean = Some(sum / profile.numeric_count as f64);
    }
    Some(profile)
}
