use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell – a single raw value in a row
// ---------------------------------------------------------------------------

/// A raw cell as handed over by the upload/parse step.
///
/// Fields may hold numbers or strings interchangeably; the engine decides how
/// to treat a cell at read time through [`Cell::normalize`](crate::data::value).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Cell {
    /// The cell's string form: numbers in their textual rendering, text as-is,
    /// missing as the empty string.
    pub fn text_form(&self) -> Cow<'_, str> {
        match self {
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Text(s) => Cow::Borrowed(s),
            Cell::Missing => Cow::Borrowed(""),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

static MISSING: Cell = Cell::Missing;

// ---------------------------------------------------------------------------
// Row – one record of the dataset
// ---------------------------------------------------------------------------

/// A single record: field name → cell. Absent fields read as [`Cell::Missing`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Cell>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for literal rows.
    pub fn with(mut self, field: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.0.insert(field.into(), cell.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, cell: Cell) {
        self.0.insert(field.into(), cell);
    }

    pub fn get(&self, field: &str) -> &Cell {
        self.0.get(field).unwrap_or(&MISSING)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Rows sharing an ordered schema of unique field names.
///
/// The engine only ever borrows a dataset; nothing in this crate mutates one
/// after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    fields: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from an explicit schema. Duplicate field names are
    /// dropped, keeping the first occurrence.
    pub fn new(fields: Vec<String>, rows: Vec<Row>) -> Self {
        let mut seen = BTreeSet::new();
        let fields = fields
            .into_iter()
            .filter(|f| seen.insert(f.clone()))
            .collect();
        Dataset { fields, rows }
    }

    /// Derive the schema from the rows themselves. Fields appear in the order
    /// rows first introduce them; fields new in the same row are taken in
    /// name order, since a [`Row`] does not remember insertion order. Use
    /// [`Dataset::new`] when the column order is known.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut seen = BTreeSet::new();
        let mut fields = Vec::new();
        for row in &rows {
            for (field, _) in row.cells() {
                if seen.insert(field.to_string()) {
                    fields.push(field.to_string());
                }
            }
        }
        Dataset { fields, rows }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Category – classification outcome
// ---------------------------------------------------------------------------

/// The closed set of labels the inference service assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "CANDIDATE")]
    Candidate,
    #[serde(rename = "FALSE POSITIVE", alias = "FALSE_POSITIVE")]
    FalsePositive,
    #[serde(rename = "NOT EVALUATED", alias = "NOT_EVALUATED", alias = "UNEVALUATED")]
    Unevaluated,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Confirmed,
        Category::Candidate,
        Category::FalsePositive,
        Category::Unevaluated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Confirmed => "CONFIRMED",
            Category::Candidate => "CANDIDATE",
            Category::FalsePositive => "FALSE POSITIVE",
            Category::Unevaluated => "NOT EVALUATED",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category label: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', " ").as_str() {
            "CONFIRMED" => Ok(Category::Confirmed),
            "CANDIDATE" => Ok(Category::Candidate),
            "FALSE POSITIVE" => Ok(Category::FalsePositive),
            "NOT EVALUATED" | "UNEVALUATED" => Ok(Category::Unevaluated),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction – one model output, index-aligned with a row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(alias = "prediction")]
    pub label: Category,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub probabilities: BTreeMap<Category, f64>,
}

impl Prediction {
    pub fn new(label: Category, confidence: f64) -> Self {
        Prediction {
            label,
            confidence,
            probabilities: BTreeMap::new(),
        }
    }

    /// Whether the class probabilities sum to 1 within `epsilon`.
    /// An empty probability map is accepted.
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        if self.probabilities.is_empty() {
            return true;
        }
        let total: f64 = self.probabilities.values().sum();
        (total - 1.0).abs() <= epsilon
    }
}

/// Return the predictions only if they line up one-to-one with the rows.
///
/// A missing or mismatched array is treated as "no predictions"; every
/// prediction-derived metric then reports zero.
pub fn align_predictions<'a>(
    dataset: &Dataset,
    predictions: Option<&'a [Prediction]>,
) -> Option<&'a [Prediction]> {
    let preds = predictions?;
    if preds.len() != dataset.len() {
        log::warn!(
            "Ignoring {} predictions for a dataset of {} rows",
            preds.len(),
            dataset.len()
        );
        return None;
    }
    Some(preds)
}
