use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::{Cell, Dataset};
use super::value::Value;

// ---------------------------------------------------------------------------
// Sort direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Type-aware comparison
// ---------------------------------------------------------------------------

/// Rank of a value kind in a mixed column. Numbers come first, then text,
/// then missing cells; the sort direction never moves a value across kinds.
fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Numeric(_) => 0,
        Value::Text(_) => 1,
        Value::Missing => 2,
    }
}

/// Compare two cells for sorting.
///
/// Two numeric cells compare by value, two text cells compare by their string
/// form (code-point order, case-sensitive). Across kinds the order is fixed:
/// numeric < text < missing in both directions.
pub fn compare(a: &Cell, b: &Cell, direction: SortDirection) -> Ordering {
    compare_values(a.normalize(), b.normalize(), direction)
}

/// [`compare`] on values that are already normalized.
pub fn compare_values(a: Value<'_>, b: Value<'_>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Value::Numeric(x), Value::Numeric(y)) => {
            direction.apply(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
        }
        (Value::Text(x), Value::Text(y)) => direction.apply(x.cmp(y)),
        (Value::Missing, Value::Missing) => Ordering::Equal,
        _ => kind_rank(&a).cmp(&kind_rank(&b)),
    }
}

/// Stable in-place sort of row indices by `field`.
///
/// Rows that compare equal keep their relative order. Sorting by a field
/// outside the schema leaves the order untouched.
pub fn sort_indices(dataset: &Dataset, indices: &mut [usize], field: &str, direction: SortDirection) {
    if !dataset.has_field(field) {
        log::debug!("Sort field {field:?} not in schema, keeping order");
        return;
    }
    let rows = dataset.rows();
    // Each key is normalized once, not once per comparison.
    let mut keyed: Vec<(usize, Value<'_>)> = indices
        .iter()
        .map(|&i| (i, rows[i].get(field).normalize()))
        .collect();
    // `sort_by` is a stable merge sort.
    keyed.sort_by(|a, b| compare_values(a.1, b.1, direction));
    for (slot, (i, _)) in indices.iter_mut().zip(keyed) {
        *slot = i;
    }
}
