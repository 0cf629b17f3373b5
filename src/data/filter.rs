use super::model::{Cell, Dataset, Row};

// ---------------------------------------------------------------------------
// Free-text row filter
// ---------------------------------------------------------------------------

/// Does any cell of `row` contain `query`, ignoring case?
///
/// Cells are matched on their string form: numbers as their textual
/// rendering, missing cells as the empty string. The empty query matches
/// every row.
pub fn matches(row: &Row, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    any_cell_contains(row.cells().map(|(_, cell)| cell), &needle)
}

fn any_cell_contains<'c>(cells: impl IntoIterator<Item = &'c Cell>, needle: &str) -> bool {
    cells
        .into_iter()
        .any(|cell| cell.text_form().to_lowercase().contains(needle))
}

/// Return indices of rows, in dataset order, that match `query`.
pub fn filtered_indices(dataset: &Dataset, query: &str) -> Vec<usize> {
    filter_indices(dataset, 0..dataset.len(), query)
}

/// Narrow an existing selection of row indices to those matching `query`.
///
/// Only the dataset's schema fields are searched; keys a row carries outside
/// the schema are never displayed and never match.
pub fn filter_indices<I>(dataset: &Dataset, indices: I, query: &str) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let rows = dataset.rows();
    if query.is_empty() {
        return indices.into_iter().filter(|&i| i < rows.len()).collect();
    }
    // Fold once instead of per row.
    let needle = query.to_lowercase();
    let fields = dataset.fields();
    indices
        .into_iter()
        .filter(|&i| {
            rows.get(i).is_some_and(|row| {
                any_cell_contains(fields.iter().map(|f| row.get(f)), &needle)
            })
        })
        .collect()
}
