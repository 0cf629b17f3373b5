use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::data::filter::filtered_indices;
use crate::data::model::{Dataset, Row};
use crate::data::sort::{SortDirection, sort_indices};
use crate::error::Result;
use crate::view::page::{page_count_of, paginate_by, validate_page_size};

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(15) {
    Some(n) => n,
    None => unreachable!(),
};

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// User-controlled table exploration parameters.
///
/// Treated as a value: every mutation through [`TableView`] replaces the
/// whole state, so a half-applied update is never observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Free-text filter, matched case-insensitively against every cell.
    pub query: String,

    /// Column the rows are ordered by, if any.
    pub sort_field: Option<String>,

    pub sort_direction: SortDirection,

    /// Zero-based page, clamped against the page count when rendering.
    pub page_index: usize,

    pub page_size: NonZeroUsize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        Ok(Self {
            page_size: validate_page_size(page_size)?,
            ..Self::default()
        })
    }
}

// ---------------------------------------------------------------------------
// View result
// ---------------------------------------------------------------------------

/// What the table widget renders for one view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult<'a> {
    pub visible_rows: Vec<&'a Row>,
    /// Dataset indices of `visible_rows`, for joining predictions.
    pub row_indices: Vec<usize>,
    pub total_matching: usize,
    pub page_count: usize,
    /// The page actually shown, after clamping.
    pub page_index: usize,
    pub window_start: usize,
    pub window_end: usize,
}

/// Filter, then sort, then paginate.
///
/// A pure function of the dataset and the view state; nothing is cached
/// between calls.
pub fn compute_view<'a>(dataset: &'a Dataset, state: &ViewState) -> ViewResult<'a> {
    let mut indices = filtered_indices(dataset, &state.query);
    if let Some(field) = &state.sort_field {
        sort_indices(dataset, &mut indices, field, state.sort_direction);
    }

    let page_count = page_count_of(indices.len(), state.page_size);
    let page_index = state.page_index.min(page_count - 1);
    let page = paginate_by(&indices, page_index, state.page_size);

    log::debug!(
        "View: {} of {} rows match {:?}, page {}/{}",
        indices.len(),
        dataset.len(),
        state.query,
        page_index + 1,
        page_count
    );

    let rows = dataset.rows();
    ViewResult {
        visible_rows: page.items.iter().map(|&i| &rows[i]).collect(),
        row_indices: page.items.to_vec(),
        total_matching: indices.len(),
        page_count,
        page_index,
        window_start: page.window_start,
        window_end: page.window_end,
    }
}

// ---------------------------------------------------------------------------
// Table view controller
// ---------------------------------------------------------------------------

/// Owns the view state for one borrowed dataset.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    dataset: &'a Dataset,
    state: ViewState,
}

impl<'a> TableView<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_state(dataset, ViewState::default())
    }

    pub fn with_state(dataset: &'a Dataset, state: ViewState) -> Self {
        Self { dataset, state }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> ViewResult<'a> {
        compute_view(self.dataset, &self.state)
    }

    /// Replace the search text and go back to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.state.query {
            return;
        }
        self.state = ViewState {
            query,
            page_index: 0,
            ..self.state.clone()
        };
    }

    /// Sort by `field`. Choosing the current field again flips the direction,
    /// a new field starts ascending. Always returns to the first page.
    pub fn set_sort(&mut self, field: impl Into<String>) {
        let field = field.into();
        let sort_direction = if self.state.sort_field.as_deref() == Some(field.as_str()) {
            self.state.sort_direction.toggled()
        } else {
            SortDirection::Asc
        };
        self.state = ViewState {
            sort_field: Some(field),
            sort_direction,
            page_index: 0,
            ..self.state.clone()
        };
    }

    /// Drop the sort and restore dataset order.
    pub fn clear_sort(&mut self) {
        self.state = ViewState {
            sort_field: None,
            sort_direction: SortDirection::Asc,
            page_index: 0,
            ..self.state.clone()
        };
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        let page_size = validate_page_size(page_size)?;
        self.state = ViewState {
            page_size,
            page_index: 0,
            ..self.state.clone()
        };
        Ok(())
    }

    /// Jump to a page, clamped to the pages the current filter produces.
    pub fn set_page_index(&mut self, page_index: usize) {
        let page_index = page_index.min(self.page_count() - 1);
        self.state = ViewState {
            page_index,
            ..self.state.clone()
        };
    }

    pub fn next_page(&mut self) {
        self.set_page_index(self.state.page_index.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page_index(self.state.page_index.saturating_sub(1));
    }

    /// Pages produced by the current query, at least 1.
    pub fn page_count(&self) -> usize {
        let matching = filtered_indices(self.dataset, &self.state.query).len();
        page_count_of(matching, self.state.page_size)
    }
}
