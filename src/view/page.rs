use std::num::NonZeroUsize;
use std::ops::Range;

use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Paginator
// ---------------------------------------------------------------------------

/// One fixed-size window onto an ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page_index: usize,
    /// Always at least 1, so an empty input is "page 1 of 1".
    pub page_count: usize,
    /// Offset of the first item in the full sequence.
    pub window_start: usize,
    /// One past the offset of the last item.
    pub window_end: usize,
    pub total: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// Number of pages needed for `len` items, never less than 1.
pub fn page_count(len: usize, page_size: usize) -> Result<usize> {
    Ok(page_count_of(len, validate_page_size(page_size)?))
}

pub(crate) fn page_count_of(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

pub(crate) fn validate_page_size(page_size: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(page_size).ok_or(Error::InvalidPageSize(page_size))
}

/// Slice out page `page_index` of `items`.
///
/// `page_index` is taken as given; callers clamp it first. An index past the
/// end yields an empty page positioned at the end of the sequence.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> Result<Page<'_, T>> {
    Ok(paginate_by(items, page_index, validate_page_size(page_size)?))
}

/// [`paginate`] with a page size that is known to be valid.
pub fn paginate_by<T>(items: &[T], page_index: usize, page_size: NonZeroUsize) -> Page<'_, T> {
    let size = page_size.get();
    let window_start = page_index.saturating_mul(size).min(items.len());
    let window_end = window_start.saturating_add(size).min(items.len());

    Page {
        items: &items[window_start..window_end],
        page_index,
        page_count: page_count_of(items.len(), page_size),
        window_start,
        window_end,
        total: items.len(),
    }
}

/// Range of at most `width` page numbers to offer as direct links, keeping
/// the current page centred where possible.
pub fn page_window(page_index: usize, page_count: usize, width: usize) -> Range<usize> {
    let len = width.min(page_count);
    let start = page_index
        .saturating_sub(width / 2)
        .min(page_count.saturating_sub(len));
    start..start + len
}
