//! Derived statistics for the analytics dashboard.
//!
//! - [`binning`]: equal-width histograms with per-label sub-counts
//! - [`heatmap`]: 2-D grids of counts and match counts
//! - [`summary`]: headline rates, per-label breakdown, field profiles
//!
//! All aggregates are plain values computed fresh from a borrowed dataset.

pub mod binning;
pub mod heatmap;
pub mod summary;
