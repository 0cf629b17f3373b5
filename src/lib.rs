//! In-memory table view and aggregation engine for exoplanet candidate
//! catalogues and the predictions made over them.
//!
//! - [`data`]: cells, rows, datasets, loading, filtering and sorting
//! - [`view`]: pagination and the table view controller
//! - [`analytics`]: histograms, heatmaps and summary statistics
//! - [`config`]: tunables loaded from JSON

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod view;

pub use config::AnalyticsConfig;
pub use data::model::{Category, Cell, Dataset, Prediction, Row};
pub use error::{Error, Result};
pub use view::state::{TableView, ViewResult, ViewState, compute_view};
