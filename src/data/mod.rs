//! Data layer: core types, loading, normalization, filtering and sorting.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet          predictions .json
//!        │                                 │
//!        ▼                                 ▼
//!   ┌──────────┐                    ┌──────────────┐
//!   │  loader   │  parse file →     │ Vec<Prediction>│
//!   └──────────┘     Dataset        └──────────────┘
//!        │                                 │
//!        ▼                                 │
//!   ┌──────────┐                           │
//!   │  Dataset  │  Vec<Row>, schema  ◄─────┘ align_predictions
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐     ┌──────────┐
//!   │  filter   │ ──► │   sort    │  row indices, value-kind aware
//!   └──────────┘     └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sort;
pub mod value;
