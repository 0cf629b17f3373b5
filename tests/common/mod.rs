#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusty_koi::{Category, Cell, Dataset, Prediction, Row};

/// Small catalogue with every value kind in `koi_period` and `koi_prad`.
pub fn koi_dataset() -> Dataset {
    let rows = vec![
        koi("K00752.01", "9.488", "2.26", "CONFIRMED"),
        koi("K00752.02", "54.418", "2.83", "CONFIRMED"),
        koi("K00753.01", "19.899", "14.6", "CANDIDATE"),
        koi("K00754.01", "1.737", "33.46", "FALSE POSITIVE"),
        koi("K00755.01", "2.526", "2.75", "CONFIRMED"),
        koi("K00756.01", "", "3.90", "CANDIDATE"),
        koi("K00756.02", "15.834", "n/a", "CANDIDATE"),
        koi("K00757.01", "16.068", "", "FALSE POSITIVE"),
    ];
    Dataset::new(
        vec![
            "kepoi_name".to_string(),
            "koi_period".to_string(),
            "koi_prad".to_string(),
            "koi_disposition".to_string(),
        ],
        rows,
    )
}

fn koi(name: &str, period: &str, prad: &str, disposition: &str) -> Row {
    let cell = |s: &str| if s.is_empty() { Cell::Missing } else { Cell::from(s) };
    Row::new()
        .with("kepoi_name", name)
        .with("koi_period", cell(period))
        .with("koi_prad", cell(prad))
        .with("koi_disposition", disposition)
}

/// One prediction per row of [`koi_dataset`].
pub fn koi_predictions() -> Vec<Prediction> {
    [
        (Category::Confirmed, 0.95),
        (Category::Confirmed, 0.85),
        (Category::Candidate, 0.6),
        (Category::FalsePositive, 0.9),
        (Category::Candidate, 0.55),
        (Category::Candidate, 0.7),
        (Category::Confirmed, 0.81),
        (Category::FalsePositive, 0.4),
    ]
    .into_iter()
    .map(|(label, confidence)| Prediction::new(label, confidence))
    .collect()
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn column(dataset: &Dataset, rows: &[&Row], field: &str) -> Vec<String> {
    debug_assert!(dataset.has_field(field));
    rows.iter()
        .map(|row| row.get(field).text_form().into_owned())
        .collect()
}
