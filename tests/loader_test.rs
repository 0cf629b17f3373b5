mod common;

use std::sync::Arc;

use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rusty_koi::analytics::summary::{SummaryOptions, summarize};
use rusty_koi::data::export::export_file;
use rusty_koi::data::loader::{load_file, load_predictions};
use rusty_koi::{AnalyticsConfig, Category, Cell};
use tempfile::TempDir;

use common::{koi_dataset, koi_predictions, write_file};

#[test]
fn test_load_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "koi.csv",
        "kepoi_name, koi_period ,koi_prad\nK00752.01,9.488,2.26\nK00753.01,,n/a\n",
    );
    let dataset = load_file(&path).unwrap();
    assert_eq!(dataset.fields(), ["kepoi_name", "koi_period", "koi_prad"]);
    assert_eq!(dataset.rows()[0].get("koi_period").as_f64(), Some(9.488));
    assert!(dataset.rows()[1].get("koi_period").is_missing());
    assert_eq!(dataset.rows()[1].get("koi_prad"), &Cell::from("n/a"));
}

#[test]
fn test_load_json_file_collects_fields_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "koi.JSON",
        r#"[{"kepoi_name": "K1", "koi_period": 9.5, "a_flag": 1},
            {"kepoi_name": "K2", "koi_prad": 2.0}]"#,
    );
    let dataset = load_file(&path).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.fields(),
        ["kepoi_name", "koi_period", "a_flag", "koi_prad"]
    );
    assert!(dataset.rows()[0].get("koi_prad").is_missing());
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "koi.xlsx", "");
    assert!(load_file(&path).is_err());
    assert!(load_file(&dir.path().join("absent.csv")).is_err());
}

#[test]
fn test_load_parquet_file() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("kepoi_name", DataType::Utf8, false),
        Field::new("koi_period", DataType::Float64, true),
        Field::new("koi_tce_plnt_num", DataType::Int64, false),
        Field::new("koi_fpflag_nt", DataType::Boolean, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["K00752.01", "K00752.02"])),
            Arc::new(Float64Array::from(vec![Some(9.488), None])),
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(BooleanArray::from(vec![false, true])),
        ],
    )
    .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("koi.parquet");
    let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let dataset = load_file(&path).unwrap();
    assert_eq!(
        dataset.fields(),
        ["kepoi_name", "koi_period", "koi_tce_plnt_num", "koi_fpflag_nt"]
    );
    let rows = dataset.rows();
    assert_eq!(rows[0].get("koi_period"), &Cell::Number(9.488));
    assert!(rows[1].get("koi_period").is_missing());
    assert_eq!(rows[1].get("koi_tce_plnt_num"), &Cell::Number(2.0));
    assert_eq!(rows[1].get("koi_fpflag_nt"), &Cell::from("true"));
}

#[test]
fn test_load_predictions_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "predictions.json",
        r#"{"predictions": [
              {"prediction": "CONFIRMED", "confidence": 0.9,
               "probabilities": {"CONFIRMED": 0.9, "CANDIDATE": 0.1}},
              {"prediction": "FALSE_POSITIVE", "confidence": 0.6}
            ],
            "total_samples": 2}"#,
    );
    let predictions = load_predictions(&path).unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].probabilities[&Category::Candidate], 0.1);
    assert_eq!(predictions[1].label, Category::FalsePositive);
}

#[test]
fn test_export_then_reload() {
    let dataset = koi_dataset();
    let predictions = koi_predictions();
    let dir = TempDir::new().unwrap();

    let csv_path = dir.path().join("export.csv");
    export_file(&csv_path, &dataset, Some(predictions.as_slice())).unwrap();
    let exported = load_file(&csv_path).unwrap();
    assert_eq!(exported.len(), dataset.len());
    assert_eq!(&exported.fields()[..4], dataset.fields());
    assert_eq!(exported.fields()[4], "prediction");
    assert_eq!(exported.rows()[3].get("prediction"), &Cell::from("FALSE POSITIVE"));
    assert!(exported.rows()[5].get("koi_period").is_missing());

    let json_path = dir.path().join("export.json");
    export_file(&json_path, &dataset, Some(predictions.as_slice())).unwrap();
    let reloaded = load_predictions(&json_path).unwrap();
    assert_eq!(reloaded, predictions);

    // The summary over reloaded data matches the original.
    let options = SummaryOptions::default();
    let before = summarize(&dataset, Some(predictions.as_slice()), &options);
    let after = summarize(&exported, Some(reloaded.as_slice()), &options);
    assert_eq!(before.category_counts, after.category_counts);
    assert_eq!(before.completeness_rate, after.completeness_rate);

    assert!(export_file(&dir.path().join("export.txt"), &dataset, None).is_err());
}

#[test]
fn test_config_file_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "config.json",
        r#"{"page_size": 50, "rate_thresholds": {"high": 0.9}}"#,
    );
    let config = AnalyticsConfig::load_or_default(Some(path.as_path())).unwrap();
    assert_eq!(config.page_size, 50);
    assert_eq!(config.rate_thresholds.high, 0.9);
    assert_eq!(config.rate_thresholds.medium, 0.3);
    assert_eq!(config.histogram_buckets, 10);

    let broken = write_file(dir.path(), "broken.json", "{ page_size: ");
    assert!(AnalyticsConfig::load(&broken).is_err());
}
