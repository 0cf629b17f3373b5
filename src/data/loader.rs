use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Cell, Dataset, Prediction, Row};

/// Tolerance for a prediction's probabilities to count as summing to 1.
pub const PROBABILITY_EPSILON: f64 = 1e-3;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with field names, one row per record
/// * `.json`    – `[{ "field": value, ... }, ...]`
/// * `.parquet` – scalar columns (strings, ints, floats, bools)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} rows with fields {:?} from {}",
        dataset.len(),
        dataset.fields(),
        path.display()
    );
    Ok(dataset)
}

/// Load predictions produced by the inference service.
///
/// Accepts either a bare JSON array or the service response object with a
/// `predictions` key.
pub fn load_predictions(path: &Path) -> Result<Vec<Prediction>> {
    let text = std::fs::read_to_string(path).context("reading predictions file")?;
    parse_predictions(&text)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PredictionFile {
    Bare(Vec<Prediction>),
    Response { predictions: Vec<Prediction> },
}

pub fn parse_predictions(text: &str) -> Result<Vec<Prediction>> {
    let file: PredictionFile = serde_json::from_str(text).context("parsing predictions JSON")?;
    let predictions = match file {
        PredictionFile::Bare(p) | PredictionFile::Response { predictions: p } => p,
    };

    let unnormalized = predictions
        .iter()
        .filter(|p| !p.is_normalized(PROBABILITY_EPSILON))
        .count();
    if unnormalized > 0 {
        log::warn!("{unnormalized} predictions have probabilities that do not sum to 1");
    }
    Ok(predictions)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "kepoi_name": "K00752.01", "koi_period": 9.48, "koi_prad": 2.26 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    // Object keys iterate in file order (`preserve_order`).
    let mut fields = Vec::new();
    let mut seen = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if seen.insert(key.as_str()) {
                fields.push(key.clone());
            }
        }
        rows.push(
            obj.iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect::<Row>(),
        );
    }

    Ok(Dataset::new(fields, rows))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => Cell::Number(f),
            None => Cell::Text(n.to_string()),
        },
        JsonValue::Bool(b) => Cell::Text(b.to_string()),
        JsonValue::Null => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with field names, then one record per row.
/// Empty cells are missing, everything else is kept verbatim as text so the
/// normalizer sees the original spelling of numbers. Short records are
/// padded with missing cells.
fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {row_no}: {} values for {} columns",
                record.len(),
                headers.len()
            );
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let cell = match record.get(col_idx) {
                    None | Some("") => Cell::Missing,
                    Some(value) => Cell::Text(value.to_string()),
                };
                (name.clone(), cell)
            })
            .collect();
        rows.push(row);
    }

    Ok(Dataset::new(headers, rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rendered as text.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let fields: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells: Row = fields
                .iter()
                .enumerate()
                .map(|(col_idx, name)| (name.clone(), extract_cell(batch.column(col_idx), row)))
                .collect();
            rows.push(cells);
        }
    }

    Ok(Dataset::new(fields, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| Cell::Text(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| Cell::Text(s.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Cell::Number(f64::from(a.value(row)))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Cell::Number(f64::from(a.value(row)))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Cell::Number(a.value(row))),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|a| Cell::Text(a.value(row).to_string())),
        _ => None,
    };
    cell.unwrap_or_else(|| match array_value_to_string(col.as_ref(), row) {
        Ok(s) => Cell::Text(s),
        Err(e) => {
            log::warn!("Unreadable {:?} value at row {row}: {e}", col.data_type());
            Cell::Missing
        }
    })
}
