use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use super::model::{Category, Dataset, Prediction, Row, align_predictions};

// ---------------------------------------------------------------------------
// Export of the dataset together with its predictions
// ---------------------------------------------------------------------------

/// Write to `path`, choosing the format from the extension (`.csv` or `.json`).
pub fn export_file(path: &Path, dataset: &Dataset, predictions: Option<&[Prediction]>) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let write: fn(&Dataset, Option<&[Prediction]>, BufWriter<File>) -> Result<()> =
        match ext.as_str() {
            "csv" => write_csv,
            "json" => write_json,
            other => bail!("Unsupported export extension: .{other}"),
        };

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write(dataset, predictions, BufWriter::new(file))?;
    log::info!("Exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn probability_column(category: Category) -> String {
    format!("prob_{}", category.as_str().replace(' ', "_"))
}

/// CSV with the original fields followed by `prediction`, `confidence` and
/// one `prob_<LABEL>` column per label. Prediction columns are only written
/// when the predictions line up with the rows.
pub fn write_csv<W: Write>(
    dataset: &Dataset,
    predictions: Option<&[Prediction]>,
    writer: W,
) -> Result<()> {
    let predictions = align_predictions(dataset, predictions);
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = dataset.fields().to_vec();
    if predictions.is_some() {
        header.push("prediction".to_string());
        header.push("confidence".to_string());
        header.extend(Category::ALL.iter().map(|&c| probability_column(c)));
    }
    out.write_record(&header).context("writing CSV header")?;

    for (i, row) in dataset.rows().iter().enumerate() {
        let mut record: Vec<String> = dataset
            .fields()
            .iter()
            .map(|f| row.get(f).text_form().into_owned())
            .collect();
        if let Some(preds) = predictions {
            let p = &preds[i];
            record.push(p.label.to_string());
            record.push(p.confidence.to_string());
            record.extend(Category::ALL.iter().map(|c| {
                p.probabilities
                    .get(c)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }));
        }
        out.write_record(&record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    predictions: &'a [Prediction],
    total_samples: usize,
    original_data: &'a [Row],
}

/// JSON in the inference service's response shape:
/// `{ "predictions": [...], "total_samples": n, "original_data": [...] }`.
pub fn write_json<W: Write>(
    dataset: &Dataset,
    predictions: Option<&[Prediction]>,
    writer: W,
) -> Result<()> {
    let doc = ExportDocument {
        predictions: align_predictions(dataset, predictions).unwrap_or_default(),
        total_samples: dataset.len(),
        original_data: dataset.rows(),
    };
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, &doc).context("writing JSON export")?;
    writer.flush().context("flushing JSON export")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_predictions, read_csv};
    use crate::data::model::Cell;

    fn sample() -> (Dataset, Vec<Prediction>) {
        let ds = Dataset::new(
            vec!["name".into(), "period".into()],
            vec![
                Row::new().with("name", "K1").with("period", 9.5),
                Row::new().with("name", "K2").with("period", Cell::Missing),
            ],
        );
        let mut p = Prediction::new(Category::Confirmed, 0.9);
        p.probabilities.insert(Category::Confirmed, 0.9);
        p.probabilities.insert(Category::FalsePositive, 0.1);
        (ds, vec![p, Prediction::new(Category::Candidate, 0.4)])
    }

    #[test]
    fn csv_appends_prediction_columns() {
        let (ds, preds) = sample();
        let mut buf = Vec::new();
        write_csv(&ds, Some(preds.as_slice()), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "name,period,prediction,confidence,prob_CONFIRMED,prob_CANDIDATE,\
                 prob_FALSE_POSITIVE,prob_NOT_EVALUATED"
            )
        );
        assert_eq!(lines.next(), Some("K1,9.5,CONFIRMED,0.9,0.9,,0.1,"));
        assert_eq!(lines.next(), Some("K2,,CANDIDATE,0.4,,,,"));
    }

    #[test]
    fn csv_without_predictions_round_trips_fields() {
        let (ds, _) = sample();
        let mut buf = Vec::new();
        write_csv(&ds, None, &mut buf).unwrap();
        let back = read_csv(buf.as_slice()).unwrap();
        assert_eq!(back.fields(), ds.fields());
        assert_eq!(back.rows()[0].get("period").as_f64(), Some(9.5));
        assert!(back.rows()[1].get("period").is_missing());
    }

    #[test]
    fn json_export_is_readable_as_predictions() {
        let (ds, preds) = sample();
        let mut buf = Vec::new();
        write_json(&ds, Some(preds.as_slice()), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(parse_predictions(&text).unwrap(), preds);
        assert!(text.contains("\"total_samples\": 2"));
    }
}
