use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rusty_koi::data::model::{Category, Prediction};

const ROWS: usize = 500;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Log-uniform sample in `[lo, hi)`.
    fn log_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (lo.ln() + self.next_f64() * (hi.ln() - lo.ln())).exp()
    }

    /// `None` with probability `p`.
    fn maybe<T>(&mut self, p: f64, value: T) -> Option<T> {
        (self.next_f64() >= p).then_some(value)
    }
}

/// Catalogue disposition, loosely tied to planet size like the real catalogue.
fn disposition(rng: &mut SimpleRng, prad: f64) -> Category {
    let roll = rng.next_f64();
    match prad {
        r if r > 15.0 && roll < 0.7 => Category::FalsePositive,
        _ if roll < 0.35 => Category::Confirmed,
        _ if roll < 0.65 => Category::Candidate,
        _ => Category::FalsePositive,
    }
}

/// A classifier that agrees with the catalogue most of the time.
fn predict(rng: &mut SimpleRng, truth: Category) -> Prediction {
    let labels = [Category::Confirmed, Category::Candidate, Category::FalsePositive];
    let weights: Vec<f64> = labels
        .iter()
        .map(|&c| rng.next_f64() + if c == truth { 1.5 } else { 0.0 })
        .collect();
    let total: f64 = weights.iter().sum();

    let probabilities: BTreeMap<Category, f64> = labels
        .iter()
        .zip(&weights)
        .map(|(&c, &w)| (c, w / total))
        .collect();
    let (label, confidence) = probabilities
        .iter()
        .fold((truth, 0.0), |best, (&c, &p)| if p > best.1 { (c, p) } else { best });

    Prediction {
        label,
        confidence,
        probabilities,
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut names = Vec::with_capacity(ROWS);
    let mut periods = Vec::with_capacity(ROWS);
    let mut radii = Vec::with_capacity(ROWS);
    let mut temps = Vec::with_capacity(ROWS);
    let mut dispositions = Vec::with_capacity(ROWS);
    let mut predictions = Vec::with_capacity(ROWS);

    for i in 0..ROWS {
        let period = rng.log_uniform(0.5, 2000.0);
        let prad = rng.log_uniform(0.3, 30.0);
        // Equilibrium temperature falls off with orbital distance.
        let teq = 1800.0 * period.powf(-1.0 / 3.0) + rng.next_f64() * 50.0;
        let truth = disposition(&mut rng, prad);

        names.push(format!("K{:05}.01", 752 + i));
        periods.push(rng.maybe(0.02, period));
        radii.push(rng.maybe(0.05, prad));
        temps.push(rng.maybe(0.1, teq));
        dispositions.push(truth.as_str());
        predictions.push(predict(&mut rng, truth));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("kepoi_name", DataType::Utf8, false),
        Field::new("koi_period", DataType::Float64, true),
        Field::new("koi_prad", DataType::Float64, true),
        Field::new("koi_teq", DataType::Float64, true),
        Field::new("koi_disposition", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(names)),
            Arc::new(Float64Array::from(periods)),
            Arc::new(Float64Array::from(radii)),
            Arc::new(Float64Array::from(temps)),
            Arc::new(StringArray::from(dispositions)),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let data_path = "sample_koi.parquet";
    let file = std::fs::File::create(data_path).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;

    let predictions_path = "sample_predictions.json";
    let file = std::fs::File::create(predictions_path)
        .context("Failed to create predictions file")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &predictions)
        .context("Failed to write predictions")?;

    println!("Wrote {ROWS} objects to {data_path} and their predictions to {predictions_path}");
    Ok(())
}
