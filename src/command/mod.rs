use std::io::{self, Write as _};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rusty_koi::AnalyticsConfig;
use rusty_koi::data::loader;
use rusty_koi::data::model::{Dataset, Prediction};

use self::{
    export::ExportArg, heatmap::HeatmapArg, histogram::HistogramArg, summary::SummaryArg,
    view::ViewArg,
};

mod export;
mod heatmap;
mod histogram;
mod summary;
mod view;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Filter, sort and page through the dataset
    View(#[clap(flatten)] ViewArg),
    /// Headline rates, per-label breakdown and field profiles
    Summary(#[clap(flatten)] SummaryArg),
    /// Histogram of a field, or of prediction confidence
    Histogram(#[clap(flatten)] HistogramArg),
    /// Cross two fields into a grid of counts and match rates
    Heatmap(#[clap(flatten)] HeatmapArg),
    /// Write the dataset with its predictions to CSV or JSON
    Export(#[clap(flatten)] ExportArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::View(arg) => view::run(&arg)?,
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Histogram(arg) => histogram::run(&arg)?,
        Mode::Heatmap(arg) => heatmap::run(&arg)?,
        Mode::Export(arg) => export::run(&arg)?,
    }
    Ok(())
}

/// Inputs shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct DataArg {
    /// Dataset file (.csv, .json or .parquet)
    pub data: PathBuf,

    /// Predictions JSON, one entry per dataset row
    #[arg(long)]
    pub predictions: Option<PathBuf>,

    /// Analytics config JSON
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub(crate) struct Loaded {
    pub dataset: Dataset,
    pub predictions: Option<Vec<Prediction>>,
    pub config: AnalyticsConfig,
}

impl Loaded {
    pub fn predictions(&self) -> Option<&[Prediction]> {
        self.predictions.as_deref()
    }
}

impl DataArg {
    pub fn load(&self) -> anyhow::Result<Loaded> {
        let config = AnalyticsConfig::load_or_default(self.config.as_deref())?;
        let dataset = loader::load_file(&self.data)
            .with_context(|| format!("Failed to load dataset: {}", self.data.display()))?;
        let predictions = self
            .predictions
            .as_deref()
            .map(|path| {
                loader::load_predictions(path).with_context(|| {
                    format!("Failed to load predictions: {}", path.display())
                })
            })
            .transpose()?;
        Ok(Loaded {
            dataset,
            predictions,
            config,
        })
    }
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write JSON to stdout")?;
    writeln!(stdout).context("Failed to write newline to stdout")?;
    Ok(())
}
