use anyhow::bail;
use clap::Args;
use rusty_koi::analytics::binning::{confidence_distribution, histogram};

use super::DataArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct HistogramArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Numeric field to bin; prediction confidence when omitted
    #[arg(long)]
    pub field: Option<String>,

    /// Number of buckets (defaults to the config value)
    #[arg(long)]
    pub buckets: Option<usize>,
}

pub(crate) fn run(arg: &HistogramArg) -> anyhow::Result<()> {
    let loaded = arg.data.load()?;
    let buckets = match &arg.field {
        Some(field) => histogram(
            &loaded.dataset,
            field,
            loaded.predictions(),
            arg.buckets.unwrap_or(loaded.config.histogram_buckets),
        )?,
        None => {
            let Some(predictions) = loaded.predictions() else {
                bail!("--predictions is required for the confidence distribution");
            };
            confidence_distribution(
                predictions,
                arg.buckets.unwrap_or(loaded.config.confidence_buckets),
            )?
        }
    };
    super::print_json(&buckets)
}
