use clap::Args;
use rusty_koi::analytics::heatmap::{HeatmapGrid, RateTier, heatmap};
use serde::Serialize;

use super::DataArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct HeatmapArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Field for the x axis (defaults to the config value)
    #[arg(long)]
    pub x_field: Option<String>,

    /// Field for the y axis (defaults to the config value)
    #[arg(long)]
    pub y_field: Option<String>,
}

#[derive(Serialize)]
struct HeatmapReport {
    #[serde(flatten)]
    grid: HeatmapGrid,
    /// Colour tier of each cell, laid out like `cells`.
    tiers: Vec<Vec<RateTier>>,
}

pub(crate) fn run(arg: &HeatmapArg) -> anyhow::Result<()> {
    let loaded = arg.data.load()?;
    let config = &loaded.config;

    let mut spec = config.heatmap.clone();
    if let Some(x) = &arg.x_field {
        spec.x_field = x.clone();
    }
    if let Some(y) = &arg.y_field {
        spec.y_field = y.clone();
    }

    let grid = heatmap(
        &loaded.dataset,
        loaded.predictions(),
        &spec,
        config.summary.positive,
    );
    if grid.dropped > 0 {
        log::info!("{} rows fell outside the heatmap edges", grid.dropped);
    }
    let tiers = grid
        .cells
        .iter()
        .map(|row| row.iter().map(|c| c.tier(&config.rate_thresholds)).collect())
        .collect();
    super::print_json(&HeatmapReport { grid, tiers })
}
