use clap::Args;
use rusty_koi::analytics::summary::{
    CategoryStats, FieldProfile, Summary, category_breakdown, field_profile, summarize,
};
use rusty_koi::data::model::align_predictions;
use serde::Serialize;

use super::DataArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Fields to profile (comma-separated); every field when omitted
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,
}

#[derive(Serialize)]
struct SummaryReport {
    summary: Summary,
    breakdown: Vec<CategoryStats>,
    profiles: Vec<FieldProfile>,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let loaded = arg.data.load()?;
    let dataset = &loaded.dataset;
    let predictions = loaded.predictions();

    let fields = if arg.fields.is_empty() {
        dataset.fields()
    } else {
        arg.fields.as_slice()
    };
    let profiles = fields
        .iter()
        .filter_map(|field| {
            let profile = field_profile(dataset, field);
            if profile.is_none() {
                log::warn!("Field {field:?} not in dataset");
            }
            profile
        })
        .collect();

    let report = SummaryReport {
        summary: summarize(dataset, predictions, &loaded.config.summary),
        breakdown: align_predictions(dataset, predictions)
            .map(category_breakdown)
            .unwrap_or_default(),
        profiles,
    };
    super::print_json(&report)
}
