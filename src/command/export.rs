use std::path::PathBuf;

use clap::Args;
use rusty_koi::data::export::export_file;

use super::DataArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct ExportArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Output file; `.csv` or `.json`
    #[arg(long)]
    pub output: PathBuf,
}

pub(crate) fn run(arg: &ExportArg) -> anyhow::Result<()> {
    let loaded = arg.data.load()?;
    export_file(&arg.output, &loaded.dataset, loaded.predictions())
}
