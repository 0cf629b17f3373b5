use std::fmt::Write as _;

use clap::Args;
use rusty_koi::data::model::align_predictions;
use rusty_koi::data::sort::SortDirection;
use rusty_koi::data::value::format_cell;
use rusty_koi::view::page::page_window;
use rusty_koi::{TableView, ViewResult, ViewState};

use super::{DataArg, Loaded};

#[derive(Debug, Clone, Args)]
pub(crate) struct ViewArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Case-insensitive text filter applied to every cell
    #[arg(long, default_value = "")]
    pub query: String,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to the config value)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Print the view as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub(crate) fn run(arg: &ViewArg) -> anyhow::Result<()> {
    let loaded = arg.data.load()?;
    let page_size = arg.page_size.unwrap_or(loaded.config.page_size);

    let mut table = TableView::with_state(&loaded.dataset, ViewState::with_page_size(page_size)?);
    table.set_query(arg.query.as_str());
    if let Some(field) = &arg.sort {
        table.set_sort(field.as_str());
        if arg.desc {
            table.set_sort(field.as_str());
        }
    }
    table.set_page_index(arg.page.saturating_sub(1));

    let view = table.view();
    if arg.json {
        return super::print_json(&view);
    }
    print!("{}", render(&loaded, table.state(), &view)?);
    Ok(())
}

fn render(
    loaded: &Loaded,
    state: &ViewState,
    view: &ViewResult<'_>,
) -> Result<String, std::fmt::Error> {
    let predictions = align_predictions(&loaded.dataset, loaded.predictions());

    let mut header: Vec<String> = loaded
        .dataset
        .fields()
        .iter()
        .map(|field| match (&state.sort_field, state.sort_direction) {
            (Some(sorted), SortDirection::Asc) if sorted == field => format!("{field} ▲"),
            (Some(sorted), SortDirection::Desc) if sorted == field => format!("{field} ▼"),
            _ => field.clone(),
        })
        .collect();
    if predictions.is_some() {
        header.push("prediction".to_string());
        header.push("confidence".to_string());
    }

    let body: Vec<Vec<String>> = view
        .visible_rows
        .iter()
        .zip(&view.row_indices)
        .map(|(row, &index)| {
            let mut line: Vec<String> = loaded
                .dataset
                .fields()
                .iter()
                .map(|field| format_cell(row.get(field)))
                .collect();
            if let Some(preds) = predictions {
                line.push(preds[index].label.to_string());
                line.push(format!("{:.1}%", preds[index].confidence * 100.0));
            }
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(&body) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }

    if view.total_matching == 0 {
        writeln!(out, "\nNo matching rows")?;
    } else {
        writeln!(
            out,
            "\nShowing {}-{} of {} rows",
            view.window_start + 1,
            view.window_end,
            view.total_matching
        )?;
    }
    let pages: Vec<String> = page_window(view.page_index, view.page_count, loaded.config.page_window)
        .map(|p| {
            if p == view.page_index {
                format!("[{}]", p + 1)
            } else {
                (p + 1).to_string()
            }
        })
        .collect();
    writeln!(
        out,
        "Page {} of {}: {}",
        view.page_index + 1,
        view.page_count,
        pages.join(" ")
    )?;
    Ok(out)
}
