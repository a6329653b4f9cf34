use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info, info_span, warn};

use tdv_cli::config::Settings;
use tdv_cli::input::load_records;
use tdv_cli::query::Query;
use tdv_cli::summary::{apply_table_style, dim_cell, header_cell, print_page};
use tdv_core::TableView;
use tdv_export::{DirectorySink, Exporter, PngFileChart};
use tdv_model::{ExportFormat, Notice};
use tdv_screens::Screen;

use crate::cli::{ExportArgs, ListArgs, ViewArgs};

pub fn run_screens() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Screen"),
        header_cell("Label"),
        header_cell("Search"),
        header_cell("Filters"),
        header_cell("Date field"),
        header_cell("Page size"),
        header_cell("Samples"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(5) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    if let Some(column) = table.column_mut(6) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for screen in Screen::ALL {
        let config = screen.config();
        let samples = screen
            .sample_records()
            .with_context(|| format!("load sample data for {screen}"))?
            .len();
        let filters: Vec<&str> = config
            .filter_fields
            .iter()
            .map(|field| field.field.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(screen.name()),
            Cell::new(screen.label()),
            optional_cell(&config.search_fields.join(", ")),
            optional_cell(&filters.join(", ")),
            optional_cell(config.date_field.as_deref().unwrap_or_default()),
            Cell::new(config.page_size),
            Cell::new(samples),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn optional_cell(text: &str) -> Cell {
    if text.is_empty() { dim_cell("-") } else { Cell::new(text) }
}

pub fn run_list(args: &ListArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("list", screen = %args.view.screen);
    let _guard = span.enter();
    let query = Query {
        page: args.page,
        page_size: args.page_size.or(settings.view.page_size),
        ..query(&args.view)
    };
    let view = open_view(&args.view, &query)?;
    print_page(&view);
    Ok(())
}

pub fn run_export(args: &ExportArgs, settings: &Settings) -> Result<Vec<Notice>> {
    let format = ExportFormat::from(args.format);
    let span = info_span!("export", screen = %args.view.screen, %format);
    let _guard = span.enter();

    let view = open_view(&args.view, &query(&args.view))?;
    let mut job = view.export_job(format, Local::now().naive_local());
    if let Some(label) = &args.label {
        job.label.clone_from(label);
        job.title.clone_from(label);
    }
    if let Some(title) = &args.title {
        job.title.clone_from(title);
    }
    if let Some(enabled) = args.date_suffix().or(settings.export.date_suffix) {
        job.date_suffix = enabled;
    }
    if format == ExportFormat::Csv && !args.charts.is_empty() {
        warn!(charts = args.charts.len(), "charts are only placed in PDF exports");
    }

    let dir = args.output_dir.clone().unwrap_or_else(|| settings.export_dir());
    let exporter = args.charts.iter().fold(
        Exporter::new(DirectorySink::new(dir))
            .with_style(settings.pdf_style()?)
            .with_chart_failure(args.chart_failure()),
        |exporter, path| exporter.with_chart(PngFileChart::from_path(path.clone())),
    );
    info!(records = job.record_count(), label = %job.label, "exporting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    Ok(runtime.block_on(exporter.run(&job)))
}

fn query(args: &ViewArgs) -> Query {
    Query {
        search: args.search.clone(),
        filters: args.filters.clone(),
        from: args.from,
        to: args.to,
        ..Query::default()
    }
}

fn open_view(args: &ViewArgs, query: &Query) -> Result<TableView> {
    let records = load_records(args.screen, args.input.as_deref())?;
    let mut view = args
        .screen
        .view(records)
        .with_context(|| format!("open the {} screen", args.screen))?;
    query.apply(&mut view)?;
    Ok(view)
}
