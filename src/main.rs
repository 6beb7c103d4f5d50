//! Dash Engine - Demo Entry Point
//!
//! Usage:
//!   dash-engine <dashboards.json> [page]
//!   dash-engine filters <filters.json>

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use crossbeam_channel::unbounded;
use tracing_appender::non_blocking::WorkerGuard;

use dash_engine::components::data_table::{
    CellValue, FilterState, SortDirection, SortState, TableBody, TableStatus, VecDataProvider,
};
use dash_engine::domain::dashboard::Dashboard;
use dash_engine::features::dashboards::{DashboardList, dashboard_columns, dashboard_table};
use dash_engine::helpers::is_development;
use dash_engine::services::{HttpFilterApi, OptionCache, block_on};
use dash_engine::settings::Settings;
use dash_engine::state::filter_panel::FilterPanel;
use dash_engine::state::option_loader::{OptionLoader, OptionState, preload};

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    let _guard = init_tracing(&settings);

    if let Err(e) = run(&settings) {
        tracing::error!("{:#}", e);
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Console logging, plus a daily rolling file when `log_dir` is set
fn init_tracing(settings: &Settings) -> Option<WorkerGuard> {
    let default_level = if is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into());
    let timer = tracing_subscriber::fmt::time::LocalTime::rfc_3339();

    match &settings.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dash-engine.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [command, path] if command == "filters" => show_filters(settings, Path::new(path)),
        [path] => show_dashboards(settings, Path::new(path), 1),
        [path, page] => {
            let page: usize = page
                .parse()
                .with_context(|| format!("invalid page number '{page}'"))?;
            show_dashboards(settings, Path::new(path), page)
        }
        _ => bail!("usage: dash-engine <dashboards.json> [page] | dash-engine filters <filters.json>"),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

fn show_dashboards(settings: &Settings, path: &Path, page: usize) -> Result<()> {
    let dashboards: Vec<Dashboard> =
        serde_json::from_value(read_json(path)?).context("expected a list of dashboards")?;
    tracing::info!(count = dashboards.len(), "Loaded dashboards");

    let columns = dashboard_columns()?;
    let sort = SortState::by("last_modified", SortDirection::Desc);
    let filters = FilterState::new();
    let list = DashboardList::prepare(dashboards, &columns, &sort, &filters, Utc::now());

    let mut table = dashboard_table(settings)?;
    let provider = VecDataProvider::new(list.rows);
    table.view(&provider, &list.pinned, &sort, &filters, &TableStatus::Ready);
    if page > 1 {
        table.go_to_page(page - 1);
        let shown = table.pagination().page_index() + 1;
        if shown != page {
            tracing::warn!(page, shown, "Page out of range; showing the last page");
        }
    }

    let view = table.view(&provider, &list.pinned, &sort, &filters, &TableStatus::Ready);
    let header: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sort {
            Some(SortDirection::Asc) => format!("{} ^", h.label),
            Some(SortDirection::Desc) => format!("{} v", h.label),
            None => h.label.clone(),
        })
        .collect();
    println!("{}", header.join(" | "));

    match view.body {
        TableBody::Rows {
            pinned,
            rows,
            footer,
            ..
        } => {
            for row in pinned.iter().chain(rows.iter()) {
                let cells: Vec<String> = row.cells.iter().map(format_cell).collect();
                let marker = if row.pinned { "*" } else { " " };
                println!("{marker} {}", cells.join(" | "));
            }
            println!(
                "{}  (page {} of {})",
                footer.summary(),
                footer.page_index + 1,
                footer.page_count
            );
        }
        TableBody::Empty(empty) => println!("{}", empty.message),
        TableBody::Skeleton { .. } | TableBody::Error { .. } => {}
    }
    Ok(())
}

fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Date(at) => at.format("%Y-%m-%d").to_string(),
        other => other.as_text().unwrap_or_else(|| "-".to_string()),
    }
}

fn show_filters(settings: &Settings, path: &Path) -> Result<()> {
    let raw = read_json(path)?;
    let (events, _receiver) = unbounded();
    let mut panel = FilterPanel::new(events);
    panel.sync_filters_json(&raw);

    let api = HttpFilterApi::new(settings)?;
    let mut cache = OptionCache::new(settings.option_cache_capacity);
    let filters = panel.filters().to_vec();
    let mut loaders: Vec<OptionLoader> = filters.iter().map(|_| OptionLoader::new()).collect();
    {
        let mut editors: Vec<_> = filters
            .iter()
            .filter(|f| panel.invalid_reason(&f.id).is_none())
            .zip(loaders.iter_mut())
            .collect();
        block_on(preload(&api, &mut cache, &mut editors, settings.option_fetch_limit))?;
    }

    for (filter, loader) in filters
        .iter()
        .filter(|f| panel.invalid_reason(&f.id).is_none())
        .zip(&loaders)
    {
        let options = match loader.state() {
            OptionState::Idle => "-".to_string(),
            OptionState::Loading => "loading".to_string(),
            OptionState::Loaded(_) if loader.state().is_empty_result() => {
                "No options available".to_string()
            }
            OptionState::Loaded(response) => format!("{response:?}"),
            OptionState::Failed(message) => format!("error: {message}"),
        };
        println!("{} ({}): {}", filter.display_label(), filter.filter_type.as_str(), options);
    }
    for filter in &filters {
        if let Some(reason) = panel.invalid_reason(&filter.id) {
            println!("{}: invalid configuration ({reason})", filter.id);
        }
    }

    let snapshot = panel.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
