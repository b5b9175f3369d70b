use crate::args::InputArgs;
use crate::presentation;
use crate::types::OutputFormat;
use anyhow::Result;
use chargetrace_engine::{TrendMode, dashboard_series, metrics};
use chargetrace_runtime::Config;
use chargetrace_types::{ConnectorId, FileResult};
use serde::Serialize;

#[derive(Serialize)]
struct AnalyzeView {
    label: String,
    files: Vec<String>,
    success_rate_pct: u64,
    dashboard: chargetrace_engine::DashboardSeries,
    power: PowerView,
}

#[derive(Serialize)]
struct PowerView {
    combined: metrics::PowerFigures,
    connector_1: metrics::PowerFigures,
    connector_2: metrics::PowerFigures,
}

pub fn handle(args: &InputArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let state = super::load_state(args)?;
    let active = state.active();

    if format.is_json() {
        let mode = if config.trend.per_row {
            TrendMode::PerRow
        } else {
            TrendMode::Bucketed
        };
        let combined = active.result.combined_summary();
        let view = AnalyzeView {
            label: active.label,
            files: state.results.keys().cloned().collect(),
            success_rate_pct: combined.success_rate_pct(),
            dashboard: dashboard_series(&active.result, mode),
            power: power_view(&active.result),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let names: Vec<&str> = state.results.keys().map(String::as_str).collect();
    let records: usize = state.results.values().map(FileResult::session_count).sum();
    println!("{}", presentation::heading(&active.label));
    println!("Files: {} ({} session records)", names.join(", "), records);
    println!();
    print_dashboard(&active.result);
    Ok(())
}

fn power_view(result: &FileResult) -> PowerView {
    let per_connector = ConnectorId::ALL.map(|connector| {
        metrics::connector_power_figures(
            metrics::compute_connector_metrics(result.table(connector)),
            result.summary(connector),
        )
    });
    PowerView {
        combined: metrics::combined_power_figures(result),
        connector_1: per_connector[0],
        connector_2: per_connector[1],
    }
}

fn print_dashboard(result: &FileResult) {
    let combined = result.combined_summary();
    let power = power_view(result);

    let mut usage = presentation::styled_table(&["Metric", "Combined", "Connector 1", "Connector 2"]);
    let summaries = ConnectorId::ALL.map(|connector| result.summary(connector).cloned().unwrap_or_default());
    let rows: [(&str, fn(&chargetrace_types::ConnectorSummary) -> u64); 7] = [
        ("Preparing", |s| s.preparing_sessions),
        ("Charging", |s| s.charging_sessions),
        ("Positive Stops", |s| s.successful_sessions),
        ("Negative Stops", |s| s.failed_error_stops),
        ("Remote Start", |s| s.remote_start),
        ("Auto Start", |s| s.auto_start),
        ("RFID Start", |s| s.rfid_start),
    ];
    for (name, getter) in rows {
        usage.add_row(vec![
            name.to_string(),
            getter(&combined).to_string(),
            getter(&summaries[0]).to_string(),
            getter(&summaries[1]).to_string(),
        ]);
    }
    println!("{usage}");

    println!("{}", presentation::success_rate_line(combined.successful_sessions, combined.charging_sessions));
    println!();

    let mut power_table = presentation::styled_table(&["Metric", "Combined", "Connector 1", "Connector 2"]);
    power_table.add_row(vec![
        "Peak Power (kW)".to_string(),
        presentation::power_cell(power.combined.peak_kw),
        presentation::power_cell(power.connector_1.peak_kw),
        presentation::power_cell(power.connector_2.peak_kw),
    ]);
    power_table.add_row(vec![
        "Avg Power (kW)".to_string(),
        presentation::power_cell(power.combined.avg_kw),
        presentation::power_cell(power.connector_1.avg_kw),
        presentation::power_cell(power.connector_2.avg_kw),
    ]);
    println!("{power_table}");
}
