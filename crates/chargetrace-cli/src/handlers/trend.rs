use crate::args::InputArgs;
use crate::presentation;
use crate::types::OutputFormat;
use anyhow::Result;
use chargetrace_engine::{TrendMode, build_trend};
use chargetrace_runtime::Config;

pub fn handle(args: &InputArgs, config: &Config, per_row: bool, format: OutputFormat) -> Result<()> {
    let state = super::load_state(args)?;
    let active = state.active();

    let mode = if per_row || config.trend.per_row {
        TrendMode::PerRow
    } else {
        TrendMode::Bucketed
    };
    let rows: Vec<_> = active.result.all_rows().cloned().collect();
    let trend = build_trend(&rows, mode);

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&trend)?);
        return Ok(());
    }

    println!("{}", presentation::heading(&active.label));
    if trend.is_empty() {
        println!("No dated sessions in the active selection.");
        return Ok(());
    }

    let mut table = presentation::styled_table(&["Time", "Peak Power (kW)", "Avg Power (kW)"]);
    for point in &trend {
        table.add_row(vec![
            point.label.clone(),
            format!("{:.2}", point.peak),
            format!("{:.2}", point.avg),
        ]);
    }
    println!("{table}");
    Ok(())
}
