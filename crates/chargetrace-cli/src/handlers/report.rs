use crate::args::InputArgs;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use chargetrace_report::{ReportOptions, build_batch_report, build_report, text};
use chargetrace_runtime::Config;
use chargetrace_types::{FileResult, StationInfo};
use chrono::Local;
use std::path::Path;

pub fn handle(
    args: &InputArgs,
    config: &Config,
    out: Option<&Path>,
    per_file: bool,
    format: OutputFormat,
) -> Result<()> {
    let state = super::load_state(args)?;

    let options = ReportOptions {
        lines_per_page: config.report.lines_per_page,
        generated_at: Some(Local::now().format("%m/%d/%Y %I:%M %p").to_string()),
    };

    let document = if per_file {
        let mut results = state.results.clone();
        for result in results.values_mut() {
            apply_rated_power_fallback(result, config);
        }
        build_batch_report(&results, &options)
    } else {
        let mut active = state.active();
        apply_rated_power_fallback(&mut active.result, config);
        build_report(&active.label, &active.result, &options)
    };

    let rendered = if format.is_json() {
        serde_json::to_string_pretty(&document)?
    } else {
        text::render(&document)
    };

    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            println!("Report written to {} ({} pages)", path.display(), document.page_count());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Configured nameplate fallback for stations whose metadata carries none;
/// without it the power-quality cells stay unstyled.
fn apply_rated_power_fallback(result: &mut FileResult, config: &Config) {
    let Some(fallback) = config.report.rated_power_fallback_kw else {
        return;
    };
    let info = result.station_info.get_or_insert_with(StationInfo::default);
    if info.rated_power_kw.is_none() {
        info.rated_power_kw = Some(fallback);
    }
}
