//! Thin processing collaborator: turns one input file into a [`FileResult`].
//!
//! Two input kinds are accepted:
//! - `.json` - an already-processed payload from the upstream collaborator,
//!   decoded leniently via [`FileResult::from_value`];
//! - `.csv` - a raw session export; rows are partitioned by connector and the
//!   per-connector counters derived here.
//!
//! Everything downstream of this module is pure and file-format agnostic.

use crate::error::{Error, Result};
use chargetrace_engine::{breakdown, duration, fields, metrics, parse_timestamp};
use chargetrace_types::{ConnectorId, ConnectorSummary, DateRange, FileResult, RawRecord, RawTable};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

const CONNECTOR_ALIASES: &[&str] = &["Connector Id", "ConnectorId", "Connector", "Port"];
const START_TYPE_ALIASES: &[&str] = &["Start Type", "Auth Mode", "Authentication", "Started By"];

/// Process one input file synchronously.
pub fn process_file(path: &Path) -> Result<FileResult> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            let content = std::fs::read_to_string(path)?;
            let payload: Value = serde_json::from_str(&content)
                .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
            Ok(FileResult::from_value(&payload))
        }
        Some(ext) if ext.eq_ignore_ascii_case("csv") => read_csv(path),
        _ => Err(Error::UnsupportedInput(path.display().to_string())),
    }
}

fn read_csv(path: &Path) -> Result<FileResult> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut tables: BTreeMap<ConnectorId, RawTable> = BTreeMap::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                // One malformed row never invalidates the table.
                log::warn!("{}: skipping malformed row: {}", path.display(), err);
                continue;
            }
        };

        let mut row = RawRecord::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            if header.is_empty() {
                continue;
            }
            row.insert(header.to_string(), cell_value(value));
        }
        tables.entry(connector_of(&row)).or_default().push(row);
    }

    let mut result = FileResult::default();
    for (connector, table) in tables {
        result.set_summary(connector, Some(derive_summary(&table)));
        result
            .tables
            .insert(connector.table_key().to_string(), table);
    }
    result.date_range = observed_date_range(&result);
    Ok(result)
}

/// Keep numeric-looking cells numeric so downstream math does not depend on
/// string parsing alone; everything else stays verbatim text.
fn cell_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}

fn connector_of(row: &RawRecord) -> ConnectorId {
    match fields::resolve_f64(row, CONNECTOR_ALIASES) {
        Some(id) if id == 2.0 => ConnectorId::Two,
        _ => ConnectorId::One,
    }
}

/// Derive the pre-aggregated counters the upstream collaborator would have
/// computed for this connector.
fn derive_summary(rows: &[RawRecord]) -> ConnectorSummary {
    let power = metrics::compute_connector_metrics(rows);
    let mut summary = ConnectorSummary {
        // Every recorded session at least reached the preparing stage.
        preparing_sessions: rows.len() as u64,
        peak_power_kw: power.peak_power_kw,
        avg_power_per_session_kw: power.avg_power_kw,
        ..Default::default()
    };

    for row in rows {
        let status = fields::resolve_text(row, fields::aliases::STATUS)
            .unwrap_or_default()
            .to_lowercase();
        let failed = status.contains("failed") || status.contains("error");
        let successful = status.contains("success") || status.contains("complete");

        let energy = fields::resolve_f64(row, fields::aliases::ENERGY).unwrap_or(0.0);
        let hours = duration::to_hours(fields::resolve(row, fields::aliases::DURATION));
        if failed || successful || energy > 0.0 || hours > 0.0 {
            summary.charging_sessions += 1;
        }
        if successful {
            summary.successful_sessions += 1;
        }
        if failed {
            summary.failed_error_stops += 1;
        }

        if let Some(start_type) = fields::resolve_text(row, START_TYPE_ALIASES) {
            let start_type = start_type.to_lowercase();
            if start_type.contains("remote") {
                summary.remote_start += 1;
            } else if start_type.contains("rfid") {
                summary.rfid_start += 1;
            } else if start_type.contains("auto") {
                summary.auto_start += 1;
            }
        }
    }

    summary.failed_errors = breakdown::negative_stop_breakdown(rows)
        .into_iter()
        .map(|entry| (entry.name, entry.value))
        .collect();

    summary
}

fn observed_date_range(result: &FileResult) -> Option<DateRange> {
    let mut dates: Vec<chrono::NaiveDateTime> = result
        .all_rows()
        .filter_map(|row| {
            fields::resolve(row, fields::aliases::SESSION_START).and_then(parse_timestamp)
        })
        .collect();
    if dates.is_empty() {
        return None;
    }
    dates.sort();
    Some(DateRange {
        start: Some(dates[0].date().format("%Y-%m-%d").to_string()),
        end: Some(dates[dates.len() - 1].date().format("%Y-%m-%d").to_string()),
    })
}
