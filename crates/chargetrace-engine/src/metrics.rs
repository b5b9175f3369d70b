//! Per-connector and combined usage/power metrics.

use crate::duration;
use crate::fields::{self, aliases};
use chargetrace_types::{ConnectorId, ConnectorSummary, FileResult, RawRecord};
use serde::Serialize;
use serde_json::Value;

/// Power metrics recomputed from raw session rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ConnectorMetrics {
    pub peak_power_kw: f64,
    pub avg_power_kw: f64,
    pub session_count: usize,
}

/// Peak/avg figures ready for display. `None` means no raw rows recomputed a
/// value *and* no pre-aggregated summary existed to fall back on; renderers
/// show an explicit no-data marker for it, never `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PowerFigures {
    pub peak_kw: Option<f64>,
    pub avg_kw: Option<f64>,
}

/// Recompute usage metrics from a raw row table.
///
/// Peak is the max of the resolved peak-power field (unparsable rows read as
/// 0). Average power is duration-weighted: total energy over total duration in
/// hours. When no row carried a usable duration, the direct average-power
/// field is the fallback; failing that the average is 0.
pub fn compute_connector_metrics(rows: &[RawRecord]) -> ConnectorMetrics {
    let mut max_peak = 0.0_f64;
    let mut total_energy = 0.0;
    let mut total_duration_hours = 0.0;

    for row in rows {
        let peak = fields::resolve_f64(row, aliases::PEAK_POWER).unwrap_or(0.0);
        max_peak = max_peak.max(peak);

        total_energy += fields::resolve_f64(row, aliases::ENERGY).unwrap_or(0.0);
        total_duration_hours += duration::to_hours(fields::resolve(row, aliases::DURATION));
    }

    let avg_power_kw = if total_duration_hours > 0.0 {
        total_energy / total_duration_hours
    } else {
        direct_average_power(rows)
    };

    ConnectorMetrics {
        peak_power_kw: max_peak,
        avg_power_kw,
        session_count: rows.len(),
    }
}

/// Mean of the rows' own average-power column, used only when durations are
/// absent across the whole table.
fn direct_average_power(rows: &[RawRecord]) -> f64 {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| fields::resolve_f64(row, aliases::AVG_POWER))
        .filter(|v| *v > 0.0)
        .collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Cross-connector rollup.
///
/// Combined peak is the max of the two peaks (two ports cannot stack a single
/// reading). Combined average is the arithmetic mean of the non-zero connector
/// averages - not re-weighted by session counts; upstream defined it this way
/// and downstream consumers expect it.
pub fn combined_metrics(c1: ConnectorMetrics, c2: ConnectorMetrics) -> ConnectorMetrics {
    let averages: Vec<f64> = [c1.avg_power_kw, c2.avg_power_kw]
        .into_iter()
        .filter(|v| *v > 0.0)
        .collect();
    let avg_power_kw = if averages.is_empty() {
        0.0
    } else {
        averages.iter().sum::<f64>() / averages.len() as f64
    };

    ConnectorMetrics {
        peak_power_kw: c1.peak_power_kw.max(c2.peak_power_kw),
        avg_power_kw,
        session_count: c1.session_count + c2.session_count,
    }
}

/// Display figures for one connector: recomputed metrics first, pre-aggregated
/// summary counters as fallback, no-data when neither exists.
pub fn connector_power_figures(
    metrics: ConnectorMetrics,
    summary: Option<&ConnectorSummary>,
) -> PowerFigures {
    PowerFigures {
        peak_kw: pick_figure(metrics.peak_power_kw, summary.map(|s| s.peak_power_kw)),
        avg_kw: pick_figure(metrics.avg_power_kw, summary.map(|s| s.avg_power_per_session_kw)),
    }
}

fn pick_figure(recomputed: f64, fallback: Option<f64>) -> Option<f64> {
    if recomputed > 0.0 {
        Some(recomputed)
    } else {
        fallback
    }
}

/// Combined display figures for a whole file.
///
/// When neither connector recomputes an average from raw rows, fall back to a
/// charging-session-weighted mean of the two summary averages.
pub fn combined_power_figures(file: &FileResult) -> PowerFigures {
    let m1 = compute_connector_metrics(file.table(ConnectorId::One));
    let m2 = compute_connector_metrics(file.table(ConnectorId::Two));

    let peak1 = pick_figure(m1.peak_power_kw, file.summary_1.as_ref().map(|s| s.peak_power_kw));
    let peak2 = pick_figure(m2.peak_power_kw, file.summary_2.as_ref().map(|s| s.peak_power_kw));
    let peak_kw = match (peak1, peak2) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (one, two) => one.or(two),
    };

    let combined = combined_metrics(m1, m2);
    let avg_kw = if combined.avg_power_kw > 0.0 {
        Some(combined.avg_power_kw)
    } else {
        summary_weighted_average(file)
    };

    PowerFigures { peak_kw, avg_kw }
}

fn summary_weighted_average(file: &FileResult) -> Option<f64> {
    let mut weighted = 0.0;
    let mut sessions = 0u64;
    let mut saw_summary = false;
    for summary in [file.summary_1.as_ref(), file.summary_2.as_ref()].into_iter().flatten() {
        saw_summary = true;
        weighted += summary.avg_power_per_session_kw * summary.charging_sessions as f64;
        sessions += summary.charging_sessions;
    }
    if !saw_summary {
        return None;
    }
    Some(if sessions > 0 {
        weighted / sessions as f64
    } else {
        0.0
    })
}

/// Count of sessions that died in precharge: the vendor error code equals
/// "Precharging Failure" verbatim while the charging flag is exactly
/// zero/false. Deliberately not alias-resolved - this is a vendor contract,
/// not a drifting column.
pub fn precharging_failures(rows: &[RawRecord]) -> usize {
    rows.iter()
        .filter(|row| {
            row.get("vendorErrorCode").and_then(Value::as_str) == Some("Precharging Failure")
                && row.get("is_Charging").is_some_and(is_exactly_falsy)
        })
        .count()
}

fn is_exactly_falsy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
