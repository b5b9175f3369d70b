// Engine module - Core normalization and aggregation logic
// This layer sits between upstream file results (types) and presentation
// (CLI tables, dashboard series, report layout). Everything here is pure and
// synchronous: per-field failures degrade to documented defaults and never
// propagate as errors.

pub mod aggregate;
pub mod breakdown;
pub mod dashboard;
pub mod duration;
pub mod fields;
pub mod filter;
pub mod metrics;
pub mod trend;

pub use aggregate::aggregate_results;
pub use breakdown::{
    BarStyle, Breakdown, OemReliability, merge_breakdowns, negative_stop_breakdown,
    network_performance, top_error_reasons,
};
pub use dashboard::{DashboardSeries, FunnelCounts, dashboard_series};
pub use filter::{ActiveResult, FilterSelection, Selector, ALL_FILES, resolve_active};
pub use metrics::{
    ConnectorMetrics, PowerFigures, combined_metrics, combined_power_figures,
    compute_connector_metrics, connector_power_figures, precharging_failures,
};
pub use trend::{TrendMode, TrendPoint, build_trend, parse_timestamp};

use chargetrace_types::RawRecord;
use serde_json::Value;

// Façade API - stable entry points for the CLI layer.

/// Resolve a logical field against a record via the ordered alias list.
pub fn resolve_field<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a Value> {
    fields::resolve(record, candidates)
}

/// Convert a raw duration value (minutes, "H:MM:SS" or "MM:SS") to hours.
pub fn duration_hours(raw: Option<&Value>) -> f64 {
    duration::to_hours(raw)
}

/// Default cap for error-reason breakdowns.
pub const TOP_ERROR_LIMIT: usize = 5;
