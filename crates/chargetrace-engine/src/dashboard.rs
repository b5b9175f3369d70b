//! Pre-computed series for dashboard chart widgets.
//!
//! Chart consumers take these values as-is; no further math happens on their
//! side of the boundary.

use crate::breakdown::{self, Breakdown};
use crate::trend::{self, TrendMode, TrendPoint};
use chargetrace_types::{ConnectorId, ConnectorSummary, FileResult};
use serde::Serialize;

/// Usage funnel stages for one scope (combined or a single connector).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FunnelCounts {
    pub preparing: u64,
    pub charging: u64,
    pub negative: u64,
}

impl FunnelCounts {
    fn from_summary(summary: &ConnectorSummary) -> Self {
        FunnelCounts {
            preparing: summary.preparing_sessions,
            charging: summary.charging_sessions,
            negative: summary.failed_error_stops,
        }
    }
}

/// Everything the dashboard renders for the active result.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSeries {
    pub funnel_combined: FunnelCounts,
    pub funnel_connector_1: FunnelCounts,
    pub funnel_connector_2: FunnelCounts,
    /// Remote/Auto/RFID start counts; zero-valued slices are dropped.
    pub auth_methods: Vec<Breakdown>,
    /// Most frequent negative-stop reasons across both connectors, capped.
    pub top_errors: Vec<Breakdown>,
    pub power_trend: Vec<TrendPoint>,
}

/// Derive all dashboard series for a (possibly aggregated) file result.
pub fn dashboard_series(file: &FileResult, mode: TrendMode) -> DashboardSeries {
    let combined = file.combined_summary();
    let per_connector = ConnectorId::ALL.map(|connector| {
        file.summary(connector)
            .map(FunnelCounts::from_summary)
            .unwrap_or_default()
    });

    let all_rows: Vec<_> = file.all_rows().cloned().collect();

    DashboardSeries {
        funnel_combined: FunnelCounts::from_summary(&combined),
        funnel_connector_1: per_connector[0],
        funnel_connector_2: per_connector[1],
        auth_methods: auth_method_slices(&combined),
        top_errors: breakdown::top_error_reasons(&all_rows, crate::TOP_ERROR_LIMIT),
        power_trend: trend::build_trend(&all_rows, mode),
    }
}

fn auth_method_slices(summary: &ConnectorSummary) -> Vec<Breakdown> {
    [
        ("Remote", summary.remote_start),
        ("Auto", summary.auto_start),
        ("RFID", summary.rfid_start),
    ]
    .into_iter()
    .filter(|(_, value)| *value > 0)
    .map(|(name, value)| Breakdown { name: name.to_string(), value })
    .collect()
}
