//! Categorical breakdowns: stop-error reasons and cross-file OEM reliability.

use crate::fields::{self, aliases};
use crate::filter::ALL_FILES;
use chargetrace_types::{ConnectorId, FileResult, RawRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// One categorical tally, ordered descending by `value` in every output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub name: String,
    pub value: u64,
}

/// Style tag for reliability chart bars, so the synthetic overall entry can be
/// drawn differently from per-OEM ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarStyle {
    PerOem,
    Overall,
}

/// Negative-stop rate per OEM, plus a trailing overall entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OemReliability {
    pub name: String,
    /// `round(100 * negative stops / charging sessions)`.
    pub value: u64,
    pub fill: BarStyle,
}

/// Tally stop reasons for rows whose status marks a failed/error stop.
///
/// The status field must contain "failed" or "error" (case-insensitive
/// substring). The reason comes from the ordered alias chain (stop-reason
/// fields before vendor/error-code fields); rows where every candidate is
/// absent or noise tally under "Unknown". Counts sort descending, ties keeping
/// first-seen order.
pub fn negative_stop_breakdown(rows: &[RawRecord]) -> Vec<Breakdown> {
    let mut tallies: Vec<Breakdown> = Vec::new();

    for row in rows {
        let Some(status) = fields::resolve_text(row, aliases::STATUS) else {
            continue;
        };
        let status = status.to_lowercase();
        if !status.contains("failed") && !status.contains("error") {
            continue;
        }

        let reason = fields::resolve_reason(row, aliases::STOP_REASON)
            .unwrap_or_else(|| "Unknown".to_string());
        let reason = reason.trim().to_string();

        match tallies.iter_mut().find(|entry| entry.name == reason) {
            Some(entry) => entry.value += 1,
            None => tallies.push(Breakdown { name: reason, value: 1 }),
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    tallies.sort_by(|a, b| b.value.cmp(&a.value));
    tallies
}

/// Top-N error reasons across a row set.
pub fn top_error_reasons(rows: &[RawRecord], limit: usize) -> Vec<Breakdown> {
    let mut breakdown = negative_stop_breakdown(rows);
    breakdown.truncate(limit);
    breakdown
}

/// Sum several breakdowns (e.g. both connectors of a file) into one,
/// re-sorted descending.
pub fn merge_breakdowns<I>(parts: I) -> Vec<Breakdown>
where
    I: IntoIterator<Item = Vec<Breakdown>>,
{
    let mut merged: Vec<Breakdown> = Vec::new();
    for part in parts {
        for entry in part {
            match merged.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => existing.value += entry.value,
                None => merged.push(entry),
            }
        }
    }
    merged.sort_by(|a, b| b.value.cmp(&a.value));
    merged
}

/// Negative-stop rate by OEM across all files, alphabetical by OEM name, with
/// a synthetic "OVERALL" entry from the grand totals appended last.
///
/// The synthetic all-files aggregate key is skipped if present; it would
/// double-count every session.
pub fn network_performance(results: &BTreeMap<String, FileResult>) -> Vec<OemReliability> {
    let mut per_oem: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    let mut grand_total = 0u64;
    let mut grand_negative = 0u64;

    for (name, file) in results {
        if name == ALL_FILES {
            continue;
        }
        let oem = file
            .station_info
            .as_ref()
            .map(|info| info.oem_name.trim().to_uppercase())
            .filter(|oem| !oem.is_empty())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        let mut total = 0u64;
        let mut negative = 0u64;
        for connector in ConnectorId::ALL {
            if let Some(summary) = file.summary(connector) {
                total += summary.charging_sessions;
                negative += summary.failed_error_stops;
            }
        }

        let entry = per_oem.entry(oem).or_insert((0, 0));
        entry.0 += total;
        entry.1 += negative;
        grand_total += total;
        grand_negative += negative;
    }

    let mut out: Vec<OemReliability> = per_oem
        .into_iter()
        .map(|(name, (total, negative))| OemReliability {
            name,
            value: chargetrace_types::summary::rate_pct(negative, total),
            fill: BarStyle::PerOem,
        })
        .collect();

    out.push(OemReliability {
        name: "OVERALL".to_string(),
        value: chargetrace_types::summary::rate_pct(grand_negative, grand_total),
        fill: BarStyle::Overall,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargetrace_types::{ConnectorSummary, StationInfo};
    use serde_json::json;

    fn rows(values: Vec<serde_json::Value>) -> Vec<RawRecord> {
        values
            .into_iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn tallies_failed_and_error_stops_only() {
        let table = rows(vec![
            json!({ "Session Status": "Completed" }),
            json!({ "Session Status": "Failed", "Stop Reason": "Powerloss" }),
            json!({ "Session Status": "Error Stop", "Stop Reason": "Powerloss" }),
            json!({ "Session Status": "FAILED", "Stop Reason": "EV Disconnect" }),
        ]);
        let breakdown = negative_stop_breakdown(&table);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0], Breakdown { name: "Powerloss".into(), value: 2 });
        assert_eq!(breakdown[1], Breakdown { name: "EV Disconnect".into(), value: 1 });
    }

    #[test]
    fn reason_falls_through_alias_chain_to_unknown() {
        let table = rows(vec![
            json!({ "Status": "failed", "Stop Reason": "NoError", "VendorErrorCode": "OverTemp" }),
            json!({ "Status": "failed", "Stop Reason": 0 }),
        ]);
        let breakdown = negative_stop_breakdown(&table);
        assert_eq!(breakdown[0].name, "OverTemp");
        assert_eq!(breakdown[1].name, "Unknown");
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let table = rows(vec![
            json!({ "Status": "failed", "Reason": "B" }),
            json!({ "Status": "failed", "Reason": "A" }),
        ]);
        let breakdown = negative_stop_breakdown(&table);
        assert_eq!(breakdown[0].name, "B");
        assert_eq!(breakdown[1].name, "A");
    }

    #[test]
    fn top_error_reasons_caps_at_limit() {
        let table: Vec<RawRecord> = (0..8)
            .map(|i| {
                json!({ "Status": "failed", "Reason": format!("R{i}") })
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect();
        assert_eq!(top_error_reasons(&table, 5).len(), 5);
    }

    fn file_with(oem: &str, charging: u64, failed: u64) -> FileResult {
        FileResult {
            station_info: Some(StationInfo {
                oem_name: oem.to_string(),
                ..Default::default()
            }),
            summary_1: Some(ConnectorSummary {
                charging_sessions: charging,
                failed_error_stops: failed,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn network_performance_groups_by_oem_and_appends_overall() {
        let mut results = BTreeMap::new();
        results.insert("b.csv".to_string(), file_with("Exicom", 10, 2));
        results.insert("a.csv".to_string(), file_with("Delta", 10, 5));
        results.insert("c.csv".to_string(), file_with("exicom", 10, 0));
        results.insert(ALL_FILES.to_string(), file_with("Delta", 999, 999));

        let perf = network_performance(&results);
        assert_eq!(perf.len(), 3);
        assert_eq!(perf[0].name, "DELTA");
        assert_eq!(perf[0].value, 50);
        assert_eq!(perf[1].name, "EXICOM");
        assert_eq!(perf[1].value, 10);
        assert_eq!(perf[2].name, "OVERALL");
        assert_eq!(perf[2].value, 23);
        assert_eq!(perf[2].fill, BarStyle::Overall);
    }

    #[test]
    fn missing_station_info_rolls_up_under_unknown() {
        let mut results = BTreeMap::new();
        let mut file = file_with("", 4, 4);
        file.station_info = None;
        results.insert("x.csv".to_string(), file);

        let perf = network_performance(&results);
        assert_eq!(perf[0].name, "UNKNOWN");
        assert_eq!(perf[0].value, 100);
    }
}
