use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pre-aggregated per-connector counters as delivered by the processing
/// collaborator.
///
/// Serde names match the upstream payload verbatim so a `report_1`/`report_2`
/// object deserializes directly. Every field is defaulted: a connector that
/// never saw traffic arrives as an empty object (or not at all).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSummary {
    #[serde(rename = "Preparing Sessions", default)]
    pub preparing_sessions: u64,

    #[serde(rename = "Charging Sessions", default)]
    pub charging_sessions: u64,

    #[serde(rename = "Successful Sessions", default)]
    pub successful_sessions: u64,

    #[serde(rename = "Failed / Error Stops", default)]
    pub failed_error_stops: u64,

    #[serde(rename = "Remote Start", default)]
    pub remote_start: u64,

    #[serde(rename = "Auto Start", default)]
    pub auto_start: u64,

    #[serde(rename = "RFID Start", default)]
    pub rfid_start: u64,

    #[serde(rename = "Peak Power Delivered (kW)", default)]
    pub peak_power_kw: f64,

    #[serde(rename = "Avg Power per Session (kW)", default)]
    pub avg_power_per_session_kw: f64,

    /// Error-code tallies for sessions that still completed.
    #[serde(
        rename = "Successful Error Summary",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub successful_errors: BTreeMap<String, u64>,

    /// Error-code tallies for failed/error stops.
    #[serde(
        rename = "Failed / Error Error Summary",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub failed_errors: BTreeMap<String, u64>,
}

impl ConnectorSummary {
    /// Success rate over charging sessions, rounded to a whole percent.
    /// Zero charging sessions reads as 0%.
    pub fn success_rate_pct(&self) -> u64 {
        rate_pct(self.successful_sessions, self.charging_sessions)
    }

    /// Element-wise accumulation used by cross-file aggregation.
    ///
    /// Integer counters sum. Peak power takes the max (a fleet's peak is the
    /// highest single reading, not a sum); the session-average is folded as a
    /// charging-session-weighted mean so that group order does not matter.
    pub fn accumulate(&mut self, other: &ConnectorSummary) {
        let (own_w, other_w) = (self.charging_sessions as f64, other.charging_sessions as f64);
        self.avg_power_per_session_kw = if own_w + other_w > 0.0 {
            (self.avg_power_per_session_kw * own_w + other.avg_power_per_session_kw * other_w)
                / (own_w + other_w)
        } else {
            0.0
        };

        self.preparing_sessions += other.preparing_sessions;
        self.charging_sessions += other.charging_sessions;
        self.successful_sessions += other.successful_sessions;
        self.failed_error_stops += other.failed_error_stops;
        self.remote_start += other.remote_start;
        self.auto_start += other.auto_start;
        self.rfid_start += other.rfid_start;
        self.peak_power_kw = self.peak_power_kw.max(other.peak_power_kw);

        for (code, count) in &other.successful_errors {
            *self.successful_errors.entry(code.clone()).or_insert(0) += count;
        }
        for (code, count) in &other.failed_errors {
            *self.failed_errors.entry(code.clone()).or_insert(0) += count;
        }
    }
}

/// `round(100 * part / total)`, 0 when total is 0.
pub fn rate_pct(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upstream_names() {
        let raw = serde_json::json!({
            "Preparing Sessions": 12,
            "Charging Sessions": 10,
            "Successful Sessions": 8,
            "Failed / Error Stops": 2,
            "Remote Start": 5,
            "Auto Start": 3,
            "RFID Start": 2,
            "Peak Power Delivered (kW)": 57.2,
            "Avg Power per Session (kW)": 31.5,
            "Failed / Error Error Summary": { "Powerloss": 2 }
        });

        let summary: ConnectorSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.preparing_sessions, 12);
        assert_eq!(summary.failed_error_stops, 2);
        assert_eq!(summary.failed_errors.get("Powerloss"), Some(&2));
        assert_eq!(summary.success_rate_pct(), 80);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let summary: ConnectorSummary = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(summary, ConnectorSummary::default());
        assert_eq!(summary.success_rate_pct(), 0);
    }

    #[test]
    fn accumulate_sums_counters_and_maxes_peak() {
        let mut a = ConnectorSummary {
            charging_sessions: 10,
            successful_sessions: 8,
            peak_power_kw: 40.0,
            avg_power_per_session_kw: 20.0,
            ..Default::default()
        };
        let b = ConnectorSummary {
            charging_sessions: 5,
            successful_sessions: 5,
            peak_power_kw: 55.0,
            avg_power_per_session_kw: 35.0,
            ..Default::default()
        };

        a.accumulate(&b);
        assert_eq!(a.charging_sessions, 15);
        assert_eq!(a.successful_sessions, 13);
        assert_eq!(a.peak_power_kw, 55.0);
        assert_eq!(a.success_rate_pct(), 87);
        assert!((a.avg_power_per_session_kw - 25.0).abs() < 1e-9);
    }
}
