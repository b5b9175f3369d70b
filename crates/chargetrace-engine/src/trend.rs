//! Time-bucketed power trend series for charting.

use crate::duration;
use crate::fields::{self, aliases};
use chargetrace_types::RawRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Granularity of the produced series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMode {
    /// Group by hour-of-day when all rows share a calendar day, by day
    /// otherwise. The default.
    #[default]
    Bucketed,
    /// One point per session row, ordered by timestamp.
    PerRow,
}

/// One charted point. `sort_key` is the hour of day for same-day hourly
/// buckets and epoch milliseconds otherwise; consumers only rely on it being
/// ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub sort_key: i64,
    pub peak: f64,
    pub avg: f64,
}

/// Build the power trend for a set of raw session rows.
///
/// Rows without a parsable date/time field are dropped. Output is strictly
/// ascending by `sort_key`, all values rounded to two decimals.
pub fn build_trend(rows: &[RawRecord], mode: TrendMode) -> Vec<TrendPoint> {
    let mut dated: Vec<(NaiveDateTime, &RawRecord)> = rows
        .iter()
        .filter_map(|row| {
            let ts = parse_timestamp(fields::resolve(row, aliases::SESSION_START)?)?;
            Some((ts, row))
        })
        .collect();
    if dated.is_empty() {
        return Vec::new();
    }
    dated.sort_by_key(|(ts, _)| *ts);

    let same_day = dated[0].0.date() == dated[dated.len() - 1].0.date();

    match mode {
        TrendMode::Bucketed => build_buckets(&dated, same_day),
        TrendMode::PerRow => build_per_row(&dated, same_day),
    }
}

#[derive(Default)]
struct Bucket {
    label: String,
    max_peak: f64,
    total_energy: f64,
    total_duration_hours: f64,
    avg_power_values: Vec<f64>,
}

fn build_buckets(dated: &[(NaiveDateTime, &RawRecord)], same_day: bool) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();

    for (ts, row) in dated {
        let (sort_key, label) = if same_day {
            (ts.hour() as i64, format!("{}:00", ts.hour()))
        } else {
            (day_start_millis(ts.date()), ts.date().format("%b %-d").to_string())
        };

        let bucket = buckets.entry(sort_key).or_default();
        bucket.label = label;

        let peak = fields::resolve_f64(row, aliases::PEAK_POWER).unwrap_or(0.0);
        if peak > 0.0 {
            bucket.max_peak = bucket.max_peak.max(peak);
        }
        let energy = fields::resolve_f64(row, aliases::ENERGY).unwrap_or(0.0);
        if energy > 0.0 {
            bucket.total_energy += energy;
        }
        let hours = duration::to_hours(fields::resolve(row, aliases::DURATION));
        if hours > 0.0 {
            bucket.total_duration_hours += hours;
        }
        if let Some(avg) = fields::resolve_f64(row, aliases::AVG_POWER).filter(|v| *v > 0.0) {
            bucket.avg_power_values.push(avg);
        }
    }

    buckets
        .into_iter()
        .map(|(sort_key, bucket)| {
            let avg = if bucket.total_duration_hours > 0.0 {
                bucket.total_energy / bucket.total_duration_hours
            } else {
                mean(&bucket.avg_power_values)
            };
            TrendPoint {
                label: bucket.label,
                sort_key,
                peak: round2(bucket.max_peak),
                avg: round2(avg),
            }
        })
        .collect()
}

fn build_per_row(dated: &[(NaiveDateTime, &RawRecord)], same_day: bool) -> Vec<TrendPoint> {
    dated
        .iter()
        .map(|(ts, row)| {
            let label = if same_day {
                ts.format("%H:%M").to_string()
            } else {
                ts.format("%b %-d %H:%M").to_string()
            };
            let peak = fields::resolve_f64(row, aliases::PEAK_POWER).unwrap_or(0.0);
            let energy = fields::resolve_f64(row, aliases::ENERGY).unwrap_or(0.0);
            let hours = duration::to_hours(fields::resolve(row, aliases::DURATION));
            let avg = if hours > 0.0 {
                energy / hours
            } else {
                fields::resolve_f64(row, aliases::AVG_POWER)
                    .filter(|v| *v > 0.0)
                    .unwrap_or(0.0)
            };
            TrendPoint {
                label,
                sort_key: ts.and_utc().timestamp_millis(),
                peak: round2(peak),
                avg: round2(avg),
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Parse the handful of timestamp shapes seen in vendor exports. Numbers are
/// epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(start: &str, peak: f64, energy: f64, duration: &str) -> RawRecord {
        json!({
            "Session Start Time": start,
            "Session Peak Power (kW)": peak,
            "Session Energy Delivered (kWh)": energy,
            "Session Duration": duration,
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn same_day_buckets_by_hour() {
        let rows = vec![
            row("2024-01-05 09:12:00", 40.0, 10.0, "0:30:00"),
            row("2024-01-05 09:48:00", 55.0, 20.0, "0:30:00"),
            row("2024-01-05 17:05:00", 30.0, 15.0, "1:00:00"),
        ];
        let trend = build_trend(&rows, TrendMode::Bucketed);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label, "9:00");
        assert_eq!(trend[0].sort_key, 9);
        assert_eq!(trend[0].peak, 55.0);
        // 30 kWh over 1h
        assert_eq!(trend[0].avg, 30.0);
        assert_eq!(trend[1].label, "17:00");
    }

    #[test]
    fn multi_day_buckets_by_day() {
        let rows = vec![
            row("2024-01-07 10:00:00", 20.0, 5.0, "0:30:00"),
            row("2024-01-05 09:00:00", 40.0, 10.0, "0:30:00"),
            row("2024-01-05 19:00:00", 45.0, 10.0, "0:30:00"),
        ];
        let trend = build_trend(&rows, TrendMode::Bucketed);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label, "Jan 5");
        assert_eq!(trend[1].label, "Jan 7");
        assert!(trend[0].sort_key < trend[1].sort_key);
        assert_eq!(trend[0].peak, 45.0);
    }

    #[test]
    fn unparsable_dates_are_dropped() {
        let mut rows = vec![row("2024-01-05 09:00:00", 40.0, 10.0, "0:30:00")];
        rows.push(
            json!({ "Session Start Time": "soon", "Session Peak Power (kW)": 99 })
                .as_object()
                .unwrap()
                .clone(),
        );
        rows.push(json!({ "Session Peak Power (kW)": 99 }).as_object().unwrap().clone());
        let trend = build_trend(&rows, TrendMode::Bucketed);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].peak, 40.0);
    }

    #[test]
    fn per_row_mode_emits_one_point_per_session() {
        let rows = vec![
            row("2024-01-05 10:30:00", 20.0, 10.0, "1:00:00"),
            row("2024-01-05 09:15:00", 40.0, 12.0, "0:30:00"),
        ];
        let trend = build_trend(&rows, TrendMode::PerRow);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label, "09:15");
        assert_eq!(trend[0].avg, 24.0);
        assert!(trend[0].sort_key < trend[1].sort_key);
    }

    #[test]
    fn values_round_to_two_decimals() {
        let rows = vec![row("2024-01-05 09:00:00", 33.333, 10.0, "0:45:00")];
        let trend = build_trend(&rows, TrendMode::Bucketed);
        assert_eq!(trend[0].peak, 33.33);
        assert_eq!(trend[0].avg, 13.33);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(build_trend(&[], TrendMode::Bucketed).is_empty());
    }
}
