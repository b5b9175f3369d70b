use crate::record::{ConnectorId, RawRecord, RawTable};
use crate::station::StationInfo;
use crate::summary::ConnectorSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Observed session period of a file, as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "start_date", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(rename = "end_date", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Widen to cover `other`. Bounds compare as dates when both sides parse,
    /// lexicographically otherwise.
    pub fn widen(&mut self, other: &DateRange) {
        self.start = earlier(self.start.take(), other.start.clone());
        self.end = later(self.end.take(), other.end.clone());
    }
}

fn earlier(a: Option<String>, b: Option<String>) -> Option<String> {
    pick(a, b, true)
}

fn later(a: Option<String>, b: Option<String>) -> Option<String> {
    pick(a, b, false)
}

fn pick(a: Option<String>, b: Option<String>, want_min: bool) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => {
            let a_first = match (parse_date(&a), parse_date(&b)) {
                (Some(da), Some(db)) => da <= db,
                _ => a <= b,
            };
            Some(if a_first == want_min { a } else { b })
        }
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
}

/// Per-file analysis payload: station metadata, observed period, one
/// pre-aggregated summary per connector, and the raw row tables.
///
/// Created once per processed source file and immutable afterwards; cross-file
/// views are separate values built by the engine's aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_info: Option<StationInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_1: Option<ConnectorSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_2: Option<ConnectorSummary>,

    /// Raw row tables keyed "Connector1"/"Connector2".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tables: BTreeMap<String, RawTable>,
}

impl FileResult {
    /// Lenient decode of the processing collaborator's payload.
    ///
    /// The upstream shape is `{ info, date, report_1, report_2, Connector1,
    /// Connector2 }` with any subset of keys present. A sub-object that fails
    /// to decode is dropped on its own; a well-formed-but-empty payload yields
    /// a default `FileResult`.
    pub fn from_value(payload: &Value) -> FileResult {
        let Some(map) = payload.as_object() else {
            return FileResult::default();
        };

        let mut result = FileResult {
            station_info: map.get("info").and_then(StationInfo::from_value),
            date_range: map
                .get("date")
                .and_then(|v| serde_json::from_value::<DateRange>(v.clone()).ok())
                .filter(|range| !range.is_empty()),
            ..Default::default()
        };

        for connector in ConnectorId::ALL {
            if let Some(raw) = map.get(connector.summary_key()) {
                result.set_summary(
                    connector,
                    serde_json::from_value::<ConnectorSummary>(raw.clone()).ok(),
                );
            }
            if let Some(rows) = map.get(connector.table_key()).and_then(Value::as_array) {
                let table: RawTable = rows
                    .iter()
                    .filter_map(|row| row.as_object().cloned())
                    .collect();
                if !table.is_empty() {
                    result.tables.insert(connector.table_key().to_string(), table);
                }
            }
        }

        result
    }

    pub fn summary(&self, connector: ConnectorId) -> Option<&ConnectorSummary> {
        match connector {
            ConnectorId::One => self.summary_1.as_ref(),
            ConnectorId::Two => self.summary_2.as_ref(),
        }
    }

    pub fn set_summary(&mut self, connector: ConnectorId, summary: Option<ConnectorSummary>) {
        match connector {
            ConnectorId::One => self.summary_1 = summary,
            ConnectorId::Two => self.summary_2 = summary,
        }
    }

    /// Raw rows for one connector; absent tables read as empty.
    pub fn table(&self, connector: ConnectorId) -> &[RawRecord] {
        self.tables
            .get(connector.table_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All raw rows of the file, both connectors, in table order.
    pub fn all_rows(&self) -> impl Iterator<Item = &RawRecord> {
        ConnectorId::ALL
            .into_iter()
            .flat_map(|connector| self.table(connector).iter())
    }

    /// Both summaries folded into a combined view (element-wise sums).
    pub fn combined_summary(&self) -> ConnectorSummary {
        let mut combined = ConnectorSummary::default();
        // Peak/avg here only carry the pre-aggregated fallback values; the
        // engine recomputes power metrics from raw rows where possible.
        if let Some(summary) = &self.summary_1 {
            combined.accumulate(summary);
        }
        if let Some(summary) = &self.summary_2 {
            combined.accumulate(summary);
        }
        combined
    }

    pub fn session_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}
