use crate::record::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Station metadata extracted from the zero-or-one `info` record of a file.
///
/// Vendors disagree on casing and spacing here just like in session rows, and
/// some exports carry the record as a JSON-encoded string instead of an object.
/// Extraction is therefore best-effort: a field that cannot be located reads as
/// "Unknown" (or `None` for the rated power) and never fails the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub station_name: String,
    pub charge_point_id: String,
    pub oem_name: String,
    /// Rated station capacity in kW; drives the power-quality styling threshold.
    pub rated_power_kw: Option<f64>,
    pub firmware: String,
}

impl Default for StationInfo {
    fn default() -> Self {
        Self {
            station_name: UNKNOWN.to_string(),
            charge_point_id: UNKNOWN.to_string(),
            oem_name: UNKNOWN.to_string(),
            rated_power_kw: None,
            firmware: UNKNOWN.to_string(),
        }
    }
}

pub const UNKNOWN: &str = "Unknown";

impl StationInfo {
    /// Extract from a metadata record, tolerating naming drift.
    pub fn from_record(record: &RawRecord) -> Self {
        StationInfo {
            station_name: text_field(record, &["Station Alias Name", "Station Name", "Station"]),
            charge_point_id: text_field(record, &["Charge Point id", "Charge Point ID", "Chargepoint Id", "CP Id"]),
            oem_name: text_field(record, &["OEM Name", "OEM", "Manufacturer"]),
            rated_power_kw: number_field(record, &["Power (kW)", "Rated Power (kW)", "Rated Power"]),
            firmware: text_field(record, &["Firmware Version", "Firmware", "FW Version"]),
        }
    }

    /// Lenient parse of the upstream `info` payload.
    ///
    /// Accepts an object, a non-empty array of objects (first entry wins), or a
    /// JSON-encoded string of either. Anything else resolves to `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = match value {
            Value::Object(map) => Some(map.clone()),
            Value::Array(items) => items.first().and_then(|v| v.as_object().cloned()),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(inner) if !matches!(inner, Value::String(_)) => {
                    return Self::from_value(&inner);
                }
                Ok(_) | Err(_) => {
                    log::debug!("station info payload could not be interpreted, defaulting fields");
                    None
                }
            },
            _ => None,
        }?;
        Some(Self::from_record(&record))
    }
}

fn text_field(record: &RawRecord, candidates: &[&str]) -> String {
    lookup(record, candidates)
        .and_then(value_as_text)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn number_field(record: &RawRecord, candidates: &[&str]) -> Option<f64> {
    match lookup(record, candidates)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Case-insensitive, whitespace-trimmed key lookup.
fn lookup<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a Value> {
    for candidate in candidates {
        let wanted = candidate.trim().to_lowercase();
        let found = record
            .iter()
            .find(|(key, value)| key.trim().to_lowercase() == wanted && !value.is_null());
        if let Some((_, value)) = found {
            return Some(value);
        }
    }
    None
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_known_fields() {
        let record = json!({
            "Station Alias Name": "MG Road Hub",
            "Charge Point id": "ZEON-0042",
            "OEM Name": "Exicom",
            "Power (kW)": 60,
            "Firmware Version": "2.4.1"
        });
        let info = StationInfo::from_record(record.as_object().unwrap());
        assert_eq!(info.station_name, "MG Road Hub");
        assert_eq!(info.charge_point_id, "ZEON-0042");
        assert_eq!(info.rated_power_kw, Some(60.0));
    }

    #[test]
    fn tolerates_casing_drift_and_missing_fields() {
        let record = json!({ "station alias name": "Airport East", "power (kw)": "30.5" });
        let info = StationInfo::from_record(record.as_object().unwrap());
        assert_eq!(info.station_name, "Airport East");
        assert_eq!(info.rated_power_kw, Some(30.5));
        assert_eq!(info.oem_name, UNKNOWN);
        assert_eq!(info.firmware, UNKNOWN);
    }

    #[test]
    fn parses_string_encoded_array_payload() {
        let payload = Value::String(r#"[{"OEM Name": "Delta", "Power (kW)": 120}]"#.to_string());
        let info = StationInfo::from_value(&payload).unwrap();
        assert_eq!(info.oem_name, "Delta");
        assert_eq!(info.rated_power_kw, Some(120.0));
    }

    #[test]
    fn malformed_payload_resolves_to_none() {
        assert_eq!(StationInfo::from_value(&Value::String("{not json".into())), None);
        assert_eq!(StationInfo::from_value(&Value::Bool(true)), None);
    }
}
