//! Alias-based field resolution across arbitrarily-named row keys.
//!
//! Vendors never agree on column names, so every logical field is described by
//! an ordered candidate list and looked up through [`resolve`]. Resolution
//! failures are not errors: callers get `None` and substitute their documented
//! default (`0` for numeric fields, `"Unknown"` for categorical ones).

use chargetrace_types::RawRecord;
use serde_json::Value;

/// Candidate name lists for every logical field the engine reads.
///
/// Order matters: earlier names are the ones trusted vendors actually emit,
/// later ones are drift observed in the wild.
pub mod aliases {
    pub const PEAK_POWER: &[&str] = &[
        "Session Peak Power (kW)",
        "Peak Power Delivered (kW)",
        "Peak Power (kW)",
        "Peak Power",
        "Max Power",
        "Power (kW)",
    ];

    pub const ENERGY: &[&str] = &[
        "Session Energy Delivered (kWh)",
        "Energy Mode (kWh)",
        "Energy Delivered (kWh)",
        "Energy (kWh)",
    ];

    pub const DURATION: &[&str] = &[
        "Session Duration",
        "Duration",
        "Charging Time",
        "Session Duration (min)",
        "Duration (min)",
    ];

    pub const SESSION_START: &[&str] = &["Session Start Time", "Start Time", "Date", "Started"];

    pub const STATUS: &[&str] = &["STOP", "Stop", "Status", "Session Status"];

    /// Stop-reason fields come before vendor/error-code fields on purpose: the
    /// reason text is the more specific signal when both are present.
    pub const STOP_REASON: &[&str] = &[
        "STOPREASON",
        "Stop Reason",
        "StopReason",
        "REASON",
        "Reason",
        "VENDORERRORCODE",
        "VendorErrorCode",
        "ERRORCODE",
        "ErrorCode",
    ];

    pub const AVG_POWER: &[&str] = &[
        "Avg Power per Session (kW)",
        "Average Power (kW)",
        "Avg Power (kW)",
    ];
}

/// Minimum cleaned-candidate length for the fuzzy pass. Shorter candidates
/// (e.g. "id") would collide with half the keys in a typical export.
const MIN_FUZZY_LEN: usize = 3;

/// Resolve a logical field against a record, first match wins.
///
/// Two passes over the candidate list:
/// 1. exact key match, in candidate priority order;
/// 2. case-insensitive match after stripping non-alphanumerics from both
///    sides, skipping candidates whose cleaned form is shorter than three
///    characters.
///
/// A null value counts as absent and the search continues.
pub fn resolve<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a Value> {
    for candidate in candidates {
        if let Some(value) = record.get(*candidate).filter(|v| !v.is_null()) {
            return Some(value);
        }
    }

    for candidate in candidates {
        let cleaned = clean_key(candidate);
        if cleaned.len() < MIN_FUZZY_LEN {
            continue;
        }
        let found = record
            .iter()
            .find(|(key, value)| !value.is_null() && clean_key(key) == cleaned);
        if let Some((_, value)) = found {
            return Some(value);
        }
    }

    None
}

/// Resolve a numeric field. Numeric strings parse; anything else is absent.
pub fn resolve_f64(record: &RawRecord, candidates: &[&str]) -> Option<f64> {
    match resolve(record, candidates)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Resolve a field to display text.
pub fn resolve_text(record: &RawRecord, candidates: &[&str]) -> Option<String> {
    match resolve(record, candidates)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve an error-reason text field, one candidate at a time.
///
/// Unlike numeric fields, a resolved `0` is *not* a reason; neither are empty
/// strings, `"null"` nor `"noerror"` (case-insensitive). Any of those makes the
/// resolver fall through to the next candidate. This asymmetry with numeric
/// resolution is deliberate.
pub fn resolve_reason(record: &RawRecord, candidates: &[&str]) -> Option<String> {
    for candidate in candidates {
        let Some(value) = resolve(record, &[candidate]) else {
            continue;
        };
        let text = match value {
            Value::Number(n) if n.as_f64() == Some(0.0) => continue,
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim_matches('"').to_string(),
        };
        if text.is_empty() {
            continue;
        }
        let lowered = text.to_lowercase();
        if lowered == "null" || lowered == "noerror" {
            continue;
        }
        return Some(text);
    }
    None
}

/// Lowercase and strip everything that is not ASCII-alphanumeric.
fn clean_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
