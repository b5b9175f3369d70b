//! Session-duration reconciliation.
//!
//! Exports encode duration three ways: bare numbers (minutes), "H:MM:SS"
//! strings, and "MM:SS" strings. Two-part strings are minutes:seconds, not
//! hours:minutes - that convention is carried over from the upstream data
//! unchanged, mismatched as it looks next to the three-part form.

use serde_json::Value;

/// Convert a raw duration value to fractional hours.
///
/// - numeric input is minutes, divided by 60;
/// - `"H:MM:SS"` is `h + m/60 + s/3600`;
/// - `"MM:SS"` is `m/60 + s/3600`;
/// - anything else (including absent or unparsable input) is `0.0`.
///
/// The result is clamped to be non-negative.
pub fn to_hours(raw: Option<&Value>) -> f64 {
    let hours = match raw {
        Some(Value::Number(n)) => n.as_f64().map(|minutes| minutes / 60.0).unwrap_or(0.0),
        Some(Value::String(s)) => string_to_hours(s),
        _ => 0.0,
    };
    hours.max(0.0)
}

fn string_to_hours(raw: &str) -> f64 {
    let parsed: Result<Vec<f64>, _> = raw
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<f64>())
        .collect();
    let Ok(parts) = parsed else {
        return 0.0;
    };

    match parts.as_slice() {
        [h, m, s] => h + m / 60.0 + s / 3600.0,
        [m, s] => m / 60.0 + s / 3600.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_input_is_minutes() {
        assert_eq!(to_hours(Some(&json!(90))), 1.5);
        assert_eq!(to_hours(Some(&json!(90.0))), 1.5);
    }

    #[test]
    fn three_part_strings_are_h_mm_ss() {
        assert_eq!(to_hours(Some(&json!("1:30:00"))), 1.5);
        assert!((to_hours(Some(&json!("0:05:30"))) - 0.091_666_666).abs() < 1e-6);
    }

    #[test]
    fn two_part_strings_are_mm_ss() {
        // Minutes:seconds by convention, so 45:00 is three quarters of an hour.
        assert_eq!(to_hours(Some(&json!("45:00"))), 0.75);
    }

    #[test]
    fn junk_shapes_collapse_to_zero() {
        assert_eq!(to_hours(None), 0.0);
        assert_eq!(to_hours(Some(&json!(null))), 0.0);
        assert_eq!(to_hours(Some(&json!("ninety"))), 0.0);
        assert_eq!(to_hours(Some(&json!("1:2:3:4"))), 0.0);
        assert_eq!(to_hours(Some(&json!("12"))), 0.0);
        assert_eq!(to_hours(Some(&json!(["45:00"]))), 0.0);
    }

    #[test]
    fn negative_durations_clamp_to_zero() {
        assert_eq!(to_hours(Some(&json!(-30))), 0.0);
    }
}
