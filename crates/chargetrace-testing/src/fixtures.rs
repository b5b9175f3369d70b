//! Fixtures for sample session data.
//!
//! Provides:
//! - canned CSV exports covering single-day and multi-day spans;
//! - an upstream-shaped JSON payload;
//! - builders for `FileResult` values with known counters.

use anyhow::Result;
use chargetrace_types::{ConnectorSummary, FileResult, StationInfo};
use std::fs;
use std::path::{Path, PathBuf};

/// All sessions on one calendar day; connector 1 and 2 both present.
pub const SINGLE_DAY_CSV: &str = "\
Connector Id,Session Status,Start Type,Session Start Time,Session Duration,Session Energy Delivered (kWh),Session Peak Power (kW),Stop Reason
1,Completed,Remote Start,2024-01-05 09:12:00,1:00:00,30.0,55.0,
1,Failed,RFID,2024-01-05 11:40:00,0:02:00,0,0,Powerloss
2,Completed,Auto Charge,2024-01-05 17:05:00,0:30:00,12.0,27.5,
";

/// Sessions spanning two calendar days.
pub const MULTI_DAY_CSV: &str = "\
Connector Id,Session Status,Start Type,Session Start Time,Session Duration,Session Energy Delivered (kWh),Session Peak Power (kW),Stop Reason
1,Completed,Remote Start,2024-01-05 09:12:00,1:00:00,30.0,55.0,
1,Completed,Remote Start,2024-01-07 10:00:00,0:30:00,10.0,41.0,
";

/// An upstream processing payload with station metadata, as the external
/// collaborator would deliver it.
pub fn sample_payload_json() -> String {
    serde_json::json!({
        "info": [{
            "Station Alias Name": "MG Road Hub",
            "Charge Point id": "ZEON-0042",
            "OEM Name": "Exicom",
            "Power (kW)": 60,
            "Firmware Version": "2.4.1"
        }],
        "date": { "start_date": "2024-01-05", "end_date": "2024-01-07" },
        "report_1": {
            "Preparing Sessions": 12,
            "Charging Sessions": 10,
            "Successful Sessions": 8,
            "Failed / Error Stops": 2,
            "Remote Start": 6,
            "Auto Start": 2,
            "RFID Start": 2,
            "Peak Power Delivered (kW)": 55.0,
            "Avg Power per Session (kW)": 24.0
        },
        "report_2": {
            "Charging Sessions": 5,
            "Successful Sessions": 5,
            "RFID Start": 5,
            "Peak Power Delivered (kW)": 27.5,
            "Avg Power per Session (kW)": 20.0
        },
        "Connector1": [{
            "Session Status": "Failed",
            "Stop Reason": "Powerloss",
            "Session Start Time": "2024-01-05 11:40:00",
            "vendorErrorCode": "Precharging Failure",
            "is_Charging": 0
        }]
    })
    .to_string()
}

/// Write a fixture file into a test directory.
pub fn write_sample(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// A `FileResult` with the given connector-1 counters, no raw rows.
pub fn file_result(charging: u64, successful: u64, failed: u64) -> FileResult {
    FileResult {
        summary_1: Some(ConnectorSummary {
            preparing_sessions: charging + failed,
            charging_sessions: charging,
            successful_sessions: successful,
            failed_error_stops: failed,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Same, attributed to a station/charge point/OEM for grouping tests.
pub fn stationed_file_result(
    station: &str,
    charge_point: &str,
    oem: &str,
    charging: u64,
    failed: u64,
) -> FileResult {
    let mut result = file_result(charging, charging.saturating_sub(failed), failed);
    result.station_info = Some(StationInfo {
        station_name: station.to_string(),
        charge_point_id: charge_point.to_string(),
        oem_name: oem.to_string(),
        rated_power_kw: Some(60.0),
        ..Default::default()
    });
    result
}
