use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One session/connector-event as produced by the upstream processing
/// collaborator: a plain key -> value map with vendor-specific column names.
///
/// Column naming drifts between vendors and even between exports of the same
/// vendor ("Peak Power (kW)", "PeakPower", "SESSION_PEAK_POWER_KW", ...), so the
/// map is kept verbatim and all access goes through the engine's field resolver.
pub type RawRecord = Map<String, Value>;

/// Ordered rows for one connector of one source file.
pub type RawTable = Vec<RawRecord>;

/// One of the two physical charging ports of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorId {
    One,
    Two,
}

impl ConnectorId {
    pub const ALL: [ConnectorId; 2] = [ConnectorId::One, ConnectorId::Two];

    /// Key used by upstream payloads for the raw row table ("Connector1"/"Connector2").
    pub fn table_key(&self) -> &'static str {
        match self {
            ConnectorId::One => "Connector1",
            ConnectorId::Two => "Connector2",
        }
    }

    /// Key used by upstream payloads for the pre-aggregated summary.
    pub fn summary_key(&self) -> &'static str {
        match self {
            ConnectorId::One => "report_1",
            ConnectorId::Two => "report_2",
        }
    }

    /// Human-facing label ("Connector 1"/"Connector 2").
    pub fn label(&self) -> &'static str {
        match self {
            ConnectorId::One => "Connector 1",
            ConnectorId::Two => "Connector 2",
        }
    }
}

impl std::fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
