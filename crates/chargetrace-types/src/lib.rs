// Types layer - Domain model shared by every other crate
// No I/O here: raw session rows come in as already-deserialized JSON maps
// and everything downstream is pure data.

pub mod record;
pub mod result;
pub mod station;
pub mod summary;

pub use record::{ConnectorId, RawRecord, RawTable};
pub use result::{DateRange, FileResult};
pub use station::StationInfo;
pub use summary::ConnectorSummary;
