// Runtime module - Batch orchestration around the pure engine
// The per-file processing call is the only asynchronous boundary; everything
// the engine does afterwards is synchronous over in-memory data.

pub mod batch;
pub mod config;
pub mod error;
pub mod ingest;
pub mod state;

pub use batch::{BatchOutcome, expand_inputs, process_batch};
pub use config::{Config, ReportConfig, TrendConfig};
pub use error::{Error, Result};
pub use ingest::process_file;
pub use state::AnalysisState;
