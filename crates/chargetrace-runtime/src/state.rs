//! Externally-owned analysis state.
//!
//! The shell that embeds the engine owns persistence and lifetime of this
//! state (including clearing it on inactivity); the core only offers a
//! snapshot/restore contract and pure resolution over whatever state it is
//! handed. A fresh/empty state behaves exactly like a restored one.

use crate::batch::BatchOutcome;
use chargetrace_engine::{ActiveResult, FilterSelection, resolve_active};
use chargetrace_types::FileResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisState {
    #[serde(default)]
    pub results: BTreeMap<String, FileResult>,

    #[serde(default)]
    pub selection: FilterSelection,
}

impl AnalysisState {
    pub fn from_outcome(outcome: BatchOutcome) -> Self {
        AnalysisState {
            results: outcome.results,
            selection: FilterSelection::default(),
        }
    }

    /// Resolve the active dataset for the current selection.
    pub fn active(&self) -> ActiveResult {
        resolve_active(&self.selection, &self.results)
    }

    /// Serialize for the owning shell to persist.
    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a snapshot. Unreadable snapshots fall back to the empty state:
    /// a stale or corrupt persistence layer must never block a new session.
    pub fn restore(snapshot: &str) -> Self {
        serde_json::from_str(snapshot).unwrap_or_else(|err| {
            log::warn!("discarding unreadable state snapshot: {}", err);
            AnalysisState::default()
        })
    }
}
