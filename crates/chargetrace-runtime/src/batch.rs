//! Fire-and-await-all batch processing.
//!
//! Per-file processing is the only asynchronous boundary in the system. Files
//! run concurrently with no ordering guarantee among them; each outcome lands
//! in a slot pre-allocated for its file name, so completions never contend on
//! shared state. A failed file is logged and excluded; only a batch where
//! nothing succeeded fails as a whole.

use crate::error::{Error, Result};
use crate::ingest;
use chargetrace_types::FileResult;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Outcome of one processed batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Per-file results keyed by file name.
    pub results: BTreeMap<String, FileResult>,
    pub processed: usize,
    pub failed: usize,
    /// Total raw session rows across all processed files.
    pub total_records: usize,
}

/// Expand inputs into a flat list of processable files. Directories stand in
/// for extracted archives: every `.csv`/`.json` inside becomes an independent
/// file of the batch.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in walkdir::WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
            {
                if entry.file_type().is_file() && is_processable(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

fn is_processable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("json"))
}

/// Process every file of a batch concurrently.
pub async fn process_batch(files: &[PathBuf]) -> Result<BatchOutcome> {
    // Slots are allocated up front, keyed by file name, before anything runs.
    let mut slots: Vec<(String, Option<FileResult>)> = files
        .iter()
        .map(|path| (slot_key(path), None))
        .collect();

    let tasks = files.iter().cloned().map(|path| {
        tokio::task::spawn_blocking(move || {
            let outcome = ingest::process_file(&path);
            (path, outcome)
        })
    });

    for (index, joined) in join_all(tasks).await.into_iter().enumerate() {
        match joined {
            Ok((_, Ok(result))) => slots[index].1 = Some(result),
            Ok((path, Err(err))) => {
                log::warn!("{}: processing failed, excluding from batch: {}", path.display(), err);
            }
            Err(err) => {
                log::warn!("processing task panicked, excluding from batch: {}", err);
            }
        }
    }

    let attempted = slots.len();
    let mut outcome = BatchOutcome::default();
    for (key, slot) in slots {
        match slot {
            Some(result) => {
                outcome.processed += 1;
                outcome.total_records += result.session_count();
                outcome.results.insert(unique_key(&outcome.results, key), result);
            }
            None => outcome.failed += 1,
        }
    }

    if outcome.processed == 0 && attempted > 0 {
        return Err(Error::EmptyBatch { attempted });
    }
    Ok(outcome)
}

fn slot_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Two inputs with the same file name both stay in the result set.
fn unique_key(existing: &BTreeMap<String, FileResult>, key: String) -> String {
    if !existing.contains_key(&key) {
        return key;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{key} ({counter})");
        if !existing.contains_key(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
