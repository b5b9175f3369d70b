//! Active-dataset resolution across the three overlapping filter dimensions.

use crate::aggregate::aggregate_results;
use chargetrace_types::FileResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel label for the cross-file aggregate view.
pub const ALL_FILES: &str = "All Files";

/// A single filter dimension: everything, or one concrete key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

/// The three mutually-exclusive-in-effect filter dimensions.
///
/// Setting any dimension to a concrete value resets the other two - a
/// selection change is one atomic transition, two dimensions are never
/// concrete at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub file: Selector,
    pub charge_point: Selector,
    pub station: Selector,
}

impl FilterSelection {
    pub fn select_file(&mut self, name: impl Into<String>) {
        *self = FilterSelection {
            file: Selector::Only(name.into()),
            ..Default::default()
        };
    }

    pub fn select_charge_point(&mut self, id: impl Into<String>) {
        *self = FilterSelection {
            charge_point: Selector::Only(id.into()),
            ..Default::default()
        };
    }

    pub fn select_station(&mut self, name: impl Into<String>) {
        *self = FilterSelection {
            station: Selector::Only(name.into()),
            ..Default::default()
        };
    }

    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }
}

/// The dataset a selection resolves to: a display label plus the (possibly
/// aggregated) result.
#[derive(Debug, Clone)]
pub struct ActiveResult {
    pub label: String,
    pub result: FileResult,
}

/// Partition file names by the charge-point id found in their station
/// metadata. Missing or malformed metadata groups under "Unknown".
pub fn group_by_charge_point(results: &BTreeMap<String, FileResult>) -> BTreeMap<String, Vec<String>> {
    group_by(results, |file| {
        file.station_info
            .as_ref()
            .map(|info| info.charge_point_id.clone())
    })
}

/// Partition file names by station name, same defaulting rules.
pub fn group_by_station(results: &BTreeMap<String, FileResult>) -> BTreeMap<String, Vec<String>> {
    group_by(results, |file| {
        file.station_info.as_ref().map(|info| info.station_name.clone())
    })
}

fn group_by<F>(results: &BTreeMap<String, FileResult>, key_of: F) -> BTreeMap<String, Vec<String>>
where
    F: Fn(&FileResult) -> Option<String>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, file) in results {
        if name == ALL_FILES {
            continue;
        }
        let key = key_of(file)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        groups.entry(key).or_default().push(name.clone());
    }
    groups
}

/// Resolve the active dataset for a selection.
///
/// Precedence, highest first: concrete file, concrete charge point (aggregate
/// of all files sharing that id), concrete station (same by station name),
/// the global all-files aggregate. A concrete file selection returns that
/// file's result untouched; concrete keys that match nothing resolve to an
/// empty result rather than failing.
pub fn resolve_active(
    selection: &FilterSelection,
    results: &BTreeMap<String, FileResult>,
) -> ActiveResult {
    if let Selector::Only(name) = &selection.file {
        return ActiveResult {
            label: name.clone(),
            result: results.get(name).cloned().unwrap_or_default(),
        };
    }

    if let Selector::Only(id) = &selection.charge_point {
        let groups = group_by_charge_point(results);
        return aggregate_group(format!("Charge Point {id}"), groups.get(id), results);
    }

    if let Selector::Only(name) = &selection.station {
        let groups = group_by_station(results);
        return aggregate_group(name.clone(), groups.get(name), results);
    }

    let everything: Vec<&FileResult> = results
        .iter()
        .filter(|(name, _)| name.as_str() != ALL_FILES)
        .map(|(_, file)| file)
        .collect();
    ActiveResult {
        label: ALL_FILES.to_string(),
        result: aggregate_results(everything),
    }
}

fn aggregate_group(
    label: String,
    members: Option<&Vec<String>>,
    results: &BTreeMap<String, FileResult>,
) -> ActiveResult {
    let files: Vec<&FileResult> = members
        .map(|names| names.iter().filter_map(|name| results.get(name)).collect())
        .unwrap_or_default();
    ActiveResult {
        label,
        result: aggregate_results(files),
    }
}
