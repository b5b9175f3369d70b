//! Cross-file aggregation into a single `FileResult`-shaped view.

use chargetrace_types::{ConnectorId, ConnectorSummary, DateRange, FileResult};

/// Merge a set of file results into one aggregate.
///
/// Summary counters sum element-wise per connector, raw tables concatenate,
/// date ranges widen. Counter summation is order-independent; a singleton set
/// aggregates to its sole element unchanged.
///
/// Station info survives only when every contributing file reports the same
/// charge point - an aggregate spanning different hardware has no single
/// nameplate to show.
pub fn aggregate_results<'a, I>(files: I) -> FileResult
where
    I: IntoIterator<Item = &'a FileResult>,
{
    let files: Vec<&FileResult> = files.into_iter().collect();

    match files.as_slice() {
        [] => FileResult::default(),
        [only] => (*only).clone(),
        many => merge(many),
    }
}

fn merge(files: &[&FileResult]) -> FileResult {
    let mut out = FileResult::default();

    for connector in ConnectorId::ALL {
        let mut acc: Option<ConnectorSummary> = None;
        for file in files {
            if let Some(summary) = file.summary(connector) {
                acc.get_or_insert_with(Default::default).accumulate(summary);
            }
        }
        out.set_summary(connector, acc);
    }

    for file in files {
        for (key, table) in &file.tables {
            out.tables
                .entry(key.clone())
                .or_default()
                .extend(table.iter().cloned());
        }

        if let Some(range) = &file.date_range {
            out.date_range
                .get_or_insert_with(DateRange::default)
                .widen(range);
        }
    }

    let mut infos = files.iter().filter_map(|file| file.station_info.as_ref());
    if let Some(first) = infos.next() {
        if infos.all(|info| info.charge_point_id == first.charge_point_id) {
            out.station_info = Some(first.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargetrace_types::{ConnectorSummary, StationInfo};
    use serde_json::json;

    fn file(charging: u64, successful: u64) -> FileResult {
        FileResult {
            summary_1: Some(ConnectorSummary {
                charging_sessions: charging,
                successful_sessions: successful,
                ..Default::default()
            }),
            tables: [(
                "Connector1".to_string(),
                vec![json!({ "Session Status": "Completed" }).as_object().unwrap().clone()],
            )]
            .into(),
            ..Default::default()
        }
    }

    #[test]
    fn singleton_aggregation_is_identity() {
        let a = file(10, 8);
        let aggregate = aggregate_results([&a]);
        assert_eq!(aggregate.summary_1, a.summary_1);
        assert_eq!(aggregate.tables, a.tables);
    }

    #[test]
    fn counter_summation_is_order_independent() {
        let a = file(10, 8);
        let b = file(5, 5);
        let ab = aggregate_results([&a, &b]);
        let ba = aggregate_results([&b, &a]);
        assert_eq!(ab.summary_1, ba.summary_1);
        assert_eq!(ab.summary_1.as_ref().unwrap().charging_sessions, 15);
        assert_eq!(ab.summary_1.as_ref().unwrap().success_rate_pct(), 87);
        assert_eq!(ab.table(ConnectorId::One).len(), 2);
    }

    #[test]
    fn connector_absent_everywhere_stays_absent() {
        let aggregate = aggregate_results([&file(1, 1), &file(2, 2)]);
        assert!(aggregate.summary_2.is_none());
    }

    #[test]
    fn station_info_survives_only_for_a_single_charge_point() {
        let mut a = file(1, 1);
        let mut b = file(2, 2);
        a.station_info = Some(StationInfo { charge_point_id: "CP-1".into(), ..Default::default() });
        b.station_info = Some(StationInfo { charge_point_id: "CP-1".into(), ..Default::default() });
        assert!(aggregate_results([&a, &b]).station_info.is_some());

        b.station_info = Some(StationInfo { charge_point_id: "CP-2".into(), ..Default::default() });
        assert!(aggregate_results([&a, &b]).station_info.is_none());
    }

    #[test]
    fn date_ranges_widen() {
        let mut a = file(1, 1);
        let mut b = file(1, 1);
        a.date_range = Some(DateRange { start: Some("2024-01-05".into()), end: Some("2024-01-06".into()) });
        b.date_range = Some(DateRange { start: Some("2024-01-03".into()), end: Some("2024-01-09".into()) });
        let range = aggregate_results([&a, &b]).date_range.unwrap();
        assert_eq!(range.start.as_deref(), Some("2024-01-03"));
        assert_eq!(range.end.as_deref(), Some("2024-01-09"));
    }
}
