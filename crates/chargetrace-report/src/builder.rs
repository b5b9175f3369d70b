//! Builds the charger-health report plan from computed metrics.
//!
//! Layout only: all numbers arrive pre-computed from the engine; all drawing
//! happens in a rendering backend.

use crate::paginator::{DEFAULT_LINES_PER_PAGE, Paginator};
use crate::plan::{Block, Cell, ColumnKind, Document, Table, TableRow, Tone};
use chargetrace_engine::{breakdown, filter::ALL_FILES, metrics};
use chargetrace_types::{ConnectorId, ConnectorSummary, FileResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub lines_per_page: usize,
    /// Shown in the header area ("Generated: ..."); the caller owns the clock.
    pub generated_at: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            generated_at: None,
        }
    }
}

/// Marker rendered for power values that could not be computed at all.
pub const NO_DATA: &str = "\u{2014}";

/// Success rates strictly above this read as "good".
const GOOD_RATE_PCT: u64 = 60;

/// Peak power is "good" when it exceeds this share of the rated capacity.
const CAPACITY_SHARE: f64 = 0.9;

/// Lay out one report for a single (possibly aggregated) file result.
pub fn build_report(title: &str, file: &FileResult, options: &ReportOptions) -> Document {
    let mut paginator = Paginator::new(options.lines_per_page);
    build_into(&mut paginator, title, file, options);
    paginator.finish()
}

/// Lay out one report per file, ordered by file name, skipping the synthetic
/// all-files key. Each report starts on a fresh page.
pub fn build_batch_report(
    results: &BTreeMap<String, FileResult>,
    options: &ReportOptions,
) -> Document {
    let mut paginator = Paginator::new(options.lines_per_page);
    let mut first = true;
    for (name, file) in results {
        if name == ALL_FILES {
            continue;
        }
        if !first {
            paginator.begin_section_on_new_page(&[]);
        }
        build_into(&mut paginator, name, file, options);
        first = false;
    }
    paginator.finish()
}

struct ColumnContent {
    kind: ColumnKind,
    summary: ConnectorSummary,
    power: metrics::PowerFigures,
    precharging: usize,
    errors: Vec<breakdown::Breakdown>,
    rated_threshold: Option<f64>,
}

fn build_into(paginator: &mut Paginator, title: &str, file: &FileResult, options: &ReportOptions) {
    render_header(paginator, title, file, options);

    let columns = collect_columns(file);
    let kinds: Vec<ColumnKind> = columns.iter().map(|c| c.kind).collect();

    // Summary section: all columns start aligned on the active page.
    let mut cursors = paginator.begin_section(&kinds);
    for (cursor, content) in cursors.iter_mut().zip(&columns) {
        paginator.place(cursor, Block::SectionHeader(content.kind.label().to_string()));
        render_summary_column(paginator, cursor, content);
    }
    paginator.end_section(&cursors);

    // Detail section: same parallel-column mechanism, fresh page, own
    // high-water mark.
    let mut cursors = paginator.begin_section_on_new_page(&kinds);
    for (cursor, content) in cursors.iter_mut().zip(&columns) {
        paginator.place(cursor, Block::SectionHeader(content.kind.label().to_string()));
        render_detail_column(paginator, cursor, content);
    }
    paginator.end_section(&cursors);
}

fn render_header(paginator: &mut Paginator, title: &str, file: &FileResult, options: &ReportOptions) {
    paginator.place_full_width(Block::Title(if title.is_empty() {
        "Charger Health Report".to_string()
    } else {
        title.to_string()
    }));

    if let Some(generated_at) = &options.generated_at {
        paginator.place_full_width(Block::Meta {
            text: format!("Generated: {generated_at}"),
            bold: false,
        });
    }

    if let Some(info) = &file.station_info {
        let power = info
            .rated_power_kw
            .map(|kw| format!("{kw}"))
            .unwrap_or_else(|| "N/A".to_string());
        paginator.place_full_width(Block::Meta {
            text: format!(
                "{} | CP: {} | OEM: {} | {}kW | FW: {}",
                info.station_name, info.charge_point_id, info.oem_name, power, info.firmware
            ),
            bold: false,
        });
    }

    if let Some(range) = &file.date_range {
        let start = range.start.as_deref().unwrap_or("N/A");
        let end = range.end.as_deref().unwrap_or("N/A");
        paginator.place_full_width(Block::Meta {
            text: format!("Period: {start} - {end}"),
            bold: true,
        });
    }
}

fn collect_columns(file: &FileResult) -> Vec<ColumnContent> {
    let rated = file.station_info.as_ref().and_then(|info| info.rated_power_kw);

    let per_connector: Vec<(ConnectorId, ColumnKind)> = vec![
        (ConnectorId::One, ColumnKind::Connector1),
        (ConnectorId::Two, ColumnKind::Connector2),
    ];

    let mut columns = Vec::new();

    let combined_errors = breakdown::merge_breakdowns(
        ConnectorId::ALL.map(|c| breakdown::negative_stop_breakdown(file.table(c))),
    );
    let combined_precharging: usize = ConnectorId::ALL
        .iter()
        .map(|c| metrics::precharging_failures(file.table(*c)))
        .sum();
    columns.push(ColumnContent {
        kind: ColumnKind::Combined,
        summary: file.combined_summary(),
        power: metrics::combined_power_figures(file),
        precharging: combined_precharging,
        errors: combined_errors,
        rated_threshold: rated.map(|kw| kw * CAPACITY_SHARE),
    });

    for (connector, kind) in per_connector {
        if file.summary(connector).is_none() && file.table(connector).is_empty() {
            continue;
        }
        let connector_metrics = metrics::compute_connector_metrics(file.table(connector));
        columns.push(ColumnContent {
            kind,
            summary: file.summary(connector).cloned().unwrap_or_default(),
            power: metrics::connector_power_figures(connector_metrics, file.summary(connector)),
            precharging: metrics::precharging_failures(file.table(connector)),
            errors: breakdown::negative_stop_breakdown(file.table(connector)),
            // A single port can only ever see half the station's nameplate.
            rated_threshold: rated.map(|kw| (kw / 2.0) * CAPACITY_SHARE),
        });
    }

    columns
}

fn render_summary_column(
    paginator: &mut Paginator,
    cursor: &mut crate::paginator::ColumnCursor,
    content: &ColumnContent,
) {
    let summary = &content.summary;

    paginator.place(cursor, success_banner(summary));

    paginator.place(cursor, Block::SectionHeader("1. Charger Usage & Readiness".into()));
    paginator.place(
        cursor,
        Block::Table(Table {
            head: vec!["Metric".into(), "Count".into()],
            rows: vec![
                count_row("Preparing", summary.preparing_sessions),
                count_row("Charging", summary.charging_sessions),
                count_row("Positive Stops", summary.successful_sessions),
                count_row("Negative Stops", summary.failed_error_stops),
                count_row("Precharging Failure", content.precharging as u64),
            ],
        }),
    );

    paginator.place(cursor, Block::SectionHeader("2. Authentication Method".into()));
    paginator.place(
        cursor,
        Block::Table(Table {
            head: vec!["Start Type".into(), "Accepted".into()],
            rows: vec![
                count_row("Remote Start", summary.remote_start),
                count_row("Auto Charge", summary.auto_start),
                count_row("RFID", summary.rfid_start),
            ],
        }),
    );

    paginator.place(cursor, Block::SectionHeader("3. Power & Charging Quality".into()));
    paginator.place(
        cursor,
        Block::Table(Table {
            head: vec!["Metric".into(), "Value".into()],
            rows: vec![
                TableRow {
                    cells: vec![
                        Cell::plain("Peak Power (kW)"),
                        Cell::toned(
                            format_power(content.power.peak_kw),
                            peak_tone(content.power.peak_kw, content.rated_threshold),
                        ),
                    ],
                },
                TableRow {
                    cells: vec![
                        Cell::plain("Avg Power (kW)"),
                        Cell::plain(format_power(content.power.avg_kw)),
                    ],
                },
            ],
        }),
    );
}

fn render_detail_column(
    paginator: &mut Paginator,
    cursor: &mut crate::paginator::ColumnCursor,
    content: &ColumnContent,
) {
    paginator.place(cursor, Block::SectionHeader("Precharging Failures".into()));
    paginator.place(
        cursor,
        Block::Table(Table {
            head: vec!["Metric".into(), "Count".into()],
            rows: vec![count_row("Precharging Failure", content.precharging as u64)],
        }),
    );

    paginator.place(cursor, Block::SectionHeader("Error Summary".into()));
    if content.errors.is_empty() {
        paginator.place(cursor, Block::Note("No Failed / Error stops recorded.".into()));
    } else {
        paginator.place(
            cursor,
            Block::Table(Table {
                head: vec!["Stop Reason".into(), "Count".into()],
                rows: content
                    .errors
                    .iter()
                    .map(|entry| count_row(&entry.name, entry.value))
                    .collect(),
            }),
        );
    }
}

fn success_banner(summary: &ConnectorSummary) -> Block {
    let rate = summary.success_rate_pct();
    let text = if summary.charging_sessions > 0 {
        format!(
            "Success Rate: {rate}% ({} / {})",
            summary.successful_sessions, summary.charging_sessions
        )
    } else {
        "Success Rate: 0%".to_string()
    };
    Block::Banner {
        text,
        tone: if rate > GOOD_RATE_PCT { Tone::Good } else { Tone::Attention },
    }
}

fn count_row(name: &str, value: u64) -> TableRow {
    TableRow {
        cells: vec![Cell::plain(name), Cell::plain(value.to_string())],
    }
}

fn format_power(value: Option<f64>) -> String {
    match value {
        Some(kw) => format!("{kw:.2}"),
        None => NO_DATA.to_string(),
    }
}

fn peak_tone(peak: Option<f64>, threshold: Option<f64>) -> Tone {
    match (peak, threshold) {
        (Some(peak), Some(threshold)) => {
            if peak > threshold {
                Tone::Good
            } else {
                Tone::Attention
            }
        }
        _ => Tone::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargetrace_types::StationInfo;
    use serde_json::json;

    fn sample_file() -> FileResult {
        FileResult {
            station_info: Some(StationInfo {
                station_name: "Depot 7".into(),
                rated_power_kw: Some(60.0),
                ..Default::default()
            }),
            summary_1: Some(ConnectorSummary {
                preparing_sessions: 12,
                charging_sessions: 10,
                successful_sessions: 8,
                failed_error_stops: 2,
                remote_start: 6,
                ..Default::default()
            }),
            summary_2: Some(ConnectorSummary {
                charging_sessions: 5,
                successful_sessions: 5,
                ..Default::default()
            }),
            tables: [(
                "Connector1".to_string(),
                vec![
                    json!({
                        "Session Status": "Failed",
                        "Stop Reason": "Powerloss",
                        "Session Peak Power (kW)": 57.0,
                        "Session Energy Delivered (kWh)": 20.0,
                        "Session Duration": "1:00:00",
                    })
                    .as_object()
                    .unwrap()
                    .clone(),
                ],
            )]
            .into(),
            ..Default::default()
        }
    }

    fn texts(document: &Document) -> Vec<String> {
        document
            .pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .map(|placed| match &placed.block {
                Block::Title(text) | Block::SectionHeader(text) | Block::Note(text) => text.clone(),
                Block::Meta { text, .. } | Block::Banner { text, .. } => text.clone(),
                Block::Table(table) => table.head.join("|"),
            })
            .collect()
    }

    #[test]
    fn report_carries_header_banner_and_fixed_section_order() {
        let document = build_report("a.csv", &sample_file(), &ReportOptions::default());
        let texts = texts(&document);

        assert_eq!(texts[0], "a.csv");
        assert!(texts.iter().any(|t| t.starts_with("Depot 7 | CP:")));
        assert!(texts.iter().any(|t| t == "Success Rate: 87% (13 / 15)"));

        let usage = texts.iter().position(|t| t == "1. Charger Usage & Readiness").unwrap();
        let auth = texts.iter().position(|t| t == "2. Authentication Method").unwrap();
        let power = texts.iter().position(|t| t == "3. Power & Charging Quality").unwrap();
        assert!(usage < auth && auth < power);
    }

    #[test]
    fn detail_section_lands_on_a_fresh_page() {
        let document = build_report("a.csv", &sample_file(), &ReportOptions::default());
        assert!(document.page_count() >= 2);
        let last_page = document.pages.last().unwrap();
        let has_error_summary = last_page
            .blocks
            .iter()
            .any(|placed| matches!(&placed.block, Block::SectionHeader(t) if t == "Error Summary"));
        assert!(has_error_summary);
    }

    #[test]
    fn connector_two_column_present_only_with_data() {
        let mut file = sample_file();
        file.summary_2 = None;
        let document = build_report("a.csv", &file, &ReportOptions::default());
        let has_c2 = document
            .pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .any(|placed| placed.column == ColumnKind::Connector2);
        assert!(!has_c2);
    }

    #[test]
    fn peak_above_capacity_share_reads_good() {
        // Rated 60 kW -> combined threshold 54, connector threshold 27.
        let document = build_report("a.csv", &sample_file(), &ReportOptions::default());
        let combined_peak_tone = document
            .pages
            .iter()
            .flat_map(|page| page.column_blocks(ColumnKind::Combined))
            .find_map(|block| match block {
                Block::Table(table) if table.head[1] == "Value" => {
                    Some(table.rows[0].cells[1].tone)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(combined_peak_tone, Tone::Good);
    }

    #[test]
    fn missing_power_renders_no_data_marker() {
        let file = FileResult {
            summary_1: None,
            tables: [(
                "Connector1".to_string(),
                vec![json!({ "Session Status": "Completed" }).as_object().unwrap().clone()],
            )]
            .into(),
            ..Default::default()
        };
        let document = build_report("x.csv", &file, &ReportOptions::default());
        let texts = texts(&document);
        assert!(!texts.is_empty());
        let has_marker = document
            .pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .any(|placed| match &placed.block {
                Block::Table(table) => table
                    .rows
                    .iter()
                    .any(|row| row.cells.iter().any(|cell| cell.text == NO_DATA)),
                _ => false,
            });
        assert!(has_marker);
    }

    #[test]
    fn batch_report_renders_one_report_per_file_sorted() {
        let mut results = BTreeMap::new();
        results.insert("b.csv".to_string(), sample_file());
        results.insert("a.csv".to_string(), sample_file());
        results.insert(ALL_FILES.to_string(), sample_file());

        let document = build_batch_report(&results, &ReportOptions::default());
        let titles: Vec<String> = document
            .pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .filter_map(|placed| match &placed.block {
                Block::Title(text) => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["a.csv".to_string(), "b.csv".to_string()]);
    }
}
