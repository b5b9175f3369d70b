//! Plain-text rendering backend.
//!
//! Walks the laid-out plan page by page; every layout decision (column
//! assignment, page breaks, ordering) was already made by the paginator.

use crate::plan::{Block, ColumnKind, Document, Table, Tone};
use std::fmt::Write;

const COLUMNS: [ColumnKind; 3] = [
    ColumnKind::Combined,
    ColumnKind::Connector1,
    ColumnKind::Connector2,
];

/// Serialize a document to plain text, one page at a time.
pub fn render(document: &Document) -> String {
    let mut out = String::new();

    for (index, page) in document.pages.iter().enumerate() {
        let _ = writeln!(out, "===== Page {} of {} =====", index + 1, document.page_count());

        for block in page.column_blocks(ColumnKind::FullWidth) {
            render_block(&mut out, block, "");
        }

        for column in COLUMNS {
            let blocks: Vec<&Block> = page.column_blocks(column).collect();
            if blocks.is_empty() {
                continue;
            }
            let _ = writeln!(out, "--- {} ---", column.label());
            for block in blocks {
                render_block(&mut out, block, "  ");
            }
        }
        out.push('\n');
    }

    out
}

fn render_block(out: &mut String, block: &Block, indent: &str) {
    match block {
        Block::Title(text) => {
            let _ = writeln!(out, "{indent}{text}");
            let _ = writeln!(out, "{indent}{}", "=".repeat(text.len()));
        }
        Block::Meta { text, bold } => {
            if *bold {
                let _ = writeln!(out, "{indent}** {text} **");
            } else {
                let _ = writeln!(out, "{indent}{text}");
            }
        }
        Block::SectionHeader(text) => {
            let _ = writeln!(out, "{indent}[{text}]");
        }
        Block::Banner { text, tone } => {
            let _ = writeln!(out, "{indent}{} {}", tone_marker(*tone), text);
        }
        Block::Note(text) => {
            let _ = writeln!(out, "{indent}{text}");
        }
        Block::Table(table) => render_table(out, table, indent),
    }
}

fn render_table(out: &mut String, table: &Table, indent: &str) {
    let widths = column_widths(table);

    let head: Vec<String> = table
        .head
        .iter()
        .zip(&widths)
        .map(|(text, width)| format!("{text:<width$}"))
        .collect();
    let _ = writeln!(out, "{indent}{}", head.join("  "));
    let separator_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{indent}{}", "-".repeat(separator_width));

    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let marker = tone_marker(cell.tone);
                if marker.is_empty() {
                    format!("{:<width$}", cell.text)
                } else {
                    format!("{:<width$}", format!("{} {}", cell.text, marker))
                }
            })
            .collect();
        let _ = writeln!(out, "{indent}{}", cells.join("  "));
    }
}

fn column_widths(table: &Table) -> Vec<usize> {
    let column_count = table.head.len();
    (0..column_count)
        .map(|i| {
            let head_width = table.head.get(i).map(String::len).unwrap_or(0);
            let body_width = table
                .rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                // Tone markers add " (!)" / " (ok)" to the cell.
                .map(|cell| cell.text.len() + if cell.tone == Tone::Plain { 0 } else { 5 })
                .max()
                .unwrap_or(0);
            head_width.max(body_width)
        })
        .collect()
}

fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Plain => "",
        Tone::Good => "(ok)",
        Tone::Attention => "(!)",
    }
}
