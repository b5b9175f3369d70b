//! Console formatting helpers shared by the handlers.

use chargetrace_report::NO_DATA;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

/// A table in the house style.
pub fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

/// Power value for console cells: two decimals, explicit no-data marker.
pub fn power_cell(value: Option<f64>) -> String {
    match value {
        Some(kw) => format!("{kw:.2}"),
        None => NO_DATA.to_string(),
    }
}

/// Success-rate line in the upstream wording, colored when stdout is a
/// terminal: rates above 60% read green, everything else red.
pub fn success_rate_line(successful: u64, charging: u64) -> String {
    let rate = chargetrace_types::summary::rate_pct(successful, charging);
    let text = if charging > 0 {
        format!("Success Rate: {rate}% ({successful} / {charging})")
    } else {
        "Success Rate: 0%".to_string()
    };

    if !std::io::stdout().is_terminal() {
        return text;
    }
    if rate > 60 {
        text.green().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

/// Section heading, bolded on terminals.
pub fn heading(text: &str) -> String {
    if std::io::stdout().is_terminal() {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
