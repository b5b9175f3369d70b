use crate::args::InputArgs;
use crate::presentation;
use crate::types::OutputFormat;
use anyhow::Result;
use chargetrace_engine::network_performance;

pub fn handle(args: &InputArgs, format: OutputFormat) -> Result<()> {
    let state = super::load_state(args)?;
    let performance = network_performance(&state.results);

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&performance)?);
        return Ok(());
    }

    println!("{}", presentation::heading("Network Performance"));
    let mut table = presentation::styled_table(&["OEM", "Negative Stop Rate (%)"]);
    for entry in &performance {
        table.add_row(vec![entry.name.clone(), entry.value.to_string()]);
    }
    println!("{table}");
    Ok(())
}
