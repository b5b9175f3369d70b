pub mod analyze;
pub mod network;
pub mod report;
pub mod trend;

use crate::args::InputArgs;
use anyhow::Result;
use chargetrace_runtime::{AnalysisState, expand_inputs, process_batch};

/// Process the batch behind a set of inputs and apply the active filter
/// dimension. Shared by every subcommand.
pub(crate) fn load_state(args: &InputArgs) -> Result<AnalysisState> {
    let files = expand_inputs(&args.inputs);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(process_batch(&files))?;

    let mut state = AnalysisState::from_outcome(outcome);
    if let Some(name) = &args.file {
        state.selection.select_file(name);
    } else if let Some(id) = &args.charge_point {
        state.selection.select_charge_point(id);
    } else if let Some(name) = &args.station {
        state.selection.select_station(name);
    }
    Ok(state)
}
