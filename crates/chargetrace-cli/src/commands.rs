use super::args::{Cli, Commands};
use super::handlers;
use anyhow::Result;
use chargetrace_runtime::Config;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(&cli.config)?;

    match cli.command {
        Commands::Analyze { inputs } => handlers::analyze::handle(&inputs, &config, cli.format),

        Commands::Trend { inputs, per_row } => {
            handlers::trend::handle(&inputs, &config, per_row, cli.format)
        }

        Commands::Network { inputs } => handlers::network::handle(&inputs, cli.format),

        Commands::Report { inputs, out, per_file } => {
            handlers::report::handle(&inputs, &config, out.as_deref(), per_file, cli.format)
        }
    }
}
