use anyhow::Context;
use clap::Parser;
use infinimat_cli::tracing_setup::init_tracing;
use infinimat_cli::{Cli, Command, render_demo, run_demo, run_script};
use std::fs::File;
use std::io::{self, BufReader};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_tracing(&config.logging, cli.verbose)?;
    infinimat_core::init()?;
    config.log_summary();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Demo { .. } => {
            let report = run_demo(&config)?;
            render_demo(&report, config.output.format, &mut out)?;
        }
        Command::Run { script: Some(path) } => {
            info!(path = %path.display(), "Running script file");
            let file = File::open(path)
                .with_context(|| format!("Failed to open script '{}'", path.display()))?;
            run_script(BufReader::new(file), &mut out, &config)?;
        }
        Command::Run { script: None } => {
            info!("Running script from standard input");
            run_script(io::stdin().lock(), &mut out, &config)?;
        }
    }

    Ok(())
}
