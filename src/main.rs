use clap::Parser;
use pathtrie::cli::{run_cli, Cli};
use pathtrie::logging::init_logging;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    let stdout = std::io::stdout();
    let ok = run_cli(&cli, &mut stdout.lock())?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
