//! Entry point for the `clara-manager` daemon.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use clara_config::{ConfigArgs, Endpoint};

/// Supervises CLARA platform and DPE processes on this node.
#[derive(Debug, Parser)]
#[command(name = "clara-manager", version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    /// Endpoint to listen on, overriding `daemon.listen`.
    #[arg(long, env = "CLARA_LISTEN")]
    listen: Option<Endpoint>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match clara_manager::run_daemon(&cli.config, cli.listen) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr().lock(), "clara-manager: {error}");
            ExitCode::FAILURE
        }
    }
}
