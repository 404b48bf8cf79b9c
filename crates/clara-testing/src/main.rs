//! Entry point for the `clara-acceptance` runner.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    clara_testing::run(std::env::args_os(), &mut stdout, &mut stderr)
}
