use clap::Parser;
use std::process::ExitCode;
use tidydl::cli::{Cli, run_cli};
use tidydl::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
