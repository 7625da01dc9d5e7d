mod commands;
mod terminal;

use std::process::ExitCode;

use commands::CommandLine;
use rdpgate_common::config::Config;
use rdpgate_common::launcher::SystemLauncher;
use rdpgate_common::network::interface::SystemInterfaces;
use rdpgate_core::generate::{GenerateService, RunOutcome};
use terminal::console::TerminalConsole;
use terminal::{logging, print};
use tracing::error;

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging();
    print::banner();

    let cfg = Config::new(commands.mode());
    if cfg.mode.is_manual() {
        print::header("manual mode");
    }

    let service = GenerateService::new(Box::new(SystemInterfaces), Box::new(SystemLauncher));
    let exit_code = match service.run(&cfg, &mut TerminalConsole) {
        Ok(outcome) => summarize(&outcome),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    };

    print::end_of_program();
    exit_code
}

fn summarize(outcome: &RunOutcome) -> ExitCode {
    match outcome {
        RunOutcome::Generated { selection, .. } => {
            mprint!();
            print::centerln(&format!("Connection file ready for {selection}"));
            ExitCode::SUCCESS
        }
        _ => ExitCode::FAILURE,
    }
}
